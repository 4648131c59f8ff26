//! Assistant configuration loading.
//!
//! Reads `nexus.yaml` and resolves environment variables, or builds the
//! configuration from the environment alone. The credential lives here and is
//! injected into the client; nothing reads it from process-wide state later.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::errors::AssistantError;

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Name of the config file searched for by [`find_config_path`].
pub const CONFIG_FILE_NAME: &str = "nexus.yaml";

// ─── Public Types ────────────────────────────────────────────────────────────

/// Everything the client needs to reach the service.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// API key. Absent or blank means every operation short-circuits.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout. `None` leaves the HTTP client's default in place.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub context: ContextHints,
}

/// Fixed context woven into every instruction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContextHints {
    /// Month used as "now" for seasonal demand prediction.
    pub current_month: String,
    /// Date the chat persona treats as today.
    pub current_date: String,
    pub currency: String,
    /// Language (and register) the service should answer in.
    pub response_language: String,
}

impl Default for ContextHints {
    fn default() -> Self {
        Self {
            current_month: "October".to_string(),
            current_date: "October 2025".to_string(),
            currency: "IDR (Rupiah)".to_string(),
            response_language: "formal, polite Indonesian".to_string(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: None,
            context: ContextHints::default(),
        }
    }
}

impl AssistantConfig {
    /// Default configuration with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Build a configuration from `GEMINI_API_KEY` (or `API_KEY`) and
    /// `NEXUS_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup("API_KEY"));
        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(model) = lookup("NEXUS_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        config
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Locate `nexus.yaml`.
///
/// `NEXUS_CONFIG` wins if it points at an existing file; otherwise searches
/// upward from `start`.
pub fn find_config_path(start: &Path) -> Result<PathBuf, AssistantError> {
    if let Ok(path) = std::env::var("NEXUS_CONFIG") {
        let candidate = PathBuf::from(path);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Ok(candidate);
        }
        if !dir.pop() {
            break;
        }
    }

    Err(AssistantError::ConfigError {
        reason: format!("could not find {CONFIG_FILE_NAME}"),
    })
}

/// Load and parse a config file.
///
/// Performs environment-variable interpolation on `${VAR_NAME}` and
/// `${VAR_NAME:-default}` before parsing.
pub fn load_config(path: &Path) -> Result<AssistantConfig, AssistantError> {
    let raw = std::fs::read_to_string(path).map_err(|e| AssistantError::ConfigError {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;

    let interpolated = interpolate_env_vars(&raw);

    let config: AssistantConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| AssistantError::ConfigError {
            reason: format!("failed to parse config: {e}"),
        })?;

    if config.base_url.trim().is_empty() {
        return Err(AssistantError::ConfigError {
            reason: "base_url must not be empty".into(),
        });
    }

    Ok(config)
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    match expr.split_once(":-") {
        Some((name, default)) => std::env::var(name).unwrap_or_else(|_| default.to_string()),
        None => std::env::var(expr).unwrap_or_default(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
