//! Client for the hosted generative-language service.
//!
//! Three operations: ICD-10 extraction, stock-demand prediction and chat.
//! Each call is one independent request. The `try_*` methods report how the
//! call ended as an [`Outcome`]; the plain methods collapse every non-value
//! outcome into a benign default so callers can render unconditionally.

use std::sync::Arc;

use super::config::AssistantConfig;
use super::errors::AssistantError;
use super::outcome::Outcome;
use super::prompts::{chat_system_instruction, demand_prompt, diagnosis_codes_prompt};
use super::schema::{
    demand_prediction_schema, diagnosis_code_schema, parse_demand_predictions,
    parse_diagnosis_codes,
};
use super::transport::{GenerativeTransport, HttpTransport};
use super::types::{
    ChatTurn, Content, DemandPrediction, DiagnosisCode, GenerateRequest, GenerationConfig,
    InventoryRecord,
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Chat reply when no API key is configured.
pub const NOT_CONFIGURED_REPLY: &str = "API Key not configured.";

/// Chat reply when the service answered without any text.
pub const EMPTY_REPLY: &str = "I processed that, but there was no textual response.";

/// Chat reply when the call itself failed.
pub const FAILURE_REPLY: &str =
    "Sorry, I can't process your request right now due to a connection problem.";

// ─── LanguageModelClient ─────────────────────────────────────────────────────

/// Client for the generative-language service.
///
/// Holds configuration and a transport, nothing else. It is `Send + Sync`;
/// concurrent calls through a shared reference do not interact.
pub struct LanguageModelClient {
    config: AssistantConfig,
    transport: Arc<dyn GenerativeTransport>,
}

impl LanguageModelClient {
    /// Create a client that talks HTTP to the configured endpoint.
    ///
    /// Does NOT require an API key: an unconfigured client is valid and
    /// answers every call with its default.
    pub fn from_config(config: AssistantConfig) -> Result<Self, AssistantError> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: AssistantConfig, transport: Arc<dyn GenerativeTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    // ─── ICD-10 Extraction ───────────────────────────────────────────────

    /// Suggest ICD-10 codes for a clinical note. Empty on any failure.
    pub async fn extract_diagnosis_codes(&self, note: &str) -> Vec<DiagnosisCode> {
        self.try_extract_diagnosis_codes(note)
            .await
            .unwrap_or_default()
    }

    /// Suggest ICD-10 codes for a clinical note.
    ///
    /// `note` is sent verbatim; blank notes are not filtered here.
    pub async fn try_extract_diagnosis_codes(&self, note: &str) -> Outcome<Vec<DiagnosisCode>> {
        let request = GenerateRequest {
            contents: vec![Content::user(diagnosis_codes_prompt(
                note,
                &self.config.context,
            ))],
            system_instruction: None,
            generation_config: Some(GenerationConfig::json(diagnosis_code_schema())),
        };

        let outcome = self
            .generate("extract_diagnosis_codes", request)
            .await
            .and_then_parse(parse_diagnosis_codes);
        log_outcome("extract_diagnosis_codes", &outcome, Vec::len);
        outcome
    }

    // ─── Demand Prediction ───────────────────────────────────────────────

    /// Predict next-month demand for each item. Empty on any failure.
    pub async fn predict_demand<T>(&self, items: &[T]) -> Vec<DemandPrediction>
    where
        T: InventoryRecord + Sync,
    {
        self.try_predict_demand(items).await.unwrap_or_default()
    }

    /// Predict next-month demand for each item.
    ///
    /// Items are projected to their snapshot before anything is encoded.
    pub async fn try_predict_demand<T>(&self, items: &[T]) -> Outcome<Vec<DemandPrediction>>
    where
        T: InventoryRecord + Sync,
    {
        let snapshot: Vec<_> = items.iter().map(InventoryRecord::snapshot).collect();
        let prompt = match demand_prompt(&snapshot, &self.config.context) {
            Ok(prompt) => prompt,
            Err(e) => {
                let outcome = Outcome::Failed(e);
                log_outcome("predict_demand", &outcome, Vec::len);
                return outcome;
            }
        };

        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig::json(demand_prediction_schema())),
        };

        let outcome = self
            .generate("predict_demand", request)
            .await
            .and_then_parse(parse_demand_predictions);
        log_outcome("predict_demand", &outcome, Vec::len);
        outcome
    }

    // ─── Chat ────────────────────────────────────────────────────────────

    /// Reply to `message` given the prior `transcript`.
    ///
    /// Always returns text: the service's reply, or one of
    /// [`NOT_CONFIGURED_REPLY`], [`EMPTY_REPLY`], [`FAILURE_REPLY`].
    pub async fn converse(&self, transcript: &[ChatTurn], message: &str) -> String {
        match self.try_converse(transcript, message).await {
            Outcome::Value(reply) => reply,
            Outcome::Empty => EMPTY_REPLY.to_string(),
            Outcome::Failed(AssistantError::NotConfigured) => NOT_CONFIGURED_REPLY.to_string(),
            Outcome::Failed(_) => FAILURE_REPLY.to_string(),
        }
    }

    /// Reply to `message` given the prior `transcript`.
    ///
    /// The service keeps no session state, so every prior turn is replayed
    /// in order, then `message` goes last. The transcript is only read.
    pub async fn try_converse(&self, transcript: &[ChatTurn], message: &str) -> Outcome<String> {
        let mut contents: Vec<Content> = transcript.iter().map(Content::from).collect();
        contents.push(Content::user(message));

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content::system(chat_system_instruction(
                &self.config.context,
            ))),
            generation_config: None,
        };

        let outcome = self.generate("converse", request).await;
        log_outcome("converse", &outcome, String::len);
        outcome
    }

    // ─── Shared plumbing ─────────────────────────────────────────────────

    /// Send one request and pull out its text.
    ///
    /// Short-circuits before touching the transport when no API key is set.
    async fn generate(&self, operation: &'static str, request: GenerateRequest) -> Outcome<String> {
        let Some(api_key) = self.config.api_key() else {
            return Outcome::Failed(AssistantError::NotConfigured);
        };

        tracing::info!(
            operation,
            endpoint = %self.transport.endpoint(),
            content_count = request.contents.len(),
            structured = request.generation_config.is_some(),
            "assistant request"
        );

        match self.transport.generate(api_key, &request).await {
            Ok(response) => match response.text() {
                Some(text) => Outcome::Value(text),
                None => {
                    // SAFETY / RECITATION blocks also arrive as text-less candidates.
                    tracing::debug!(
                        operation,
                        finish_reason = response.finish_reason().unwrap_or("none"),
                        "response carried no text"
                    );
                    Outcome::Empty
                }
            },
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Record how a call ended. Failures are logged here and nowhere else.
fn log_outcome<T>(operation: &'static str, outcome: &Outcome<T>, size: impl Fn(&T) -> usize) {
    match outcome {
        Outcome::Value(value) => {
            tracing::info!(operation, size = size(value), "assistant call succeeded")
        }
        Outcome::Empty => tracing::info!(operation, "assistant call returned no text"),
        Outcome::Failed(AssistantError::NotConfigured) => {
            tracing::debug!(operation, "assistant not configured, skipping call")
        }
        Outcome::Failed(e @ AssistantError::SchemaViolation { .. }) => {
            tracing::warn!(operation, error = %e, "response broke its schema, discarding")
        }
        Outcome::Failed(e) if e.is_transport() => {
            tracing::warn!(operation, error = %e, "assistant call failed in transit")
        }
        Outcome::Failed(e) => tracing::warn!(operation, error = %e, "assistant call failed"),
    }
}

impl Outcome<String> {
    /// Parse generated text; a parse error fails the whole call.
    fn and_then_parse<T>(
        self,
        parse: impl FnOnce(&str) -> Result<T, AssistantError>,
    ) -> Outcome<T> {
        match self {
            Outcome::Value(text) => parse(&text).into(),
            Outcome::Empty => Outcome::Empty,
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
