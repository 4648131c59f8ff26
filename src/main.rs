//! # Nexus CLI
//!
//! Drives the hospital ERP assistant from a terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Suggest ICD-10 codes for a note
//! nexus codify --note "Fever 39C, productive cough, crackles right lower lobe"
//!
//! # Predict next-month pharmacy demand for the demo inventory
//! nexus predict
//!
//! # Talk to the assistant
//! nexus chat
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use nexus_erp::assistant::config::{find_config_path, load_config};
use nexus_erp::assistant::{AssistantConfig, LanguageModelClient};
use nexus_erp::erp::records::{
    match_predictions, status_distribution, total_receivables, InventoryItem,
};
use nexus_erp::erp::{seed, ChatSession};

/// Main CLI structure
#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Nexus: hospital ERP assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to nexus.yaml (default: NEXUS_CONFIG, then search upward, then environment)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory for nexus.log (default: platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Suggest ICD-10 codes for a clinical note
    Codify {
        /// Note text to analyze
        #[arg(long, value_name = "TEXT", conflicts_with = "patient")]
        note: Option<String>,
        /// Analyze the demo notes of this patient instead
        #[arg(long, value_name = "PATIENT_ID")]
        patient: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Predict next-month demand for pharmacy items
    Predict {
        /// JSON file with an array of inventory items (default: demo inventory)
        #[arg(long, value_name = "FILE")]
        inventory: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Chat with the assistant
    Chat {
        /// Send these messages in order and exit instead of reading stdin
        #[arg(long, short = 'm', value_name = "MESSAGE")]
        message: Vec<String>,
    },
    /// Show configuration and demo ledger status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(nexus_erp::data_dir);
    nexus_erp::init_tracing(&log_dir)
        .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;

    let config = resolve_config(cli.config.as_deref())?;
    let client = LanguageModelClient::from_config(config)?;
    if !client.is_configured() {
        eprintln!("warning: no API key configured (set GEMINI_API_KEY); AI features return defaults");
    }

    match cli.command {
        Commands::Codify {
            note,
            patient,
            json,
        } => codify(&client, note, patient, json).await,
        Commands::Predict { inventory, json } => predict(&client, inventory.as_deref(), json).await,
        Commands::Chat { message } => chat(&client, message).await,
        Commands::Status => status(&client),
    }
}

/// `--config`, else a discovered `nexus.yaml`, else the environment.
fn resolve_config(explicit: Option<&Path>) -> Result<AssistantConfig> {
    if let Some(path) = explicit {
        return Ok(load_config(path)?);
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    match find_config_path(&cwd) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "loading config file");
            Ok(load_config(&path)?)
        }
        Err(_) => Ok(AssistantConfig::from_env()),
    }
}

async fn codify(
    client: &LanguageModelClient,
    note: Option<String>,
    patient: Option<String>,
    json: bool,
) -> Result<()> {
    let notes: Vec<String> = match (note, patient) {
        (Some(text), _) => vec![text],
        (None, Some(id)) => {
            let data = seed::load()?;
            if data.patient(&id).is_none() {
                bail!("unknown patient id: {id}");
            }
            data.notes_for(&id)
                .filter(|n| n.has_content())
                .map(|n| n.content.clone())
                .collect()
        }
        (None, None) => bail!("pass --note TEXT or --patient ID"),
    };

    for text in notes {
        if text.trim().is_empty() {
            continue;
        }
        let codes = client.extract_diagnosis_codes(&text).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&codes)?);
        } else if codes.is_empty() {
            println!("No diagnosis codes suggested.");
        } else {
            for code in &codes {
                match code.confidence {
                    Some(c) => println!("{:<8} {} ({:.0}%)", code.code, code.description, c * 100.0),
                    None => println!("{:<8} {}", code.code, code.description),
                }
            }
        }
    }
    Ok(())
}

async fn predict(client: &LanguageModelClient, inventory: Option<&Path>, json: bool) -> Result<()> {
    let items: Vec<InventoryItem> = match inventory {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse inventory in {}", path.display()))?
        }
        None => seed::load()?.inventory,
    };

    let predictions = client.predict_demand(&items).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }
    if predictions.is_empty() {
        println!("No active predictions.");
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    for (item, pred) in match_predictions(&items, &predictions) {
        let mut flag = String::new();
        if item.needs_reorder() {
            flag.push_str(" [below reorder level]");
        }
        if item.is_expired(today) {
            flag.push_str(&format!(" [expired {}]", item.expiry_date));
        }
        println!(
            "{} ({} {}{flag}): +{} demand. {}",
            item.name, item.stock_level, item.unit, pred.predicted_demand, pred.recommendation
        );
        if let Some(reasoning) = &pred.reasoning {
            println!("    {reasoning}");
        }
    }
    Ok(())
}

async fn chat(client: &LanguageModelClient, messages: Vec<String>) -> Result<()> {
    let mut session = ChatSession::new();
    if let Some(greeting) = session.transcript().first() {
        println!("nexus> {}", greeting.text);
    }

    if !messages.is_empty() {
        for message in messages {
            println!("you> {message}");
            if let Some(reply) = session.send(client, &message).await {
                println!("nexus> {reply}");
            }
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        if let Some(reply) = session.send(client, line).await {
            println!("nexus> {reply}");
        }
    }
    Ok(())
}

fn status(client: &LanguageModelClient) -> Result<()> {
    let config = client.config();
    println!("model:      {}", config.model);
    println!("endpoint:   {}", config.base_url);
    println!(
        "api key:    {}",
        config.api_key().map(mask_secret).unwrap_or_else(|| "not configured".into())
    );
    let data = seed::load()?;
    println!("receivables: IDR {}", total_receivables(&data.invoices));
    for (status, count) in status_distribution(&data.invoices) {
        println!("  {:<16} {count}", status.label());
    }
    Ok(())
}

/// Show only the last four characters of a secret. Short secrets are fully hidden.
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret_keeps_last_four() {
        assert_eq!(mask_secret("AIzaSyD-abcdef1234"), "****1234");
    }

    #[test]
    fn test_mask_secret_hides_short_keys() {
        assert_eq!(mask_secret("abcd"), "****");
        assert_eq!(mask_secret("12345678"), "****");
        assert_eq!(mask_secret(""), "****");
        assert_eq!(mask_secret("123456789"), "****6789");
    }
}
