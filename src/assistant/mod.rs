//! Assistant client for a hosted generative-language service.
//!
//! This module owns every call the ERP makes to the model:
//! - ICD-10 code extraction from clinical notes (schema-constrained JSON)
//! - Next-month stock demand prediction (schema-constrained JSON)
//! - Multi-turn chat with the "Nexus" persona
//!
//! The credential and endpoint are injected through [`AssistantConfig`]. With
//! no API key every operation returns its default without a network call.

pub mod client;
pub mod config;
pub mod errors;
pub mod outcome;
pub mod prompts;
pub mod schema;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use client::{LanguageModelClient, EMPTY_REPLY, FAILURE_REPLY, NOT_CONFIGURED_REPLY};
pub use config::{AssistantConfig, ContextHints};
pub use errors::AssistantError;
pub use outcome::Outcome;
pub use transport::{GenerativeTransport, HttpTransport};
pub use types::{
    ChatTurn, DemandPrediction, DiagnosisCode, InventoryRecord, InventorySnapshotItem, Role,
};
