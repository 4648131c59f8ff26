//! ERP side of the assistant: the records the views hold, demo seed data,
//! and the chat session that owns its transcript.

pub mod chat;
pub mod records;
pub mod seed;

pub use chat::ChatSession;
pub use records::{ClinicalNote, InventoryItem, Invoice, Patient};
pub use seed::SeedData;
