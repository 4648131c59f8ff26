//! Demo records the views start from.

use serde::Deserialize;

use super::records::{ClinicalNote, InventoryItem, Invoice, Patient};

const SEED_JSON: &str = include_str!("seed.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub patients: Vec<Patient>,
    pub notes: Vec<ClinicalNote>,
    pub inventory: Vec<InventoryItem>,
    pub invoices: Vec<Invoice>,
}

impl SeedData {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Notes for one patient, in seed order.
    pub fn notes_for<'a>(&'a self, patient_id: &'a str) -> impl Iterator<Item = &'a ClinicalNote> {
        self.notes.iter().filter(move |n| n.patient_id == patient_id)
    }
}

pub fn load() -> Result<SeedData, serde_json::Error> {
    serde_json::from_str(SEED_JSON)
}
