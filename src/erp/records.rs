//! Caller-side ERP records.
//!
//! These carry everything the views track. Only the fields a given assistant
//! call needs are handed over; see [`InventoryRecord`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assistant::{DemandPrediction, DiagnosisCode, InventoryRecord, InventorySnapshotItem};

// ─── Patients & EMR ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Admitted,
    Outpatient,
    Discharged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    /// Medical record number.
    pub mrn: String,
    pub last_visit: NaiveDate,
    pub status: PatientStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalNote {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub doctor: String,
    /// Free text sent for code extraction.
    pub content: String,
    #[serde(default)]
    pub diagnosis_codes: Vec<DiagnosisCode>,
}

impl ClinicalNote {
    /// Whether there is anything worth sending for extraction.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Replace the suggested codes with a fresh extraction result.
    pub fn apply_codes(&mut self, codes: Vec<DiagnosisCode>) {
        self.diagnosis_codes = codes;
    }
}

// ─── Pharmacy ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Medicine,
    Consumable,
    Equipment,
}

/// A pharmacy inventory line as the pharmacy view tracks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: ItemCategory,
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    pub stock_level: u32,
    pub unit: String,
    pub reorder_level: u32,
    /// Last six months of usage, oldest first.
    pub monthly_usage: Vec<u32>,
}

impl InventoryItem {
    pub fn needs_reorder(&self) -> bool {
        self.stock_level < self.reorder_level
    }

    /// Expired on or before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date <= today
    }
}

impl InventoryRecord for InventoryItem {
    fn snapshot(&self) -> InventorySnapshotItem {
        InventorySnapshotItem {
            id: self.id.clone(),
            name: self.name.clone(),
            stock_level: self.stock_level,
            usage_history: self.monthly_usage.clone(),
            expiry_date: self.expiry_date,
        }
    }
}

/// Pair each prediction with the inventory line it refers to.
///
/// Predictions naming an unknown item id are dropped.
pub fn match_predictions<'a>(
    items: &'a [InventoryItem],
    predictions: &'a [DemandPrediction],
) -> Vec<(&'a InventoryItem, &'a DemandPrediction)> {
    predictions
        .iter()
        .filter_map(|p| items.iter().find(|i| i.id == p.item_id).map(|i| (i, p)))
        .collect()
}

// ─── Billing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    #[serde(rename = "Claim Submitted")]
    ClaimSubmitted,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::ClaimSubmitted => "Claim Submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    /// Amount in IDR.
    pub amount: u64,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
}

/// Sum of every invoice amount, in IDR.
pub fn total_receivables(invoices: &[Invoice]) -> u64 {
    invoices.iter().map(|i| i.amount).sum()
}

/// Invoice count per status, in `Paid, Pending, ClaimSubmitted` order.
pub fn status_distribution(invoices: &[Invoice]) -> [(InvoiceStatus, usize); 3] {
    [
        InvoiceStatus::Paid,
        InvoiceStatus::Pending,
        InvoiceStatus::ClaimSubmitted,
    ]
    .map(|status| (status, invoices.iter().filter(|i| i.status == status).count()))
}
