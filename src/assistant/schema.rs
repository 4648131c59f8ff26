//! Response schemas for structured generation, and the parser that holds
//! generated JSON to them.
//!
//! A response either satisfies the schema in full or is rejected in full:
//! one bad element discards the whole array.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::errors::AssistantError;
use super::types::{DemandPrediction, DiagnosisCode};

// ─── Schemas ─────────────────────────────────────────────────────────────────

/// Array of `{code, description, confidence?}`.
pub fn diagnosis_code_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "code": { "type": "STRING", "description": "ICD-10 code" },
                "description": { "type": "STRING", "description": "Diagnosis description" },
                "confidence": { "type": "NUMBER", "description": "Confidence between 0 and 1" }
            },
            "required": ["code", "description"]
        }
    })
}

/// Array of `{itemId, itemName?, predictedDemand, recommendation, reasoning?}`.
pub fn demand_prediction_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "itemId": { "type": "STRING" },
                "itemName": { "type": "STRING" },
                "predictedDemand": { "type": "NUMBER" },
                "recommendation": {
                    "type": "STRING",
                    "description": "Suggested action, e.g. 'Order 50 units now'"
                },
                "reasoning": {
                    "type": "STRING",
                    "description": "Why this recommendation was made"
                }
            },
            "required": ["itemId", "predictedDemand", "recommendation"]
        }
    })
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Checks that serde's type mapping cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for DiagnosisCode {
    fn validate(&self) -> Result<(), String> {
        match self.confidence {
            Some(c) if !(0.0..=1.0).contains(&c) => {
                Err(format!("confidence {c} outside [0, 1]"))
            }
            _ => Ok(()),
        }
    }
}

impl Validate for DemandPrediction {
    fn validate(&self) -> Result<(), String> {
        if self.predicted_demand.is_finite() {
            Ok(())
        } else {
            Err(format!("predictedDemand {} is not finite", self.predicted_demand))
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

pub fn parse_diagnosis_codes(text: &str) -> Result<Vec<DiagnosisCode>, AssistantError> {
    parse_records(text)
}

pub fn parse_demand_predictions(text: &str) -> Result<Vec<DemandPrediction>, AssistantError> {
    parse_records(text)
}

/// Parse `text` as a JSON array of `T`, all or nothing.
fn parse_records<T>(text: &str) -> Result<Vec<T>, AssistantError>
where
    T: DeserializeOwned + Validate,
{
    let value: Value =
        serde_json::from_str(text).map_err(|e| AssistantError::MalformedResponse {
            reason: format!("generated text is not JSON: {e}"),
        })?;

    let Value::Array(elements) = value else {
        return Err(AssistantError::MalformedResponse {
            reason: "generated JSON is not an array".into(),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let record: T = serde_json::from_value(element).map_err(|e| {
                AssistantError::SchemaViolation {
                    index,
                    reason: e.to_string(),
                }
            })?;
            record
                .validate()
                .map_err(|reason| AssistantError::SchemaViolation { index, reason })?;
            Ok(record)
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
