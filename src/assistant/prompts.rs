//! Instruction text sent with each request.

use super::config::ContextHints;
use super::errors::AssistantError;
use super::types::InventorySnapshotItem;

/// Persona name the chat assistant answers to.
pub const ASSISTANT_NAME: &str = "Nexus";

/// Instruction for ICD-10 extraction. `note` is embedded verbatim.
pub fn diagnosis_codes_prompt(note: &str, hints: &ContextHints) -> String {
    format!(
        "Analyze the following clinical note and extract the relevant ICD-10 diagnosis codes.\n\
         Write each description in {language}.\n\
         Clinical note: \"{note}\"\n\
         \n\
         The output must be JSON.",
        language = hints.response_language,
    )
}

/// Instruction for next-month demand prediction over the projected items.
pub fn demand_prompt(
    items: &[InventorySnapshotItem],
    hints: &ContextHints,
) -> Result<String, AssistantError> {
    let data = serde_json::to_string(items).map_err(|e| AssistantError::RequestEncoding {
        reason: format!("failed to encode inventory snapshot: {e}"),
    })?;

    Ok(format!(
        "Analyze the stock levels and monthly usage history of these pharmacy items.\n\
         Predict the demand for next month and give a recommendation for each item.\n\
         Context: the current month is {month}. Take seasonal trends into account.\n\
         Answer in {language}.\n\
         Data: {data}",
        month = hints.current_month,
        language = hints.response_language,
    ))
}

/// System instruction for the conversational assistant.
pub fn chat_system_instruction(hints: &ContextHints) -> String {
    format!(
        "You are {ASSISTANT_NAME}, an advanced hospital ERP assistant.\n\
         You have access to simulated data about:\n\
         - Total accounts receivable (AR)\n\
         - Bed occupancy rate (BOR)\n\
         - Stock levels of critical medicines\n\
         - Patient admission statistics.\n\
         \n\
         Answer professionally and concisely, with a data-driven tone.\n\
         Respond in {language}.\n\
         Current date: {date}.\n\
         Currency: {currency}.",
        language = hints.response_language,
        date = hints.current_date,
        currency = hints.currency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_note_embedded_verbatim() {
        let note = "Pt c/o  chest pain\nBP 160/100 \"severe\"";
        let prompt = diagnosis_codes_prompt(note, &ContextHints::default());
        assert!(prompt.contains(note));
    }

    #[test]
    fn test_demand_prompt_carries_month_and_data() {
        let items = vec![InventorySnapshotItem {
            id: "2".into(),
            name: "Amoxicillin 250mg".into(),
            stock_level: 45,
            usage_history: vec![40, 45, 42],
            expiry_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        }];
        let hints = ContextHints {
            current_month: "March".into(),
            ..ContextHints::default()
        };
        let prompt = demand_prompt(&items, &hints).unwrap();
        assert!(prompt.contains("the current month is March"));
        assert!(prompt.contains(r#""stockLevel":45"#));
        assert!(prompt.contains(r#""expiryDate":"2024-06-15""#));
    }

    #[test]
    fn test_system_instruction_mentions_persona_and_currency() {
        let text = chat_system_instruction(&ContextHints::default());
        assert!(text.contains("Nexus"));
        assert!(text.contains("IDR (Rupiah)"));
        assert!(text.contains("October 2025"));
    }
}
