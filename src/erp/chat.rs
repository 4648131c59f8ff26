//! Chat session: owns the transcript the chat widget shows.
//!
//! The client never touches the transcript; the session appends the user's
//! message and the reply after each call returns.

use uuid::Uuid;

use crate::assistant::{ChatTurn, LanguageModelClient};

/// First assistant turn of every session.
pub const GREETING: &str =
    "Hello. I am Nexus, your hospital ERP assistant. How can I help with finance or stock data today?";

pub struct ChatSession {
    id: Uuid,
    transcript: Vec<ChatTurn>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session seeded with [`GREETING`].
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: vec![ChatTurn::assistant(GREETING)],
        }
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Send `message` and record both sides of the exchange.
    ///
    /// Blank messages are ignored and return `None`. Otherwise returns the
    /// reply, which may be one of the client's fallback sentences.
    pub async fn send(&mut self, client: &LanguageModelClient, message: &str) -> Option<&str> {
        if message.trim().is_empty() {
            return None;
        }

        let reply = client.converse(&self.transcript, message).await;
        tracing::debug!(
            session_id = %self.id,
            turns = self.transcript.len(),
            "chat exchange complete"
        );

        self.transcript.push(ChatTurn::user(message));
        self.transcript.push(ChatTurn::assistant(reply));
        self.transcript.last().map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assistant::testing::{RecordingTransport, Reply};
    use crate::assistant::types::WireRole;
    use crate::assistant::{AssistantConfig, Role, FAILURE_REPLY, NOT_CONFIGURED_REPLY};

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Assistant);
        assert_eq!(session.transcript()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let transport = Arc::new(RecordingTransport::replying([
            Reply::Text("Total AR is IDR 26.75M.".into()),
            Reply::Text("BOR is 82%.".into()),
        ]));
        let client = LanguageModelClient::with_transport(
            AssistantConfig::with_api_key("k"),
            transport.clone(),
        );
        let mut session = ChatSession::new();

        let first = session.send(&client, "Total AR?").await.map(str::to_string);
        assert_eq!(first.as_deref(), Some("Total AR is IDR 26.75M."));
        session.send(&client, "Occupancy?").await;

        let texts: Vec<&str> = session.transcript().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![GREETING, "Total AR?", "Total AR is IDR 26.75M.", "Occupancy?", "BOR is 82%."]
        );

        // Second request replays greeting + first exchange, then the new message.
        let second = &transport.requests()[1];
        assert_eq!(second.contents.len(), 4);
        assert_eq!(second.contents[0].role, Some(WireRole::Model));
        assert_eq!(second.contents[3].text(), "Occupancy?");
    }

    #[tokio::test]
    async fn test_blank_message_is_ignored() {
        let transport = Arc::new(RecordingTransport::default());
        let client = LanguageModelClient::with_transport(
            AssistantConfig::with_api_key("k"),
            transport.clone(),
        );
        let mut session = ChatSession::new();

        assert!(session.send(&client, "  \n").await.is_none());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_replies_are_recorded() {
        let transport = Arc::new(RecordingTransport::replying([Reply::Unreachable]));
        let configured = LanguageModelClient::with_transport(
            AssistantConfig::with_api_key("k"),
            transport.clone(),
        );
        let unconfigured =
            LanguageModelClient::with_transport(AssistantConfig::default(), transport.clone());
        let mut session = ChatSession::new();

        session.send(&configured, "hi").await;
        session.send(&unconfigured, "hello?").await;

        let replies: Vec<&str> = session
            .transcript()
            .iter()
            .filter(|t| t.role == Role::Assistant)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(replies, vec![GREETING, FAILURE_REPLY, NOT_CONFIGURED_REPLY]);
        assert_eq!(transport.call_count(), 1);
    }
}
