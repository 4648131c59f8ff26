//! Assistant error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Logging is the
//! client's responsibility: it records each failure once, at the boundary
//! where the error is collapsed into a benign default.

use thiserror::Error;

/// Errors that can occur while talking to the generative-language service.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key was configured; no request was attempted.
    #[error("API key not configured")]
    NotConfigured,

    /// TCP/HTTP connection to the service failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// Non-2xx HTTP response from the service.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
    },

    /// The response envelope or the generated text could not be parsed.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        reason: String,
    },

    /// The generated JSON parsed, but an element breaks the record contract.
    #[error("schema violation at element {index}: {reason}")]
    SchemaViolation {
        index: usize,
        reason: String,
    },

    /// The request body could not be built.
    #[error("request encoding failed: {reason}")]
    RequestEncoding {
        reason: String,
    },

    /// Configuration loading or validation error.
    #[error("config error: {reason}")]
    ConfigError {
        reason: String,
    },
}

impl AssistantError {
    /// Whether the failure happened before or during the network exchange,
    /// as opposed to while interpreting a response that did arrive.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AssistantError::ConnectionFailed { .. } | AssistantError::HttpError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        assert!(AssistantError::ConnectionFailed {
            endpoint: "http://localhost".into(),
            reason: "refused".into(),
        }
        .is_transport());
        assert!(AssistantError::HttpError {
            status: 503,
            body: String::new(),
        }
        .is_transport());
        assert!(!AssistantError::NotConfigured.is_transport());
        assert!(!AssistantError::SchemaViolation {
            index: 0,
            reason: "missing field `code`".into(),
        }
        .is_transport());
    }

    #[test]
    fn test_request_encoding_is_not_a_service_failure() {
        let err = AssistantError::RequestEncoding {
            reason: "key must be a string".into(),
        };
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "request encoding failed: key must be a string");
    }

    #[test]
    fn test_display_includes_context() {
        let err = AssistantError::SchemaViolation {
            index: 2,
            reason: "missing field `predictedDemand`".into(),
        };
        assert_eq!(
            err.to_string(),
            "schema violation at element 2: missing field `predictedDemand`"
        );
    }
}
