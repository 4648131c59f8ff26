//! Result of a single assistant call.

use super::errors::AssistantError;

/// How a call ended.
///
/// The client keeps "the service answered with nothing" apart from "the call
/// failed". Callers that only render results collapse both with
/// [`Outcome::unwrap_or_default`].
#[derive(Debug)]
pub enum Outcome<T> {
    /// The service answered and the answer satisfied its contract.
    Value(T),
    /// The service answered but produced no text.
    Empty,
    /// Not configured, transport failure, or a response that broke its contract.
    Failed(AssistantError),
}

impl<T> Outcome<T> {
    pub fn error(&self) -> Option<&AssistantError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Default> Outcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

impl<T> From<Result<T, AssistantError>> for Outcome<T> {
    fn from(result: Result<T, AssistantError>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(err) => Outcome::Failed(err),
        }
    }
}
