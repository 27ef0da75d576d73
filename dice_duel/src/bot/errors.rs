//! Engine error types.

use thiserror::Error;

/// Errors scoped to a single decision cycle. The engine stays usable after any of them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A decision was requested for an action the policy does not implement
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    /// Embedded game data could not be decoded
    #[error("Failed to decode {message_type} payload: {source}")]
    DecodeError {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Get a client-safe error message
    ///
    /// Decoder details are dropped so the reply does not echo parser internals.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::DecodeError { message_type, .. } => {
                format!("Malformed {message_type} payload")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
