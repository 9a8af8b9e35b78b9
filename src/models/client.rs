//! Model client capability
//!
//! The rest of the crate talks to the hosted LLM only through [`ModelClient`],
//! so handlers and tests can swap in any implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Plain text produced by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    content: String,
}

impl ModelReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Get the reply text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume the reply, returning its text
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Failure of a single model invocation
#[derive(Error, Debug)]
pub enum ModelError {
    /// Connection, TLS or body-decoding failure
    #[error("request to model API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("model API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The API refused to answer the prompt
    #[error("prompt was blocked by the model API: {reason}")]
    Blocked { reason: String },

    /// The response did not have the expected shape
    #[error("malformed model response: {0}")]
    Malformed(String),

    /// Catch-all for other client implementations
    #[error("{0}")]
    Other(String),
}

/// Sends text to a hosted language model and returns its reply
///
/// One call is one outbound request. Implementations must not retry,
/// stream partial output, or keep conversation state between calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier, for logs and the health endpoint
    fn model_name(&self) -> &str;

    /// Send `text` as a single user turn and return the generated text
    async fn invoke(&self, text: &str) -> Result<ModelReply, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_reply_accessors() {
        let reply = ModelReply::new("Gravity pulls.");
        assert_eq!(reply.content(), "Gravity pulls.");
        assert_eq!(reply.into_content(), "Gravity pulls.");
    }

    #[test]
    fn test_status_error_message_includes_body() {
        let err = ModelError::Status {
            status: 403,
            body: "API key not valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "model API returned HTTP 403: API key not valid"
        );
    }

    #[test]
    fn test_other_error_is_the_bare_message() {
        assert_eq!(ModelError::Other("boom".to_string()).to_string(), "boom");
    }
}
