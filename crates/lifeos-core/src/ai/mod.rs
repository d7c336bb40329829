//! AI coaching: completion service seam, request protocol, prompts and
//! typed replies.

pub mod gemini;
pub mod prompts;
pub mod protocol;
pub mod reply;

use serde_json::Value;
use std::future::Future;

use crate::error::AiError;

pub use gemini::GeminiClient;
pub use protocol::AiProtocol;
pub use reply::{PriorityReply, SubdivisionReply};

/// Whether the service should answer in free text or constrained JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Text,
    Json,
}

/// One request to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub mode: ResponseMode,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, mode: ResponseMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
        }
    }
}

/// A text/JSON completion backend.
///
/// Implementations return the first candidate's text, or an error for
/// transport failures, non-success statuses and empty responses.
pub trait CompletionService: Send + Sync {
    fn generate(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, AiError>> + Send;
}

/// Result of [`AiProtocol::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum AiReply {
    Text(String),
    Json(Value),
}

impl AiReply {
    /// The "no usable answer" value for a mode.
    pub fn fallback(mode: ResponseMode) -> Self {
        match mode {
            ResponseMode::Text => AiReply::Text(String::new()),
            ResponseMode::Json => AiReply::Json(Value::Object(Default::default())),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AiReply::Text(text) => text,
            AiReply::Json(value) => value.to_string(),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            AiReply::Json(value) => value,
            AiReply::Text(_) => Value::Object(Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_empty() {
        assert_eq!(AiReply::fallback(ResponseMode::Text).into_text(), "");
        assert_eq!(
            AiReply::fallback(ResponseMode::Json).into_json(),
            serde_json::json!({})
        );
    }
}
