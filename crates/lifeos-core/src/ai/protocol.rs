//! Single-shot completion protocol with safe fallbacks.
//!
//! Each call is attempted exactly once. Transport errors, non-success
//! statuses and unparseable JSON all end the same way: one error
//! notification and the mode's empty fallback value.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{AiReply, CompletionRequest, CompletionService, ResponseMode};
use crate::error::AiError;
use crate::notify::{Notification, NotificationSink};

/// Message shown whenever a completion yields no usable answer.
pub const AI_FAILURE_MESSAGE: &str = "The AI could not respond.";

pub struct AiProtocol<C> {
    service: C,
    sink: Arc<dyn NotificationSink>,
}

impl<C: CompletionService> AiProtocol<C> {
    pub fn new(service: C, sink: Arc<dyn NotificationSink>) -> Self {
        Self { service, sink }
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    /// Send a prompt and return the reply, without fallback handling.
    pub async fn try_complete(&self, prompt: &str, mode: ResponseMode) -> Result<AiReply, AiError> {
        debug!(?mode, prompt_len = prompt.len(), "completion prompt");
        let text = self
            .service
            .generate(&CompletionRequest::new(prompt, mode))
            .await?;
        match mode {
            ResponseMode::Text => Ok(AiReply::Text(text)),
            ResponseMode::Json => serde_json::from_str(strip_code_fence(&text))
                .map(AiReply::Json)
                .map_err(|e| {
                    warn!(error = %e, response = %text, "completion is not valid JSON");
                    AiError::InvalidJson(e.to_string())
                }),
        }
    }

    /// Send a prompt. On any failure, notify once and return the fallback.
    pub async fn complete(&self, prompt: &str, mode: ResponseMode) -> AiReply {
        match self.try_complete(prompt, mode).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, ?mode, "completion failed");
                self.sink.notify(Notification::error(AI_FAILURE_MESSAGE));
                AiReply::fallback(mode)
            }
        }
    }

    /// Text-mode completion; empty string means no usable answer.
    pub async fn complete_text(&self, prompt: &str) -> String {
        self.complete(prompt, ResponseMode::Text).await.into_text()
    }

    /// JSON-mode completion; `{}` means no usable answer.
    pub async fn complete_json(&self, prompt: &str) -> serde_json::Value {
        self.complete(prompt, ResponseMode::Json).await.into_json()
    }
}

/// Accept JSON wrapped in a Markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let body = match inner.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with(['{', '[']) => rest,
        _ => inner,
    };
    body.trim()
}
