//! Generative-language API client (`models/{model}:generateContent`).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{CompletionRequest, CompletionService, ResponseMode};
use crate::config::AiConfig;
use crate::error::AiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// HTTP client for the completion endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            http_client: Client::new(),
        }
    }

    /// Build a client from config, resolving the API key.
    ///
    /// A missing key is allowed here; requests fail with
    /// [`AiError::NotConfigured`] instead.
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.resolve_api_key().unwrap_or_default(),
        )
    }

    fn endpoint(&self) -> Result<Url, AiError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| AiError::NotConfigured(format!("invalid base url '{raw}': {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl CompletionService for GeminiClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::NotConfigured("no API key".into()));
        }

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: match request.mode {
                    ResponseMode::Json => Some("application/json"),
                    ResponseMode::Text => None,
                },
            },
        };

        debug!(model = %self.model, mode = ?request.mode, "sending completion request");
        let resp = self
            .http_client
            .post(self.endpoint()?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: GenerateResponse = resp.json().await?;
        data.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json"),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");

        let text_body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
            generation_config: GenerationConfig::default(),
        };
        let json = serde_json::to_value(&text_body).unwrap();
        assert_eq!(json["generationConfig"], serde_json::json!({}));
    }

    #[test]
    fn test_endpoint_carries_key() {
        let client = GeminiClient::new("https://example.test/", "gemini-2.0-flash", "k1");
        let url = client.endpoint().unwrap();
        assert_eq!(url.path(), "/v1beta/models/gemini-2.0-flash:generateContent");
        assert_eq!(url.query(), Some("key=k1"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = GeminiClient::new("https://example.test", "m", "");
        let err = client
            .generate(&CompletionRequest::new("x", ResponseMode::Text))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(_)));
    }
}
