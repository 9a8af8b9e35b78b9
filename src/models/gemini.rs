//! Google Generative Language API client
//!
//! Calls `models/{model}:generateContent` once per invocation and joins the
//! text parts of the first candidate into the reply.

use crate::config::ModelConfig;
use crate::error::{AppError, AppResult};
use crate::models::client::{ModelClient, ModelError, ModelReply};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Header carrying the API credential
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// [`ModelClient`] backed by the Generative Language REST API
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from validated model configuration
    ///
    /// No request timeout is set; a call runs until the API answers or the
    /// connection fails.
    pub fn new(config: &ModelConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let model = config.name().to_string();
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url().trim_end_matches('/'),
            model
        );

        Ok(Self {
            http,
            api_key: config.api_key().to_string(),
            model,
            endpoint,
        })
    }

    /// Full URL of the generateContent call
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, text: &str) -> Result<ModelReply, ModelError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text }],
            }],
        };

        tracing::debug!(
            model = %self.model,
            prompt_length = text.len(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_else(|e| e.to_string());
            let body = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        extract_text(parsed).map(ModelReply::new)
    }
}

/// Join the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(ModelError::Blocked { reason }),
            None => Err(ModelError::Malformed(
                "response contained no candidates".to_string(),
            )),
        };
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(ModelError::Malformed(format!(
            "candidate contained no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("should parse response fixture")
    }

    fn model_config(name: &str, base_url: &str) -> ModelConfig {
        let toml = format!(
            "[model]\napi_key = \"k\"\nname = \"{}\"\nbase_url = \"{}\"\n",
            name, base_url
        );
        crate::config::Config::from_str(&toml)
            .expect("should parse model config")
            .model
    }

    #[test]
    fn test_endpoint_url_construction() {
        let client = GeminiClient::new(&model_config(
            "gemini-1.5-flash",
            "https://example.test/v1beta/",
        ))
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(client.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_models_prefix_is_stripped() {
        let client =
            GeminiClient::new(&model_config("models/gemini-pro", "https://example.test")).unwrap();
        assert_eq!(client.model_name(), "gemini-pro");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GeminiClient::new(&model_config("m", "https://example.test")).unwrap();
        assert!(!format!("{:?}", client).contains("api_key"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part {
                    text: "Explain gravity",
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Explain gravity");
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": "Q: 2x=4. "}, {"text": "A: x=2"}]}}]}"#,
        );
        assert_eq!(extract_text(response).unwrap(), "Q: 2x=4. A: x=2");
    }

    #[test]
    fn test_extract_uses_first_candidate_only() {
        let response = parse(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]}"#,
        );
        assert_eq!(extract_text(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_reports_blocked_prompt() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        let err = extract_text(response).unwrap_err();
        assert!(matches!(err, ModelError::Blocked { ref reason } if reason == "SAFETY"));
    }

    #[test]
    fn test_extract_rejects_empty_candidates() {
        let err = extract_text(parse(r#"{"candidates": []}"#)).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn test_extract_rejects_candidate_without_text() {
        let response = parse(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#);
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }
}
