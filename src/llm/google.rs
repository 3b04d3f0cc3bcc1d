//! Google Gemini provider implementation.
//!
//! Uses the native `models/{model}:generateContent` endpoint with API key
//! authentication. Image-conditioned requests send the image as a base64
//! `inline_data` part next to the text prompt.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::GoogleConfig;
use crate::error::LlmError;
use crate::llm::provider::{GenerationContent, LlmProvider};

const PROVIDER: &str = "google";

/// Google Gemini generation provider.
pub struct GoogleGeminiProvider {
    client: Client,
    config: GoogleConfig,
}

impl GoogleGeminiProvider {
    /// Create a new Google Gemini provider with API key auth.
    pub fn new(config: GoogleConfig) -> Result<Self, LlmError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(LlmError::AuthFailed {
                provider: PROVIDER.to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        model_url(&self.config.base_url, &self.config.chat_model, "generateContent")
    }

    /// Send a request to the generateContent API.
    async fn send_request(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = self.api_url();

        tracing::debug!("Sending request to Google Gemini: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Google Gemini request failed: {}", e);
                LlmError::RequestFailed {
                    provider: PROVIDER.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await.unwrap_or_default();

        tracing::debug!("Google Gemini response status: {}", status);

        if !status.is_success() {
            return Err(map_http_error(
                status,
                headers.get("retry-after"),
                &response_text,
            ));
        }

        serde_json::from_str(&response_text).map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("JSON parse error: {}. Raw: {}", e, response_text),
        })
    }
}

#[async_trait]
impl LlmProvider for GoogleGeminiProvider {
    fn model_name(&self) -> &str {
        &self.config.chat_model
    }

    async fn generate(&self, content: GenerationContent) -> Result<String, LlmError> {
        let request = GenerateContentRequest::from(content);
        let response = self.send_request(&request).await?;
        extract_text(response)
    }
}

/// Build `{base_url}/models/{model}:{method}`.
pub(crate) fn model_url(base_url: &str, model: &str, method: &str) -> String {
    format!(
        "{}/models/{}:{}",
        base_url.trim_end_matches('/'),
        model.trim_start_matches("models/"),
        method
    )
}

/// Turn a non-success HTTP status into an error carrying the service's own
/// message where it sent one.
pub(crate) fn map_http_error(
    status: reqwest::StatusCode,
    retry_after: Option<&reqwest::header::HeaderValue>,
    body: &str,
) -> LlmError {
    tracing::error!("Google Gemini call failed ({}): {}", status, body);

    match status.as_u16() {
        401 | 403 => LlmError::AuthFailed {
            provider: PROVIDER.to_string(),
        },
        429 => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after: retry_after
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs),
        },
        _ => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("HTTP {}: {}", status, error_message(body)),
        },
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let message = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{status}: {message}"),
                _ => message,
            })
        })
        .unwrap_or_else(|| body.to_string())
}

fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "No text in response candidates".to_string(),
        });
    }
    Ok(text)
}

// Native generateContent API types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl From<GenerationContent> for GenerateContentRequest {
    fn from(content: GenerationContent) -> Self {
        let parts = match content {
            GenerationContent::Text(text) => vec![Part::Text { text }],
            GenerationContent::TextWithInline { text, inline } => vec![
                Part::Text { text },
                Part::InlineData {
                    inline_data: InlineDataPayload {
                        mime_type: inline.mime_type,
                        data: BASE64_STANDARD.encode(&inline.data),
                    },
                },
            ],
        };
        Self {
            contents: vec![Content { parts }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineDataPayload },
}

#[derive(Debug, Serialize)]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}
