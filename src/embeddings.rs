//! Text embeddings.
//!
//! Embeddings convert text into dense vectors. The vector can be inspected
//! in the page or exported as a single comma-separated line.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::GoogleConfig;
use crate::error::LlmError;
use crate::llm::google::{map_http_error, model_url};

/// Number of values shown in the embedding preview.
pub const PREVIEW_LEN: usize = 10;

/// Shown next to an embedding failure.
pub const FAILURE_HINT: &str = "Try with shorter text or check your API key configuration.";

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError>;
}

/// Google Gemini embedding provider using the native `embedContent` API.
pub struct GoogleEmbeddings {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GoogleEmbeddings {
    /// Create a new Google embedding provider.
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            model: "gemini-embedding-001".to_string(),
            base_url: base_url.into(),
        }
    }

    /// Create a provider from the Gemini settings.
    pub fn from_config(config: &GoogleConfig) -> Self {
        Self::new(config.api_key.clone(), config.base_url.clone())
            .with_model(config.embedding_model.clone())
    }

    /// Use a custom model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_url(&self) -> String {
        model_url(&self.base_url, &self.model, "embedContent")
    }

    fn request_body<'a>(&self, text: &'a str) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: format!("models/{}", self.model.trim_start_matches("models/")),
            content: EmbedContent {
                parts: vec![EmbedPart { text }],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: EmbedContent<'a>,
}

#[derive(Debug, Serialize)]
struct EmbedContent<'a> {
    parts: Vec<EmbedPart<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f64>,
}

#[async_trait]
impl EmbeddingProvider for GoogleEmbeddings {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        let url = self.api_url();

        tracing::debug!(model = %self.model, "Google embedding request: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: "google".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(map_http_error(status, headers.get("retry-after"), &body));
        }

        let result: EmbedContentResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidResponse {
                provider: "google".to_string(),
                reason: format!("Failed to parse embedding response: {}", e),
            })?;

        Ok(result.embedding.values)
    }
}

/// Render an embedding as one comma-separated line with no header.
///
/// Whole numbers keep their trailing `.0`.
pub fn to_csv(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_value(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Shortest round-trip decimal, switching to exponent form below `1e-4` and
/// from `1e16`. The exponent carries a sign and at least two digits
/// (`1.5e-05`, `1e+16`).
fn format_value(v: f64) -> String {
    let repr = format!("{v:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Whitespace-separated word count of the embedded text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Download file name for an embedding of `text`.
pub fn export_file_name(text: &str) -> String {
    format!("embedding_{}_words.csv", word_count(text))
}

/// The leading values shown in the page.
pub fn preview(values: &[f64]) -> &[f64] {
    &values[..values.len().min(PREVIEW_LEN)]
}

/// A mock embedding provider for testing.
///
/// Generates deterministic embeddings based on text hash.
#[cfg(test)]
pub struct MockEmbeddings {
    dimension: usize,
}

#[cfg(test)]
impl MockEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[cfg(test)]
#[async_trait]
impl EmbeddingProvider for MockEmbeddings {
    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            // Simple LCG for deterministic values
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            embedding.push((seed as f64 / u64::MAX as f64) * 2.0 - 1.0);
        }
        Ok(embedding)
    }
}
