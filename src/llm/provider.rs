//! Generation provider abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::LlmError;

/// Binary data sent alongside the prompt, such as an uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: Bytes,
}

impl InlineData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Content of a generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationContent {
    /// Plain text prompt.
    Text(String),
    /// Text prompt with one inline binary part.
    TextWithInline { text: String, inline: InlineData },
}

impl GenerationContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn with_inline(text: impl Into<String>, inline: InlineData) -> Self {
        Self::TextWithInline {
            text: text.into(),
            inline,
        }
    }
}

/// A remote text generation service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier used for requests.
    fn model_name(&self) -> &str;

    /// Generate text for the given content.
    async fn generate(&self, content: GenerationContent) -> Result<String, LlmError>;
}
