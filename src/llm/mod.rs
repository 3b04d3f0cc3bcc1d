//! LLM integration.
//!
//! The generation service is reached through the [`LlmProvider`] trait. The
//! only concrete provider talks to the Google Gemini `generateContent` API.

pub(crate) mod google;
mod provider;

pub use google::GoogleGeminiProvider;
pub use provider::{GenerationContent, InlineData, LlmProvider};

use std::sync::Arc;

use crate::config::GoogleConfig;
use crate::error::LlmError;

/// Prompt sent with every uploaded image.
pub const CAPTION_PROMPT: &str = "Please describe this image in detail.";

/// Create the generation provider from configuration.
pub fn create_llm_provider(config: &GoogleConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    tracing::info!(model = %config.chat_model, "Using Google Gemini generateContent API");
    Ok(Arc::new(GoogleGeminiProvider::new(config.clone())?))
}
