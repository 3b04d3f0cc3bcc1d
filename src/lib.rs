//! AI Utility: a sidebar-driven web page in front of Google Gemini.
//!
//! Four modes share one server:
//! - **Chatbot**: multi-turn chat; earlier turns are sent as context
//! - **Image Captioning**: describe an uploaded JPEG or PNG
//! - **Embed Text**: embedding vector with CSV export
//! - **Ask Me Anything**: single question, single answer
//!
//! The only state is each browser session's chat transcript, see
//! [`conversation`].

pub mod cli;
pub mod config;
pub mod conversation;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod modes;
pub mod web;

pub use config::Config;
