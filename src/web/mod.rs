//! Browser-facing web gateway.
//!
//! Serves the single-page UI and a small JSON API with one endpoint group
//! per sidebar mode:
//!
//! ```text
//! GET    /                              page
//! GET    /health                        liveness
//! GET    /api/modes                     sidebar entries
//! POST   /api/sessions                  start a session
//! DELETE /api/sessions/{id}             end a session
//! GET    /api/sessions/{id}/chat        transcript
//! POST   /api/sessions/{id}/chat        send a chat message
//! DELETE /api/sessions/{id}/chat        clear chat history
//! POST   /api/caption                   caption an uploaded image
//! POST   /api/embed                     embed text
//! POST   /api/ask                       one-shot question
//! ```

pub mod handlers;
pub mod server;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::conversation::SessionStore;
use crate::embeddings::EmbeddingProvider;
use crate::llm::LlmProvider;

pub use server::{WebServer, WebServerConfig};

/// Maximum request body size; large enough for photo uploads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmProvider>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmProvider>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            llm,
            embeddings,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Build the gateway router with state applied.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/modes", get(handlers::modes_handler))
        .route("/api/sessions", post(handlers::create_session_handler))
        .route(
            "/api/sessions/{session_id}",
            delete(handlers::end_session_handler),
        )
        .route(
            "/api/sessions/{session_id}/chat",
            get(handlers::chat_history_handler)
                .post(handlers::chat_send_handler)
                .delete(handlers::chat_reset_handler),
        )
        .route("/api/caption", post(handlers::caption_handler))
        .route("/api/embed", post(handlers::embed_handler))
        .route("/api/ask", post(handlers::ask_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
