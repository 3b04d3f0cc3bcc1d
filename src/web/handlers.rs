//! Route handlers for the web gateway.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bytes::Bytes;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::conversation::{Session, Turn};
use crate::embeddings::{self, FAILURE_HINT};
use crate::error::LlmError;
use crate::llm::{CAPTION_PROMPT, GenerationContent, InlineData};
use crate::modes::{MENU_TITLE, Mode, PAGE_TITLE};
use crate::web::AppState;
use crate::web::types::{
    AskRequest, AskResponse, CaptionResponse, ChatResponse, EmbedRequest, EmbedResponse,
    ErrorResponse, HealthResponse, HistoryResponse, ModeInfo, ModesResponse, SendMessageRequest,
    SessionCreatedResponse,
};

const INDEX_HTML: &str = include_str!("static/index.html");

/// Upload extensions accepted for captioning.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Errors returned by the API as `{error, hint?}` JSON.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// The request could not be extracted; keeps the extractor's status.
    Rejected { status: StatusCode, message: String },
    SessionNotFound(Uuid),
    /// Another request on the session is still waiting for the service.
    SessionBusy(Uuid),
    /// The generation or embedding service failed. Shown to the user as-is.
    Remote {
        message: String,
        hint: Option<&'static str>,
    },
}

impl ApiError {
    fn remote(err: LlmError) -> Self {
        Self::Remote {
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, hint) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Rejected { status, message } => (status, message, None),
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Session {} not found", id),
                None,
            ),
            ApiError::SessionBusy(id) => (
                StatusCode::CONFLICT,
                format!("Session {} is still waiting for a reply, try again shortly", id),
                None,
            ),
            ApiError::Remote { message, hint } => (StatusCode::BAD_GATEWAY, message, hint),
        };
        (
            status,
            Json(ErrorResponse {
                error,
                hint: hint.map(String::from),
            }),
        )
            .into_response()
    }
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        channel: "web",
    })
}

pub async fn modes_handler() -> Json<ModesResponse> {
    Json(ModesResponse {
        title: PAGE_TITLE,
        menu_title: MENU_TITLE,
        modes: Mode::ALL.into_iter().map(ModeInfo::from).collect(),
        default: Mode::default(),
    })
}

// --- Sessions ---

pub async fn create_session_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let (session_id, session) = state.sessions.create().await;
    let created_at = session.lock().await.created_at;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            created_at,
        }),
    )
}

pub async fn end_session_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(session_id) = path?;
    if state.sessions.end(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

// --- Chat ---

async fn find_session(state: &AppState, session_id: Uuid) -> Result<Arc<Mutex<Session>>, ApiError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::SessionNotFound(session_id))
}

/// Lock a session without waiting behind an in-flight chat call.
fn try_lock_session(
    session: &Mutex<Session>,
    session_id: Uuid,
) -> Result<MutexGuard<'_, Session>, ApiError> {
    session
        .try_lock()
        .map_err(|_| ApiError::SessionBusy(session_id))
}

pub async fn chat_history_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Path(session_id) = path?;
    let session = find_session(&state, session_id).await?;
    let mut session = try_lock_session(&session, session_id)?;
    session.touch();

    Ok(Json(HistoryResponse {
        session_id,
        turns: session.conversation.render_for_display().to_vec(),
    }))
}

pub async fn chat_send_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Path(session_id) = path?;
    let Json(req) = body?;
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is empty".to_string()));
    }

    let session = find_session(&state, session_id).await?;
    // Held until the reply is recorded so the session sees one exchange at a time.
    let mut session = session.lock().await;
    session.touch();

    let prompt = session.conversation.build_prompt(&req.content);
    session.conversation.append(Turn::user(req.content));

    tracing::debug!(
        session_id = %session_id,
        turns = session.conversation.len(),
        prompt_len = prompt.len(),
        "Sending chat message"
    );

    let response = state
        .llm
        .generate(GenerationContent::Text(prompt))
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %session_id, "Chat call failed: {}", e);
            ApiError::remote(e)
        })?;

    session
        .conversation
        .append(Turn::assistant(response.clone()));
    session.touch();

    Ok(Json(ChatResponse {
        session_id,
        response,
        turns: session.conversation.render_for_display().to_vec(),
    }))
}

pub async fn chat_reset_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Path(session_id) = path?;
    let session = find_session(&state, session_id).await?;
    {
        let mut session = try_lock_session(&session, session_id)?;
        session.conversation.reset();
        session.touch();
    }

    tracing::debug!(session_id = %session_id, "Chat history cleared");

    Ok(Json(HistoryResponse {
        session_id,
        turns: Vec::new(),
    }))
}

// --- Image captioning ---

pub async fn caption_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await?;

        image = Some(image_payload(
            file_name.as_deref(),
            content_type.as_deref(),
            data,
        )?);
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Upload an image".to_string()))?;

    tracing::debug!(
        mime_type = %image.mime_type,
        bytes = image.data.len(),
        "Requesting image caption"
    );

    let caption = state
        .llm
        .generate(GenerationContent::with_inline(CAPTION_PROMPT, image))
        .await
        .map_err(|e| {
            tracing::warn!("Caption call failed: {}", e);
            ApiError::remote(e)
        })?;

    Ok(Json(CaptionResponse { caption }))
}

/// Validate an upload and pick its MIME type.
///
/// The file extension wins over the declared content type; only JPEG and
/// PNG are accepted.
fn image_payload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<InlineData, ApiError> {
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded image is empty".to_string()));
    }

    let extension = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mime_type = match extension {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => mime_guess::from_ext(&ext)
            .first()
            .map(|m| m.essence_str().to_string()),
        Some(_) => None,
        None => content_type
            .filter(|ct| matches!(*ct, "image/jpeg" | "image/png"))
            .map(String::from),
    };

    mime_type
        .map(|mime| InlineData::new(mime, data))
        .ok_or_else(|| {
            ApiError::BadRequest("Only jpg, jpeg and png images are supported".to_string())
        })
}

// --- Embeddings ---

pub async fn embed_handler(
    State(state): State<AppState>,
    body: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(req) = body?;
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Enter text to embed".to_string()));
    }

    let values = state.embeddings.embed(&req.text).await.map_err(|e| {
        tracing::warn!(model = state.embeddings.model_name(), "Embedding call failed: {}", e);
        ApiError::Remote {
            message: e.to_string(),
            hint: Some(FAILURE_HINT),
        }
    })?;

    Ok(Json(EmbedResponse {
        dimension: values.len(),
        word_count: embeddings::word_count(&req.text),
        preview: embeddings::preview(&values).to_vec(),
        csv: embeddings::to_csv(&values),
        file_name: embeddings::export_file_name(&req.text),
    }))
}

// --- Ask me anything ---

pub async fn ask_handler(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = body?;
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Type a question".to_string()));
    }

    let answer = state
        .llm
        .generate(GenerationContent::Text(req.question))
        .await
        .map_err(|e| {
            tracing::warn!("Answer call failed: {}", e);
            ApiError::remote(e)
        })?;

    Ok(Json(AskResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_payload_from_extension() {
        let payload = image_payload(Some("cat.JPG"), None, Bytes::from_static(b"img")).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");

        let payload =
            image_payload(Some("cat.png"), Some("application/octet-stream"), Bytes::from_static(b"img"))
                .unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_image_payload_from_content_type() {
        let payload = image_payload(None, Some("image/png"), Bytes::from_static(b"img")).unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_image_payload_rejects_other_types() {
        assert!(matches!(
            image_payload(Some("anim.gif"), Some("image/gif"), Bytes::from_static(b"img")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            image_payload(None, Some("text/plain"), Bytes::from_static(b"img")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            image_payload(Some("cat.png"), None, Bytes::new()),
            Err(ApiError::BadRequest(_))
        ));
    }
}
