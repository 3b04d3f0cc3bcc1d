//! Request and response DTOs for the web gateway API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::Turn;
use crate::modes::Mode;

// --- Sessions ---

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- Chat ---

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub response: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub turns: Vec<Turn>,
}

// --- Image captioning ---

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

// --- Embeddings ---

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub dimension: usize,
    pub word_count: usize,
    /// Leading values of the vector.
    pub preview: Vec<f64>,
    /// Full vector as a comma-separated line.
    pub csv: String,
    pub file_name: String,
}

// --- Ask me anything ---

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

// --- Modes ---

#[derive(Debug, Serialize)]
pub struct ModeInfo {
    pub id: Mode,
    pub label: &'static str,
    pub icon: &'static str,
}

impl From<Mode> for ModeInfo {
    fn from(mode: Mode) -> Self {
        Self {
            id: mode,
            label: mode.label(),
            icon: mode.icon(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModesResponse {
    pub title: &'static str,
    pub menu_title: &'static str,
    pub modes: Vec<ModeInfo>,
    pub default: Mode,
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub channel: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_response_serialize() {
        let response = ModesResponse {
            title: "AI Utility",
            menu_title: "Gemini AI",
            modes: Mode::ALL.into_iter().map(ModeInfo::from).collect(),
            default: Mode::default(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["default"], "chatbot");
        assert_eq!(json["modes"][1]["id"], "image-captioning");
        assert_eq!(json["modes"][1]["label"], "Image Captioning");
        assert_eq!(json["modes"][3]["icon"], "question-circle");
    }

    #[test]
    fn test_error_response_omits_missing_hint() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "boom".to_string(),
            hint: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_send_message_parse() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(req.content, "hello");

        let missing: Result<SendMessageRequest, _> = serde_json::from_str("{}");
        assert!(missing.is_err());
    }
}
