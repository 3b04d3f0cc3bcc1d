//! Sidebar modes.

use serde::Serialize;

/// Title of the sidebar menu.
pub const MENU_TITLE: &str = "Gemini AI";

/// Title of the page.
pub const PAGE_TITLE: &str = "AI Utility";

/// One entry of the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Chatbot,
    ImageCaptioning,
    EmbedText,
    AskMeAnything,
}

impl Mode {
    /// All modes in sidebar order.
    pub const ALL: [Mode; 4] = [
        Mode::Chatbot,
        Mode::ImageCaptioning,
        Mode::EmbedText,
        Mode::AskMeAnything,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Chatbot => "Chatbot",
            Mode::ImageCaptioning => "Image Captioning",
            Mode::EmbedText => "Embed Text",
            Mode::AskMeAnything => "Ask Me Anything",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Mode::Chatbot => "chatbot",
            Mode::ImageCaptioning => "image-captioning",
            Mode::EmbedText => "embed-text",
            Mode::AskMeAnything => "ask-me-anything",
        }
    }

    /// Bootstrap icon name.
    pub fn icon(self) -> &'static str {
        match self {
            Mode::Chatbot => "robot",
            Mode::ImageCaptioning => "image",
            Mode::EmbedText => "textarea-t",
            Mode::AskMeAnything => "question-circle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_chatbot() {
        assert_eq!(Mode::default(), Mode::Chatbot);
        assert_eq!(Mode::ALL[0], Mode::default());
    }

    #[test]
    fn test_slug_matches_serde() {
        for mode in Mode::ALL {
            assert_eq!(
                serde_json::to_value(mode).unwrap(),
                serde_json::Value::String(mode.slug().to_string())
            );
        }
    }

    #[test]
    fn test_labels_in_sidebar_order() {
        let labels: Vec<_> = Mode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(
            labels,
            ["Chatbot", "Image Captioning", "Embed Text", "Ask Me Anything"]
        );
    }
}
