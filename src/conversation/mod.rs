//! Conversation transcript and prompt construction.
//!
//! A [`Conversation`] holds the ordered turns of one chat session and turns
//! them into the text sent with each new user message. The first message of
//! a session goes out unchanged; later messages are prefixed with the whole
//! prior exchange. Nothing is ever truncated, so prompts grow with the
//! conversation.

pub mod session;

use serde::{Deserialize, Serialize};

pub use session::{Session, SessionStore};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Remote services call this role `model`.
    #[serde(alias = "model")]
    Assistant,
}

impl Role {
    /// Label used when rendering the turn into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Append-only transcript of a single chat session.
///
/// Role alternation is not enforced.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in chronological order.
    pub fn render_for_display(&self) -> &[Turn] {
        &self.turns
    }

    /// Build the text to send for a message that has not been appended yet.
    pub fn build_prompt(&self, new_user_text: &str) -> String {
        if self.turns.is_empty() {
            return new_user_text.to_string();
        }

        let context = self
            .turns
            .iter()
            .map(Turn::render)
            .collect::<Vec<_>>()
            .join("\n");

        format!("Previous conversation:\n{context}\n\nUser: {new_user_text}")
    }

    /// Drop every turn.
    pub fn reset(&mut self) {
        self.turns = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn conversation(turns: &[Turn]) -> Conversation {
        let mut conv = Conversation::new();
        for turn in turns {
            conv.append(turn.clone());
        }
        conv
    }

    #[test]
    fn test_empty_conversation_passes_message_through() {
        let conv = Conversation::new();
        assert_eq!(conv.build_prompt("hello"), "hello");
    }

    #[test]
    fn test_prompt_includes_prior_exchange() {
        let conv = conversation(&[Turn::user("A"), Turn::assistant("B")]);
        assert_eq!(
            conv.build_prompt("C"),
            "Previous conversation:\nUser: A\nAssistant: B\n\nUser: C"
        );
    }

    #[test]
    fn test_prompt_preserves_turn_order_and_ends_with_new_message() {
        let conv = conversation(&[
            Turn::user("first"),
            Turn::assistant("second"),
            Turn::user("third"),
            Turn::assistant("fourth"),
        ]);
        let prompt = conv.build_prompt("fifth");

        assert!(prompt.starts_with(
            "Previous conversation:\nUser: first\nAssistant: second\nUser: third\nAssistant: fourth\n"
        ));
        assert!(prompt.ends_with("User: fifth"));
    }

    #[test]
    fn test_build_prompt_does_not_mutate() {
        let conv = conversation(&[Turn::user("hi")]);
        let _ = conv.build_prompt("again");
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn test_roles_are_not_forced_to_alternate() {
        let conv = conversation(&[Turn::user("one"), Turn::user("two")]);
        assert_eq!(
            conv.build_prompt("three"),
            "Previous conversation:\nUser: one\nUser: two\n\nUser: three"
        );
    }

    #[test]
    fn test_render_for_display_in_order() {
        let mut conv = Conversation::new();
        conv.append(Turn::user("hi"));
        conv.append(Turn::assistant("hello"));

        assert_eq!(
            conv.render_for_display(),
            &[
                Turn::new(Role::User, "hi"),
                Turn::new(Role::Assistant, "hello")
            ]
        );
    }

    #[test]
    fn test_reset_restores_pass_through() {
        let mut conv = conversation(&[Turn::user("A"), Turn::assistant("B")]);
        conv.reset();
        assert!(conv.is_empty());
        assert_eq!(conv.build_prompt("m"), "m");

        // Idempotent
        conv.reset();
        assert!(conv.render_for_display().is_empty());
    }

    #[test]
    fn test_multiline_content_is_kept_verbatim() {
        let conv = conversation(&[Turn::user("line 1\nline 2")]);
        assert_eq!(
            conv.build_prompt("next"),
            "Previous conversation:\nUser: line 1\nline 2\n\nUser: next"
        );
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Turn::assistant("x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);

        let turn: Turn = serde_json::from_str(r#"{"role":"model","content":"y"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
    }
}
