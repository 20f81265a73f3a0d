//! Chat messages and sender tags.

use serde::{Deserialize, Serialize};

/// Fixed user-facing text appended when a turn fails.
///
/// Transport details are logged, never shown in the transcript.
pub const APOLOGY: &str = "Sorry, there was an error getting the response.";

/// Who produced a message.
///
/// This is the only tag used for formatting decisions, so every styling
/// path matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Text typed by the visitor.
    User,
    /// Reply returned by the remote chat endpoint.
    #[serde(alias = "ai")]
    Assistant,
    /// Placeholder appended when the remote call failed.
    Error,
}

impl Sender {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    sender: Sender,
}

impl Message {
    /// Create a message with an explicit sender.
    #[must_use]
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// A visitor message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// An assistant reply (markdown source).
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// The generic failure placeholder.
    #[must_use]
    pub fn error() -> Self {
        Self::new(Sender::Error, APOLOGY)
    }

    /// Display content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sender tag.
    #[must_use]
    pub fn sender(&self) -> Sender {
        self.sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wire_names() {
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Sender::Error.to_string(), "error");
    }

    #[test]
    fn test_legacy_ai_tag() {
        let sender: Sender = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(sender, Sender::Assistant);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(serde_json::from_str::<Sender>("\"bot\"").is_err());
    }

    #[test]
    fn test_error_message_uses_apology() {
        let msg = Message::error();
        assert_eq!(msg.sender(), Sender::Error);
        assert_eq!(msg.text(), APOLOGY);
    }
}
