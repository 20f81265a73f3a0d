//! Per-sender presentation of chat bubbles.

use crate::chat::Sender;

/// Horizontal placement of a bubble in the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left edge.
    Start,
    /// Right edge.
    End,
}

impl Alignment {
    /// Flex justification class.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Start => "justify-start",
            Self::End => "justify-end",
        }
    }
}

/// Visual treatment of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStyle {
    /// Bubble placement.
    pub alignment: Alignment,
    /// Bubble CSS classes.
    pub bubble: &'static str,
    /// Short label rendered above the text.
    pub label: &'static str,
}

impl MessageStyle {
    /// Style for `sender`.
    #[must_use]
    pub fn for_sender(sender: Sender) -> Self {
        match sender {
            Sender::User => Self {
                alignment: Alignment::End,
                bubble: "bg-[#3E5879] text-white",
                label: "You",
            },
            Sender::Assistant => Self {
                alignment: Alignment::Start,
                bubble: "bg-white border border-[#D8C4B6] text-[#213555]",
                label: "AI",
            },
            Sender::Error => Self {
                alignment: Alignment::Start,
                bubble: "bg-red-50 border border-red-300 text-red-700",
                label: "Error",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bubble_is_distinct() {
        let error = MessageStyle::for_sender(Sender::Error);
        let assistant = MessageStyle::for_sender(Sender::Assistant);
        assert_ne!(error.bubble, assistant.bubble);
        assert_eq!(error.label, "Error");
    }

    #[test]
    fn test_user_aligned_right() {
        assert_eq!(MessageStyle::for_sender(Sender::User).alignment, Alignment::End);
    }
}
