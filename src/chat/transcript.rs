//! Append-only transcript store.

use super::message::Message;

/// Ordered sequence of chat messages for one widget session.
///
/// Insertion order is display order. Entries are never mutated or removed;
/// the whole transcript goes away with its owning session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    revision: u64,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with an assistant greeting.
    ///
    /// Blank greetings seed nothing.
    #[must_use]
    pub fn with_greeting(greeting: Option<&str>) -> Self {
        let mut transcript = Self::new();
        if let Some(text) = greeting.map(str::trim).filter(|s| !s.is_empty()) {
            transcript.append(Message::assistant(text));
        }
        transcript
    }

    /// Add a message to the end. Always succeeds.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Most recently appended message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Borrow all messages.
    #[must_use]
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Change counter, bumped on every append.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Sender;

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("A"));
        transcript.append(Message::assistant("R1"));
        transcript.append(Message::user("A"));

        let texts: Vec<_> = transcript.iter().map(Message::text).collect();
        assert_eq!(texts, ["A", "R1", "A"]);
        assert_eq!(transcript.revision(), 3);
    }

    #[test]
    fn test_greeting_seed() {
        let seeded = Transcript::with_greeting(Some("Hi! How can I help?"));
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded.last().unwrap().sender(), Sender::Assistant);

        assert!(Transcript::with_greeting(Some("   ")).is_empty());
        assert!(Transcript::with_greeting(None).is_empty());
    }
}
