//! Chat session controller.
//!
//! Drives one conversational turn at a time:
//!
//! ```text
//! Idle --submit(non-blank)--> AwaitingResponse --Ok--> Idle (+assistant)
//!                                              \--Err--> Idle (+error)
//! ```
//!
//! Submitting while a turn is in flight, or with a blank draft, is a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::message::{Message, Sender};
use super::transcript::Transcript;
use super::transport::{ChatTransport, ChatTransportError};

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Draft was empty or whitespace-only.
    EmptyInput,
    /// A request is already in flight.
    AwaitingResponse,
    /// The owning widget was torn down.
    TornDown,
}

/// Result of settling a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A reply or error placeholder was appended.
    Completed(Sender),
    /// The session was torn down before the response arrived.
    Discarded,
}

/// A turn that has been started and awaits its transport result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending turn must be run or the session stays busy"]
pub struct PendingTurn {
    text: String,
}

impl PendingTurn {
    /// Trimmed user text sent to the endpoint.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Mutable state of a single chat session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    transcript: Transcript,
    draft_input: String,
    is_awaiting_response: bool,
    torn_down: bool,
}

impl SessionState {
    /// Fresh idle state, optionally seeded with a greeting.
    #[must_use]
    pub fn new(greeting: Option<&str>) -> Self {
        Self {
            transcript: Transcript::with_greeting(greeting),
            ..Self::default()
        }
    }

    /// Replace the in-progress draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_input = text.into();
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_awaiting_response && !self.torn_down && !self.draft_input.trim().is_empty()
    }

    /// Start a turn from the current draft.
    ///
    /// On success the draft is cleared, the trimmed user message appended
    /// and the session marked as awaiting a response.
    pub fn begin_turn(&mut self) -> Result<PendingTurn, Rejection> {
        if self.torn_down {
            return Err(Rejection::TornDown);
        }
        if self.is_awaiting_response {
            return Err(Rejection::AwaitingResponse);
        }
        let text = self.draft_input.trim();
        if text.is_empty() {
            return Err(Rejection::EmptyInput);
        }

        let text = text.to_string();
        self.draft_input.clear();
        self.transcript.append(Message::user(text.clone()));
        self.is_awaiting_response = true;
        Ok(PendingTurn { text })
    }

    /// Apply the transport result of the in-flight turn.
    pub fn settle(&mut self, result: Result<String, ChatTransportError>) -> TurnOutcome {
        if self.torn_down {
            return TurnOutcome::Discarded;
        }

        let message = match result {
            Ok(text) => Message::assistant(text),
            Err(e) => {
                tracing::warn!(name: "chat.turn.failed", error = %e, "Chat turn failed");
                Message::error()
            }
        };
        let sender = message.sender();
        self.transcript.append(message);
        self.is_awaiting_response = false;
        TurnOutcome::Completed(sender)
    }

    /// Mark the owning widget as gone. Late results are dropped.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    /// Transcript so far.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current draft text.
    #[must_use]
    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// Whether a turn is in flight.
    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.is_awaiting_response
    }

    /// Whether the owning widget has been torn down.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

/// Read-only copy of a session for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Messages in display order.
    pub messages: Vec<Message>,
    /// Transcript change counter.
    pub revision: u64,
    /// Draft text.
    pub draft_input: String,
    /// Whether a turn is in flight.
    pub is_awaiting_response: bool,
    /// Whether the submit control is enabled.
    pub can_submit: bool,
}

/// Shared async controller over a [`SessionState`] and a transport.
pub struct ChatSession<T: ?Sized> {
    state: Arc<Mutex<SessionState>>,
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for ChatSession<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for ChatSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl<T: ChatTransport + ?Sized> ChatSession<T> {
    /// Create a session using `transport` for every turn.
    #[must_use]
    pub fn new(transport: Arc<T>, greeting: Option<&str>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(greeting))),
            transport,
        }
    }

    /// Start a turn with `draft` as the submitted input.
    pub fn begin(&self, draft: &str) -> Result<PendingTurn, Rejection> {
        let mut state = self.lock();
        if state.is_torn_down() {
            return Err(Rejection::TornDown);
        }
        if state.is_awaiting_response() {
            // Keep the composing text; the submit control is disabled anyway.
            return Err(Rejection::AwaitingResponse);
        }
        state.set_draft(draft);
        let turn = state.begin_turn();
        if let Ok(turn) = &turn {
            tracing::info!(
                name: "chat.turn.started",
                message_length = turn.text.len(),
                transcript_len = state.transcript().len(),
                "Chat turn started"
            );
        }
        turn
    }

    /// Call the transport for `turn` and settle the result.
    ///
    /// The lock is not held across the network call.
    pub async fn run(&self, turn: PendingTurn) -> TurnOutcome {
        let result = self.transport.send(&turn.text).await;
        let outcome = self.lock().settle(result);
        if outcome == TurnOutcome::Discarded {
            tracing::debug!(name: "chat.turn.discarded", "Dropped late response for torn-down session");
        }
        outcome
    }

    /// Submit `draft` and wait for the turn to settle.
    pub async fn submit(&self, draft: &str) -> Result<TurnOutcome, Rejection> {
        let turn = self.begin(draft)?;
        Ok(self.run(turn).await)
    }

    /// Store the composing text without submitting it.
    pub fn set_draft(&self, draft: &str) {
        self.lock().set_draft(draft);
    }

    /// Mark the owning widget as gone.
    pub fn teardown(&self) {
        self.lock().tear_down();
    }

    /// Copy out everything a view needs.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        let state = self.lock();
        SessionView {
            messages: state.transcript().as_slice().to_vec(),
            revision: state.transcript().revision(),
            draft_input: state.draft_input().to_string(),
            is_awaiting_response: state.is_awaiting_response(),
            can_submit: state.can_submit(),
        }
    }

    /// Whether a turn is in flight.
    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.lock().is_awaiting_response()
    }
}

impl<T: ?Sized> ChatSession<T> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::APOLOGY;

    fn state_with_draft(draft: &str) -> SessionState {
        let mut state = SessionState::new(None);
        state.set_draft(draft);
        state
    }

    #[test]
    fn test_begin_turn_trims_and_clears_draft() {
        let mut state = state_with_draft("  Hello  ");
        let turn = state.begin_turn().unwrap();

        assert_eq!(turn.text(), "Hello");
        assert_eq!(state.draft_input(), "");
        assert!(state.is_awaiting_response());
        assert_eq!(state.transcript().last().unwrap(), &Message::user("Hello"));
    }

    #[test]
    fn test_whitespace_rejected() {
        for draft in ["", "   ", "\n\t"] {
            let mut state = state_with_draft(draft);
            assert_eq!(state.begin_turn(), Err(Rejection::EmptyInput));
            assert!(state.transcript().is_empty());
            assert!(!state.is_awaiting_response());
        }
    }

    #[test]
    fn test_single_flight() {
        let mut state = state_with_draft("A");
        let _turn = state.begin_turn().unwrap();

        state.set_draft("B");
        assert!(!state.can_submit());
        assert_eq!(state.begin_turn(), Err(Rejection::AwaitingResponse));
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn test_settle_failure_appends_apology() {
        let mut state = state_with_draft("Test");
        let _turn = state.begin_turn().unwrap();

        let outcome = state.settle(Err(ChatTransportError::Status(500)));
        assert_eq!(outcome, TurnOutcome::Completed(Sender::Error));
        assert!(!state.is_awaiting_response());

        let last = state.transcript().last().unwrap();
        assert_eq!(last.sender(), Sender::Error);
        assert_eq!(last.text(), APOLOGY);
    }

    #[test]
    fn test_settle_after_teardown_is_discarded() {
        let mut state = state_with_draft("Hello");
        let _turn = state.begin_turn().unwrap();
        state.tear_down();

        assert_eq!(state.settle(Ok("late".into())), TurnOutcome::Discarded);
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn test_can_submit_tracks_draft() {
        let mut state = SessionState::new(None);
        assert!(!state.can_submit());
        state.set_draft("  ");
        assert!(!state.can_submit());
        state.set_draft("hi");
        assert!(state.can_submit());
    }
}
