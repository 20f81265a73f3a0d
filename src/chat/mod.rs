//! Floating chatbot widget core.
//!
//! # Architecture
//!
//! - [`message`]: immutable [`Message`] tagged with a closed [`Sender`]
//! - [`transcript`]: append-only [`Transcript`] store
//! - [`session`]: the single-flight [`ChatSession`] controller
//! - [`widget`]: panel visibility, outside-click dismissal and auto-scroll
//! - [`transport`]: the [`ChatTransport`] seam and its `reqwest` adapter
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ai_solution_site::chat::{ChatSession, HttpChatTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpChatTransport::new("http://127.0.0.1:5000", "/api/chat", None)?);
//! let session = ChatSession::new(transport, None);
//!
//! session.submit("Hello").await.ok();
//! assert_eq!(session.snapshot().messages.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod message;
pub mod session;
pub mod transcript;
pub mod transport;
pub mod widget;

pub use message::{APOLOGY, Message, Sender};
pub use session::{ChatSession, PendingTurn, Rejection, SessionState, SessionView, TurnOutcome};
pub use transcript::Transcript;
pub use transport::{ChatReply, ChatRequest, ChatTransport, ChatTransportError, HttpChatTransport};
pub use widget::{PointerTarget, ScrollTracker, WidgetState};
