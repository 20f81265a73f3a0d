//! Rendering helpers shared by the HTML views.
//!
//! - [`markdown`]: sanitized markdown for untrusted model output
//! - [`style`]: bubble styling selected by [`Sender`](crate::chat::Sender)

pub mod markdown;
pub mod style;

pub use markdown::{escape_html, render_markdown};
pub use style::{Alignment, MessageStyle};
