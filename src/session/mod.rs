//! Widget session registry.
//!
//! Each browser widget instance owns one [`WidgetSession`]: its chat
//! controller, panel state and scroll bookkeeping. Sessions live in memory
//! only and are identified by UUID.
//!
//! # Architecture
//!
//! - [`WidgetSession`]: one floating widget instance
//! - [`SessionStore`]: thread-safe registry of live widgets
//!
//! Removing a session, explicitly or through the idle sweep, tears its chat
//! controller down so that a response still in flight is discarded.

mod store;

pub use store::{SessionStore, WidgetSession};
