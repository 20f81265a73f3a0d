//! AI Solution marketing site with a floating chatbot widget.
//!
//! Server-rendered with Axum, enhanced with HTMX and Alpine.js. The widget's
//! state lives on the server, one session per browser widget, and every
//! interaction swaps a fresh widget fragment into the page.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving pages, widget fragments and admin views
//! - **Chat**: single-flight chat controller over a pluggable transport
//! - **API**: typed client for the back-office REST API
//! - **UI**: `format!` templates + HTMX + Alpine.js
//!
//! # Modules
//!
//! - [`chat`]: messages, transcript, chat controller, widget state, transport
//! - [`render`]: sanitized markdown and per-sender styling
//! - [`session`]: widget session registry and idle eviction
//! - [`auth`]: explicit admin session context and route gate
//! - [`api`]: REST client for articles, events, solutions, inquiries, users
//! - [`ui`]: HTML views
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod render;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use api::ApiClient;
use config::AppConfig;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Live widget sessions.
    pub sessions: SessionStore,
    /// Back-office REST client.
    pub api: Arc<ApiClient>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
