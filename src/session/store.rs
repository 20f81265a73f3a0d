//! Widget sessions and their store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::chat::{ChatSession, ChatTransport, PointerTarget, ScrollTracker, WidgetState};

/// Default idle timeout (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A single floating widget instance.
///
/// Cheap to clone; clones share state.
pub struct WidgetSession {
    inner: Arc<WidgetSessionInner>,
}

struct WidgetSessionInner {
    id: String,
    chat: ChatSession<dyn ChatTransport>,
    ui: Mutex<WidgetUi>,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct WidgetUi {
    widget: WidgetState,
    scroll: ScrollTracker,
}

impl Clone for WidgetSession {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for WidgetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetSession")
            .field("id", &self.inner.id)
            .field("created_at", &self.inner.created_at)
            .finish_non_exhaustive()
    }
}

impl WidgetSession {
    fn new(id: String, transport: Arc<dyn ChatTransport>, greeting: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(WidgetSessionInner {
                id,
                chat: ChatSession::new(transport, greeting),
                ui: Mutex::new(WidgetUi::default()),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The chat controller.
    #[must_use]
    pub fn chat(&self) -> &ChatSession<dyn ChatTransport> {
        &self.inner.chat
    }

    /// Current panel state.
    #[must_use]
    pub fn widget(&self) -> WidgetState {
        self.ui().widget
    }

    /// Flip the panel open or closed.
    pub fn toggle_open(&self) -> WidgetState {
        self.touch();
        let mut ui = self.ui();
        ui.widget.toggle_open();
        ui.widget
    }

    /// Handle a pointer-down reported by the page.
    pub fn pointer_down(&self, target: PointerTarget) -> WidgetState {
        self.touch();
        let mut ui = self.ui();
        if ui.widget.pointer_down(target) {
            tracing::debug!(name: "widget.dismissed", session_id = %self.inner.id, "Closed on outside pointer-down");
        }
        ui.widget
    }

    /// Record that the transcript at `revision` is being rendered.
    ///
    /// Returns `true` if the scroll to the newest message should animate.
    pub fn after_render(&self, revision: u64) -> bool {
        self.ui().scroll.after_render(revision)
    }

    /// Update the last activity timestamp.
    pub fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative durations (clock skew) never expire.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    /// Get the session age.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.inner.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn ui(&self) -> MutexGuard<'_, WidgetUi> {
        self.inner.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe store for widget sessions.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    sessions: RwLock<HashMap<String, WidgetSession>>,
    transport: Arc<dyn ChatTransport>,
    greeting: Option<String>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("len", &self.len())
            .field("greeting", &self.inner.greeting)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store whose sessions talk to `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, greeting: Option<String>) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                transport,
                greeting,
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> WidgetSession {
        self.create_with_id(Uuid::new_v4().to_string())
    }

    /// Create a new session with a specific ID.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> WidgetSession {
        let id = id.into();
        let session = WidgetSession::new(
            id.clone(),
            Arc::clone(&self.inner.transport),
            self.inner.greeting.as_deref(),
        );
        let previous = self.write().insert(id, session.clone());
        if let Some(previous) = previous {
            previous.chat().teardown();
        }
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<WidgetSession> {
        self.read().get(id).cloned()
    }

    /// Get a session by ID, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> WidgetSession {
        if let Some(session) = self.get(id) {
            return session;
        }

        let mut guard = self.write();
        // Another request may have created it between the two locks.
        if let Some(session) = guard.get(id) {
            return session.clone();
        }
        let session = WidgetSession::new(
            id.to_string(),
            Arc::clone(&self.inner.transport),
            self.inner.greeting.as_deref(),
        );
        guard.insert(id.to_string(), session.clone());
        session
    }

    /// Remove a session and tear down its chat controller.
    pub fn remove(&self, id: &str) -> Option<WidgetSession> {
        let removed = self.write().remove(id);
        if let Some(session) = &removed {
            session.chat().teardown();
        }
        removed
    }

    /// Get the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions idle for longer than [`DEFAULT_IDLE_TIMEOUT`].
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    /// Remove sessions idle for longer than `timeout`, tearing each down.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|_, session| {
            let expired = session.is_expired_with_timeout(timeout);
            if expired {
                session.chat().teardown();
            }
            !expired
        });
        before - guard.len()
    }

    /// Run [`cleanup_expired_with_timeout`](Self::cleanup_expired_with_timeout)
    /// every `interval` until the runtime shuts down.
    pub fn spawn_sweeper(&self, interval: Duration, timeout: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired_with_timeout(timeout);
                if removed > 0 {
                    tracing::info!(
                        name: "widget.sessions.expired",
                        removed = removed,
                        remaining = store.len(),
                        "Expired idle widget sessions"
                    );
                }
            }
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, WidgetSession>> {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, WidgetSession>> {
        self.inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatTransportError;

    struct Echo;

    #[async_trait::async_trait]
    impl ChatTransport for Echo {
        async fn send(&self, message: &str) -> Result<String, ChatTransportError> {
            Ok(format!("echo: {message}"))
        }
    }

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(Echo), None)
    }

    #[test]
    fn test_session_store() {
        let store = store();
        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());

        store.remove(session.id());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_or_create_reuses() {
        let store = store();
        let a = store.get_or_create("w1");
        a.toggle_open();
        let b = store.get_or_create("w1");
        assert!(b.widget().is_open());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_discards_in_flight_turn() {
        let store = store();
        let session = store.create();
        let turn = session.chat().begin("Hello").unwrap();

        store.remove(session.id());

        let outcome = session.chat().run(turn).await;
        assert_eq!(outcome, crate::chat::TurnOutcome::Discarded);
        assert_eq!(session.chat().snapshot().messages.len(), 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = store();
        let _ = store.create();
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_secs(3600)), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.cleanup_expired_with_timeout(Duration::ZERO), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_greeting_seeds_new_sessions() {
        let store = SessionStore::new(Arc::new(Echo), Some("Welcome!".into()));
        let session = store.create();
        let view = session.chat().snapshot();
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].text(), "Welcome!");
    }
}
