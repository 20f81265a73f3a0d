//! Panel visibility and ambient interaction state.
//!
//! Independent of the conversation: closing the panel keeps the transcript.

/// Where a pointer-down landed relative to the widget container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerTarget {
    /// Inside the widget's bounding container.
    Inside,
    /// Anywhere else on the page.
    Outside,
}

/// Open/closed state of the floating panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetState {
    is_open: bool,
}

impl WidgetState {
    /// Closed panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the panel is expanded.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip the panel.
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Collapse the panel.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Handle a document pointer-down. Returns `true` if the panel closed.
    pub fn pointer_down(&mut self, target: PointerTarget) -> bool {
        if !self.outside_listener_attached() {
            return false;
        }
        match target {
            PointerTarget::Outside => {
                self.close();
                true
            }
            PointerTarget::Inside => false,
        }
    }

    /// The outside-pointer-down listener exists only while open.
    #[must_use]
    pub fn outside_listener_attached(&self) -> bool {
        self.is_open
    }
}

/// Decides how the message list scrolls to its newest entry.
///
/// Every render scrolls; fed the transcript revision after each render,
/// this asks for an animated scroll only when something was appended since
/// the previous render.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTracker {
    last_rendered: Option<u64>,
}

impl ScrollTracker {
    /// Tracker that has not rendered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a render of `revision`. Returns `true` if the scroll to the
    /// latest message should animate.
    pub fn after_render(&mut self, revision: u64) -> bool {
        let changed = self.last_rendered.is_none_or(|seen| revision > seen);
        self.last_rendered = Some(revision);
        changed && revision > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut widget = WidgetState::new();
        assert!(!widget.is_open());
        widget.toggle_open();
        assert!(widget.is_open());
        widget.toggle_open();
        assert!(!widget.is_open());
    }

    #[test]
    fn test_outside_pointer_closes() {
        let mut widget = WidgetState::new();
        widget.toggle_open();

        assert!(!widget.pointer_down(PointerTarget::Inside));
        assert!(widget.is_open());

        assert!(widget.pointer_down(PointerTarget::Outside));
        assert!(!widget.is_open());
    }

    #[test]
    fn test_listener_detached_while_closed() {
        let mut widget = WidgetState::new();
        assert!(!widget.outside_listener_attached());
        assert!(!widget.pointer_down(PointerTarget::Outside));
        assert!(!widget.is_open());
    }

    #[test]
    fn test_scroll_only_on_growth() {
        let mut tracker = ScrollTracker::new();
        assert!(!tracker.after_render(0));
        assert!(tracker.after_render(1));
        assert!(!tracker.after_render(1));
        assert!(tracker.after_render(3));
    }

    #[test]
    fn test_scroll_on_first_render_of_seeded_transcript() {
        let mut tracker = ScrollTracker::new();
        assert!(tracker.after_render(1));
    }
}
