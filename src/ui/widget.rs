//! Floating chatbot widget markup.
//!
//! The fragment is swapped as a whole (`#chat-widget`, `outerHTML`) after
//! every interaction. Two effects run in the browser:
//!
//! - the outside-pointer-down listener, emitted only while the panel is open
//! - scroll-to-latest, emitted on every render of a non-empty message list
//!   and run on `$nextTick`, after the new markup is in the DOM. A swapped-in
//!   list starts at the top, so the hook is needed even when nothing was
//!   appended; only the animation depends on growth.

use std::fmt::Write as _;

use crate::chat::{Message, SessionView, WidgetState};
use crate::render::{MessageStyle, escape_html, render_markdown};

/// Render the widget fragment.
///
/// `animate_scroll` selects a smooth scroll (the transcript grew since the
/// last render) over an instant jump.
#[must_use]
pub fn widget_view(
    widget_id: &str,
    widget: WidgetState,
    session: &SessionView,
    animate_scroll: bool,
) -> String {
    let id = escape_html(widget_id);
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        r##"<div id="chat-widget" class="fixed bottom-8 left-8 z-50" data-widget-id="{id}""##
    );
    if widget.outside_listener_attached() {
        let _ = write!(
            html,
            r##" x-data x-on:mousedown.outside="htmx.ajax('POST', '/widget/pointer', {{target: '#chat-widget', swap: 'outerHTML', values: {{widget_id: '{id}', target: 'outside'}}}})""##
        );
    }
    html.push('>');

    toggle_button(&mut html, &id, widget.is_open());

    if widget.is_open() {
        panel(&mut html, &id, session, animate_scroll);
    }

    html.push_str("</div>");
    html
}

fn toggle_button(html: &mut String, id: &str, is_open: bool) {
    let (state_classes, icon, label) = if is_open {
        ("bg-[#3E5879]", CLOSE_ICON, "Close chat")
    } else {
        ("bg-[#213555] hover:bg-[#3E5879]", CHAT_ICON, "Open chat")
    };
    let _ = write!(
        html,
        r##"<button type="button" aria-label="{label}" aria-expanded="{is_open}"
            class="w-16 h-16 rounded-full flex items-center justify-center shadow-lg text-white transition-colors duration-300 {state_classes}"
            hx-post="/widget/toggle" hx-vals="{{&quot;widget_id&quot;: &quot;{id}&quot;}}" hx-target="#chat-widget" hx-swap="outerHTML">{icon}</button>"##
    );
}

fn panel(html: &mut String, id: &str, session: &SessionView, animate_scroll: bool) {
    let _ = write!(
        html,
        r##"<div class="absolute bottom-20 left-0 w-80 bg-white rounded-xl shadow-2xl border border-[#D8C4B6]">
            <div class="bg-[#213555] text-white p-4 rounded-t-xl flex justify-between items-center">
                <h2 class="text-lg font-semibold">AI Chatbot</h2>
                <button type="button" aria-label="Close chat" class="hover:bg-[#3E5879] p-1 rounded-full"
                    hx-post="/widget/toggle" hx-vals="{{&quot;widget_id&quot;: &quot;{id}&quot;}}" hx-target="#chat-widget" hx-swap="outerHTML">{CLOSE_ICON}</button>
            </div>"##
    );

    html.push_str(
        r##"<div id="chat-messages" class="h-96 overflow-y-auto p-4 space-y-3 bg-[#F5EFE7]" aria-live="polite""##,
    );
    if !session.messages.is_empty() {
        let behavior = if animate_scroll { "smooth" } else { "instant" };
        let _ = write!(
            html,
            r##" x-data x-init="$nextTick(() => $el.querySelector('#chat-messages-end')?.scrollIntoView({{ behavior: '{behavior}', block: 'end' }}))""##
        );
    }
    html.push('>');

    for message in &session.messages {
        message_bubble(html, message);
    }

    if session.is_awaiting_response {
        let _ = write!(
            html,
            r##"<div class="flex justify-start" hx-get="/widget/panel?widget_id={id}" hx-trigger="load delay:700ms" hx-target="#chat-widget" hx-swap="outerHTML">
                <div class="bg-white border border-[#D8C4B6] text-[#213555] p-3 rounded-lg">
                    <div class="flex items-center"><span class="animate-pulse mr-2">●●●</span>AI is thinking...</div>
                </div>
            </div>"##
        );
    }

    html.push_str(r##"<div id="chat-messages-end"></div></div>"##);

    input_form(html, id, session);
    html.push_str("</div>");
}

fn message_bubble(html: &mut String, message: &Message) {
    let style = MessageStyle::for_sender(message.sender());
    let body = render_markdown(message.text());
    let _ = write!(
        html,
        r##"<div class="flex {align}" data-sender="{sender}">
            <div class="max-w-[80%] p-3 rounded-lg {bubble}">
                <div class="font-semibold text-xs mb-1">{label}</div>
                <div class="prose prose-sm max-w-none">{body}</div>
            </div>
        </div>"##,
        align = style.alignment.classes(),
        sender = message.sender(),
        bubble = style.bubble,
        label = style.label,
    );
}

fn input_form(html: &mut String, id: &str, session: &SessionView) {
    let awaiting = session.is_awaiting_response;
    let draft = escape_html(&session.draft_input);
    let input_disabled = if awaiting { " disabled" } else { "" };
    let submit_disabled = if session.can_submit { "" } else { " disabled" };

    let _ = write!(
        html,
        r##"<div class="p-4 bg-white rounded-b-xl border-t border-[#D8C4B6]">
            <form class="flex space-x-2" hx-post="/widget/messages" hx-target="#chat-widget" hx-swap="outerHTML"
                x-data="{{ message: '{draft_js}' }}">
                <input type="hidden" name="widget_id" value="{id}">
                <input type="text" name="message" value="{draft}" placeholder="Type a message..." autocomplete="off"
                    x-model="message"{input_disabled}
                    class="flex-1 p-2 border border-[#D8C4B6] rounded-lg focus:outline-none focus:ring-2 focus:ring-[#3E5879]">
                <button type="submit" aria-label="Send"{submit_disabled}
                    x-bind:disabled="{awaiting} || !message.trim()"
                    class="bg-[#213555] text-white p-2 rounded-lg hover:bg-[#3E5879] disabled:opacity-50">{SEND_ICON}</button>
            </form>
        </div>"##,
        draft_js = escape_js_single(&session.draft_input),
    );
}

/// Escape text for a single-quoted JS string inside a double-quoted attribute.
fn escape_js_single(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    escape_html(&out)
}

const CHAT_ICON: &str = r##"<svg class="h-6 w-6" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M7.9 20A9 9 0 1 0 4 16.1L2 22Z"/></svg>"##;

const CLOSE_ICON: &str = r##"<svg class="h-5 w-5" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M18 6 6 18"/><path d="m6 6 12 12"/></svg>"##;

const SEND_ICON: &str = r##"<svg class="h-5 w-5" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/></svg>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::PointerTarget;

    fn view(messages: Vec<Message>, awaiting: bool) -> SessionView {
        SessionView {
            revision: messages.len() as u64,
            messages,
            draft_input: String::new(),
            is_awaiting_response: awaiting,
            can_submit: false,
        }
    }

    fn open() -> WidgetState {
        let mut widget = WidgetState::new();
        widget.toggle_open();
        widget
    }

    #[test]
    fn test_closed_widget_has_no_panel_or_listener() {
        let session = view(vec![Message::user("hi")], false);
        let html = widget_view("w1", WidgetState::new(), &session, false);
        assert!(!html.contains("chat-messages"));
        assert!(!html.contains("mousedown.outside"));
        assert!(html.contains(r##"hx-target="#chat-widget""##));
    }

    #[test]
    fn test_open_widget_renders_messages_and_listener() {
        let session = view(vec![Message::user("Hello"), Message::assistant("**Hi** there!")], false);
        let html = widget_view("w1", open(), &session, true);
        assert!(html.contains("mousedown.outside"));
        assert!(html.contains("<strong>Hi</strong>"));
        assert!(html.contains(r#"data-sender="user""#));
        assert!(html.contains("behavior: 'smooth'"));
        assert!(!html.contains("AI is thinking"));
    }

    #[test]
    fn test_scroll_hook_present_without_growth() {
        let session = view(vec![Message::user("Hello")], true);
        let html = widget_view("w1", open(), &session, false);
        assert!(html.contains("scrollIntoView"));
        assert!(html.contains("behavior: 'instant'"));

        let empty = view(Vec::new(), false);
        assert!(!widget_view("w1", open(), &empty, false).contains("scrollIntoView"));
    }

    #[test]
    fn test_awaiting_shows_thinking_and_disables_input() {
        let session = view(vec![Message::user("Hello")], true);
        let html = widget_view("w1", open(), &session, false);
        assert!(html.contains("AI is thinking..."));
        assert!(html.contains(r#"x-model="message" disabled"#));
        assert!(html.contains(r#"aria-label="Send" disabled"#));
    }

    #[test]
    fn test_dismissed_widget_drops_listener() {
        let mut widget = open();
        widget.pointer_down(PointerTarget::Outside);
        let session = view(Vec::new(), false);
        let html = widget_view("w1", widget, &session, false);
        assert!(!html.contains("mousedown.outside"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let session = view(vec![Message::user("<b onclick=x>hi</b>")], false);
        let html = widget_view("w1", open(), &session, false);
        assert!(!html.contains("<b onclick"));
    }

    #[test]
    fn test_widget_id_is_escaped_in_attributes() {
        let session = view(Vec::new(), false);
        let html = widget_view(r#"x" onclick="y"#, open(), &session, false);
        assert!(!html.contains(r#"onclick="y"#));
    }

    #[test]
    fn test_escape_js_single() {
        assert_eq!(escape_js_single("it's"), "it\\&#39;s");
    }
}
