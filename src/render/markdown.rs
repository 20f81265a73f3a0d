//! Safe markdown to HTML conversion for model output.
//!
//! Replies come from a remote model and are untrusted. Raw HTML is shown
//! as text and only `http`, `https`, `mailto` and relative URLs survive.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Render `source` as sanitized HTML.
///
/// Malformed markdown degrades to text; this never fails.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(sanitize_event);

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, events);
    out
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) { url } else { CowStr::Borrowed("#") }
}

fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    match trimmed.find(':') {
        // A colon after the first path/query/fragment delimiter is not a scheme.
        Some(colon) if !trimmed[..colon].contains(['/', '?', '#']) => {
            let scheme = trimmed[..colon].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = render_markdown("**Hi** there");
        assert!(html.contains("<strong>Hi</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let inline = render_markdown("hello <img src=x onerror=alert(1)> world");
        assert!(!inline.contains("<img"));
    }

    #[test]
    fn test_unsafe_link_scheme_neutralized() {
        let html = render_markdown("[click](javascript:alert(1))");
        assert!(html.contains("href=\"#\""));
        assert!(!html.contains("javascript:"));

        let html = render_markdown("[site](https://example.com/a:b)");
        assert!(html.contains("href=\"https://example.com/a:b\""));

        let html = render_markdown("[rel](/docs?x=a:b)");
        assert!(html.contains("href=\"/docs?x=a:b\""));
    }

    #[test]
    fn test_unbalanced_markdown_does_not_fail() {
        let html = render_markdown("**unterminated _emphasis\n```\nunclosed fence");
        assert!(html.contains("unterminated"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
