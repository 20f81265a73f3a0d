//! Public pages backed by the REST API.

use std::fmt::Write as _;

use super::admin::{error_banner, text_field};
use crate::api::{Article, PromotionalEvent};
use crate::render::{escape_html, render_markdown};

/// Upcoming events listing.
#[must_use]
pub fn events_view(events: &[PromotionalEvent]) -> String {
    let mut cards = String::new();
    for event in events {
        let when = match (&event.event_start_date, &event.event_end_date) {
            (Some(start), Some(end)) => format!("{} to {}", escape_html(start), escape_html(end)),
            (Some(start), None) => escape_html(start),
            _ => "Date to be announced".to_string(),
        };
        let _ = write!(
            cards,
            r#"<article class="p-5 rounded-2xl bg-white shadow">
                <h2 class="font-semibold text-lg mb-1">{name}</h2>
                <p class="text-xs text-[#3E5879] mb-3">{when}{location}</p>
                <div class="prose prose-sm max-w-none">{description}</div>
            </article>"#,
            name = escape_html(&event.event_name),
            location = event
                .location
                .as_deref()
                .map(|l| format!(" &middot; {}", escape_html(l)))
                .unwrap_or_default(),
            description = render_markdown(event.event_description.as_deref().unwrap_or_default()),
        );
    }
    if events.is_empty() {
        cards.push_str(r#"<p class="text-[#3E5879]">No upcoming events right now. Check back soon.</p>"#);
    }

    format!(
        r#"
    <h1 class="text-3xl font-bold mb-6">Upcoming events</h1>
    <div class="grid gap-4 md:grid-cols-2">{cards}</div>
    "#
    )
}

/// One article, with its body rendered as sanitized markdown.
#[must_use]
pub fn article_view(article: &Article) -> String {
    let byline = match (&article.author_name, &article.published_date) {
        (Some(author), Some(date)) => format!("{} &middot; {}", escape_html(author), escape_html(date)),
        (Some(author), None) => escape_html(author),
        (None, Some(date)) => escape_html(date),
        (None, None) => String::new(),
    };

    format!(
        r#"
    <article class="rounded-3xl bg-white p-10 shadow-lg">
        <h1 class="text-3xl font-bold mb-2">{title}</h1>
        <p class="text-sm text-[#3E5879] mb-8">{byline}</p>
        <div class="prose max-w-none">{body}</div>
    </article>
    "#,
        title = escape_html(&article.title),
        body = render_markdown(&article.content),
    )
}

/// Contact form. `sent` replaces the form with a confirmation.
#[must_use]
pub fn contact_view(error: Option<&str>, sent: bool) -> String {
    if sent {
        return r#"
    <section class="max-w-xl mx-auto rounded-2xl bg-white p-8 shadow-lg" role="status">
        <h1 class="text-2xl font-bold mb-4">Thank you</h1>
        <p>Your inquiry has been received. Our team will get back to you shortly.</p>
    </section>
    "#
        .to_string();
    }

    let banner = error_banner(error);
    format!(
        r#"
    <section class="max-w-xl mx-auto rounded-2xl bg-white p-8 shadow-lg">
        <h1 class="text-2xl font-bold mb-6">Contact us</h1>
        {banner}
        <form method="post" action="/contact" class="space-y-4">
            {full_name}
            {email}
            {phone}
            {company}
            {country}
            {product}
            <label class="block"><span class="text-sm">How can we help?</span>
                <textarea name="inquiry_reason" rows="5" class="mt-1 w-full p-2 border border-[#D8C4B6] rounded-lg"></textarea>
            </label>
            <button type="submit" class="px-6 py-2 rounded-lg bg-[#213555] text-white hover:bg-[#3E5879]">Send</button>
        </form>
    </section>
    "#,
        full_name = text_field("full_name", "Full name", ""),
        email = text_field("email", "Email", ""),
        phone = text_field("phone_number", "Phone", ""),
        company = text_field("company_name", "Company", ""),
        country = text_field("country", "Country", ""),
        product = text_field("interested_product", "Interested in", ""),
    )
}
