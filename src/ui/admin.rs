//! Admin pages.

use std::fmt::Write as _;

use crate::api::{
    Article, ArticleDraft, Articles, DashboardOverview, Events, Feedback, Feedbacks, Inquiry,
    PromotionalEvent, Resource, Role, Solution, Solutions, StatusCount, User,
};
use crate::auth::LOGIN_PATH;
use crate::render::escape_html;

/// Inquiry workflow states offered in the status picker.
pub const INQUIRY_STATUSES: [&str; 4] = ["pending", "in_progress", "resolved", "rejected"];

/// A collection listed on a generic admin table page.
pub trait AdminTable: Resource + Send + Sync + 'static {
    /// Page title.
    const TITLE: &'static str;
    /// Path segment under `/admin`.
    const SLUG: &'static str;
    /// Column headers, excluding the actions column.
    const HEADERS: &'static [&'static str];
    /// Whether rows link to an edit form.
    const EDITABLE: bool = false;

    /// Record id and its display cells, unescaped.
    fn row(record: &Self::Record) -> (i64, Vec<String>);
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl AdminTable for Articles {
    const TITLE: &'static str = "Articles";
    const SLUG: &'static str = "articles";
    const HEADERS: &'static [&'static str] = &["Title", "Author", "Category", "Published"];
    const EDITABLE: bool = true;

    fn row(article: &Article) -> (i64, Vec<String>) {
        (
            article.id,
            vec![
                article.title.clone(),
                or_dash(article.author_name.as_deref()),
                or_dash(article.category.as_deref()),
                or_dash(article.published_date.as_deref()),
            ],
        )
    }
}

impl AdminTable for Events {
    const TITLE: &'static str = "Events";
    const SLUG: &'static str = "events";
    const HEADERS: &'static [&'static str] = &["Name", "Location", "Starts", "Upcoming"];

    fn row(event: &PromotionalEvent) -> (i64, Vec<String>) {
        (
            event.id,
            vec![
                event.event_name.clone(),
                or_dash(event.location.as_deref()),
                or_dash(event.event_start_date.as_deref()),
                (if event.is_upcoming { "yes" } else { "no" }).to_string(),
            ],
        )
    }
}

impl AdminTable for Solutions {
    const TITLE: &'static str = "Solutions";
    const SLUG: &'static str = "solutions";
    const HEADERS: &'static [&'static str] = &["Title", "Industry", "Customer"];

    fn row(solution: &Solution) -> (i64, Vec<String>) {
        (
            solution.id,
            vec![
                solution.title.clone(),
                or_dash(solution.industry.as_deref()),
                solution.customer_id.to_string(),
            ],
        )
    }
}

impl AdminTable for Feedbacks {
    const TITLE: &'static str = "Feedback";
    const SLUG: &'static str = "feedbacks";
    const HEADERS: &'static [&'static str] = &["Customer", "Rating", "Feedback", "Date"];

    fn row(feedback: &Feedback) -> (i64, Vec<String>) {
        (
            feedback.id,
            vec![
                feedback.customer_id.to_string(),
                feedback
                    .rating
                    .map_or_else(|| "-".to_string(), |r| format!("{r}/5")),
                or_dash(feedback.feedback_text.as_deref()),
                or_dash(feedback.feedback_date.as_deref()),
            ],
        )
    }
}

/// Admin page frame: section nav plus `body`.
#[must_use]
pub fn admin_layout(active: &str, body: &str) -> String {
    let mut nav = String::new();
    for (slug, label) in [
        ("dashboard", "Dashboard"),
        ("articles", "Articles"),
        ("events", "Events"),
        ("solutions", "Solutions"),
        ("feedbacks", "Feedback"),
        ("inquiries", "Inquiries"),
        ("users", "Users"),
    ] {
        let state = if slug == active {
            "bg-[#213555] text-white"
        } else {
            "hover:bg-[#D8C4B6]"
        };
        let _ = write!(
            nav,
            r#"<a href="/admin/{slug}" class="px-3 py-2 rounded-lg text-sm {state}">{label}</a>"#
        );
    }

    format!(
        r#"
    <div class="flex items-center justify-between mb-6">
        <nav class="flex flex-wrap gap-1">{nav}</nav>
        <form method="post" action="/admin/logout">
            <button type="submit" class="px-4 py-2 rounded-lg bg-[#213555] text-white hover:bg-[#3E5879]">Sign out</button>
        </form>
    </div>
    {body}
    "#
    )
}

/// Login form, with an optional error banner.
#[must_use]
pub fn login_view(error: Option<&str>) -> String {
    let banner = error_banner(error);

    format!(
        r#"
    <div class="max-w-sm mx-auto rounded-2xl bg-white p-8 shadow-lg">
        <h1 class="text-2xl font-bold mb-6">Admin sign in</h1>
        {banner}
        <form method="post" action="{LOGIN_PATH}" class="space-y-4">
            <label class="block">
                <span class="text-sm">Username</span>
                <input type="text" name="username" required autocomplete="username"
                    class="mt-1 w-full p-2 border border-[#D8C4B6] rounded-lg">
            </label>
            <label class="block">
                <span class="text-sm">Password</span>
                <input type="password" name="password" required autocomplete="current-password"
                    class="mt-1 w-full p-2 border border-[#D8C4B6] rounded-lg">
            </label>
            <button type="submit" class="w-full py-2 rounded-lg bg-[#213555] text-white hover:bg-[#3E5879]">Sign in</button>
        </form>
    </div>
    "#
    )
}

/// Dashboard overview with inquiry counts per status.
#[must_use]
pub fn dashboard_view(overview: &DashboardOverview, statuses: &[StatusCount]) -> String {
    let mut rows = String::new();
    for entry in statuses {
        let _ = write!(
            rows,
            r#"<tr><td class="py-1 pr-6">{}</td><td class="py-1 text-right">{}</td></tr>"#,
            escape_html(&entry.status),
            entry.count
        );
    }
    if rows.is_empty() {
        rows.push_str(r#"<tr><td colspan="2" class="py-1 text-[#3E5879]">No inquiries yet</td></tr>"#);
    }

    let body = format!(
        r#"
    <h1 class="text-2xl font-bold mb-8">Dashboard</h1>
    <div class="grid gap-4 md:grid-cols-4 mb-8">
        {users}
        {inquiries}
        {articles}
        {events}
    </div>
    <section class="rounded-2xl bg-white p-6 shadow">
        <h2 class="font-semibold mb-4">Inquiries by status</h2>
        <table class="text-sm"><tbody>{rows}</tbody></table>
    </section>
    "#,
        users = stat_card("Users", overview.total_users),
        inquiries = stat_card("Inquiries", overview.total_inquiries),
        articles = stat_card("Articles", overview.total_articles),
        events = stat_card("Upcoming events", overview.upcoming_events),
    );
    admin_layout("dashboard", &body)
}

fn stat_card(label: &str, value: u64) -> String {
    format!(
        r#"<div class="p-5 rounded-2xl bg-white shadow"><div class="text-sm text-[#3E5879]">{label}</div><div class="text-3xl font-bold">{value}</div></div>"#
    )
}

/// Table of `R` records with delete (and optionally edit) actions.
#[must_use]
pub fn resource_list_view<R: AdminTable>(records: &[R::Record]) -> String {
    let mut head = String::new();
    for header in R::HEADERS {
        let _ = write!(head, r#"<th class="py-2 pr-6 text-left">{header}</th>"#);
    }

    let mut rows = String::new();
    for record in records {
        let (id, cells) = R::row(record);
        rows.push_str(r#"<tr class="border-t border-[#D8C4B6]">"#);
        for cell in &cells {
            let _ = write!(rows, r#"<td class="py-2 pr-6">{}</td>"#, escape_html(cell));
        }
        rows.push_str(r#"<td class="py-2 flex gap-2">"#);
        if R::EDITABLE {
            let _ = write!(
                rows,
                r#"<a href="/admin/{slug}/{id}/edit" class="px-3 py-1 rounded-lg border border-[#213555]">Edit</a>"#,
                slug = R::SLUG
            );
        }
        let _ = write!(
            rows,
            r#"<form method="post" action="/admin/{slug}/{id}/delete"><button type="submit" class="px-3 py-1 rounded-lg bg-red-600 text-white">Delete</button></form></td></tr>"#,
            slug = R::SLUG
        );
    }
    if records.is_empty() {
        let _ = write!(
            rows,
            r#"<tr><td colspan="{}" class="py-2 text-[#3E5879]">Nothing here yet</td></tr>"#,
            R::HEADERS.len() + 1
        );
    }

    let body = format!(
        r#"
    <h1 class="text-2xl font-bold mb-6">{title}</h1>
    <section class="rounded-2xl bg-white p-6 shadow overflow-x-auto">
        <table class="text-sm w-full"><thead><tr>{head}<th></th></tr></thead><tbody>{rows}</tbody></table>
    </section>
    "#,
        title = R::TITLE
    );
    admin_layout(R::SLUG, &body)
}

/// Article edit form.
#[must_use]
pub fn article_edit_view(id: i64, draft: &ArticleDraft, error: Option<&str>) -> String {
    let banner = error_banner(error);
    let body = format!(
        r#"
    <h1 class="text-2xl font-bold mb-6">Edit article</h1>
    {banner}
    <form method="post" action="/admin/articles/{id}" class="space-y-4 rounded-2xl bg-white p-6 shadow">
        <input type="hidden" name="author_id" value="{author_id}">
        {title}
        <label class="block"><span class="text-sm">Content</span>
            <textarea name="content" rows="10" class="mt-1 w-full p-2 border border-[#D8C4B6] rounded-lg">{content}</textarea>
        </label>
        {category}
        {image_url}
        <button type="submit" class="px-4 py-2 rounded-lg bg-[#213555] text-white hover:bg-[#3E5879]">Save</button>
    </form>
    "#,
        author_id = draft.author_id,
        title = text_field("title", "Title", &draft.title),
        content = escape_html(&draft.content),
        category = text_field("category", "Category", draft.category.as_deref().unwrap_or_default()),
        image_url = text_field("image_url", "Image URL", draft.image_url.as_deref().unwrap_or_default()),
    );
    admin_layout("articles", &body)
}

/// Inquiries with a status filter and a per-row status picker.
#[must_use]
pub fn inquiries_view(inquiries: &[Inquiry], filter: Option<&str>) -> String {
    let mut filters = String::from(r#"<a href="/admin/inquiries" class="px-3 py-1 rounded-lg border">All</a>"#);
    for status in INQUIRY_STATUSES {
        let state = if filter == Some(status) { " bg-[#213555] text-white" } else { "" };
        let _ = write!(
            filters,
            r#"<a href="/admin/inquiries?status={status}" class="px-3 py-1 rounded-lg border{state}">{status}</a>"#
        );
    }

    let mut rows = String::new();
    for inquiry in inquiries {
        let current = inquiry.status.as_deref().unwrap_or("pending");
        let mut options = String::new();
        for status in INQUIRY_STATUSES {
            let selected = if status == current { " selected" } else { "" };
            let _ = write!(options, r#"<option value="{status}"{selected}>{status}</option>"#);
        }
        let _ = write!(
            rows,
            r#"<tr class="border-t border-[#D8C4B6]">
                <td class="py-2 pr-6">{name}</td><td class="py-2 pr-6">{email}</td>
                <td class="py-2 pr-6">{company}</td><td class="py-2 pr-6">{reason}</td>
                <td class="py-2"><form method="post" action="/admin/inquiries/{id}/status" class="flex gap-2">
                    <select name="status" class="border rounded-lg p-1">{options}</select>
                    <button type="submit" class="px-3 py-1 rounded-lg bg-[#213555] text-white">Update</button>
                </form></td>
            </tr>"#,
            id = inquiry.id,
            name = escape_html(&inquiry.full_name),
            email = escape_html(&inquiry.email),
            company = escape_html(inquiry.company_name.as_deref().unwrap_or("-")),
            reason = escape_html(inquiry.inquiry_reason.as_deref().unwrap_or("-")),
        );
    }
    if inquiries.is_empty() {
        rows.push_str(r#"<tr><td colspan="5" class="py-2 text-[#3E5879]">No inquiries</td></tr>"#);
    }

    let body = format!(
        r#"
    <h1 class="text-2xl font-bold mb-6">Inquiries</h1>
    <div class="flex gap-2 mb-4 text-sm">{filters}</div>
    <section class="rounded-2xl bg-white p-6 shadow overflow-x-auto">
        <table class="text-sm w-full">
            <thead><tr><th class="text-left">Name</th><th class="text-left">Email</th><th class="text-left">Company</th><th class="text-left">Reason</th><th class="text-left">Status</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
    </section>
    "#
    );
    admin_layout("inquiries", &body)
}

/// Accounts with a per-row role picker.
#[must_use]
pub fn users_view(users: &[User]) -> String {
    let mut rows = String::new();
    for user in users {
        let mut options = String::new();
        for role in Role::ALL {
            let selected = if role == user.role { " selected" } else { "" };
            let _ = write!(options, r#"<option value="{r}"{selected}>{r}</option>"#, r = role.as_str());
        }
        let _ = write!(
            rows,
            r#"<tr class="border-t border-[#D8C4B6]">
                <td class="py-2 pr-6">{username}</td><td class="py-2 pr-6">{email}</td>
                <td class="py-2"><form method="post" action="/admin/users/{id}/role" class="flex gap-2">
                    <select name="role" class="border rounded-lg p-1">{options}</select>
                    <button type="submit" class="px-3 py-1 rounded-lg bg-[#213555] text-white">Update</button>
                </form></td>
            </tr>"#,
            id = user.id,
            username = escape_html(&user.username),
            email = escape_html(&user.email),
        );
    }

    let body = format!(
        r#"
    <h1 class="text-2xl font-bold mb-6">Users</h1>
    <section class="rounded-2xl bg-white p-6 shadow overflow-x-auto">
        <table class="text-sm w-full">
            <thead><tr><th class="text-left">Username</th><th class="text-left">Email</th><th class="text-left">Role</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
    </section>
    "#
    );
    admin_layout("users", &body)
}

/// Red alert box, or nothing.
pub(crate) fn error_banner(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!(
            r#"<div role="alert" class="mb-4 p-3 rounded-lg bg-red-50 border border-red-300 text-red-700 text-sm">{}</div>"#,
            escape_html(e)
        )
    })
}

pub(crate) fn text_field(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label class="block"><span class="text-sm">{label}</span>
            <input type="text" name="{name}" value="{value}" class="mt-1 w-full p-2 border border-[#D8C4B6] rounded-lg"></label>"#,
        value = escape_html(value),
    )
}
