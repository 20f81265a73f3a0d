//! HTML views.
//!
//! Pages are plain `format!` templates enhanced with HTMX and Alpine.js.
//! Every interpolated value that did not originate in this crate goes
//! through [`escape_html`](crate::render::escape_html) or the markdown
//! renderer.

mod admin;
mod shell;
mod site;
mod widget;

pub use admin::{
    AdminTable, INQUIRY_STATUSES, admin_layout, article_edit_view, dashboard_view, inquiries_view,
    login_view, resource_list_view, users_view,
};
pub use shell::{home_content, html_shell, not_found_content};
pub use site::{article_view, contact_view, events_view};
pub use widget::widget_view;
