//! Route gate for the admin back-office.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::session::AuthSession;

/// Admin login page.
pub const LOGIN_PATH: &str = "/admin/login";
/// Landing page after login.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Outcome of checking a path against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through.
    Pass,
    /// Send the browser elsewhere.
    Redirect(&'static str),
}

/// Decide whether `path` may be served.
///
/// Signed-in visitors skip the login page; anonymous visitors are sent to
/// it from every other admin path.
#[must_use]
pub fn admin_gate(path: &str, authenticated: bool) -> GateDecision {
    let is_admin_path = path == "/admin" || path.starts_with("/admin/");
    if path == LOGIN_PATH {
        if authenticated {
            return GateDecision::Redirect(DASHBOARD_PATH);
        }
        return GateDecision::Pass;
    }
    if is_admin_path && !authenticated {
        return GateDecision::Redirect(LOGIN_PATH);
    }
    GateDecision::Pass
}

/// Middleware applying [`admin_gate`] and exposing the [`AuthSession`]
/// to handlers through request extensions.
pub async fn admin_gate_middleware(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let auth = AuthSession::init(&jar);
    match admin_gate(request.uri().path(), auth.is_authenticated()) {
        GateDecision::Redirect(to) => {
            tracing::debug!(
                name: "auth.gate.redirect",
                path = %request.uri().path(),
                to = to,
                "Admin gate redirect"
            );
            Redirect::to(to).into_response()
        }
        GateDecision::Pass => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_with_session_goes_to_dashboard() {
        assert_eq!(admin_gate(LOGIN_PATH, true), GateDecision::Redirect(DASHBOARD_PATH));
        assert_eq!(admin_gate(LOGIN_PATH, false), GateDecision::Pass);
    }

    #[test]
    fn test_admin_paths_require_session() {
        assert_eq!(admin_gate("/admin/articles", false), GateDecision::Redirect(LOGIN_PATH));
        assert_eq!(admin_gate("/admin", false), GateDecision::Redirect(LOGIN_PATH));
        assert_eq!(admin_gate("/admin/articles", true), GateDecision::Pass);
    }

    #[test]
    fn test_public_paths_pass() {
        assert_eq!(admin_gate("/", false), GateDecision::Pass);
        assert_eq!(admin_gate("/administrator", false), GateDecision::Pass);
        assert_eq!(admin_gate("/widget/panel", false), GateDecision::Pass);
    }
}
