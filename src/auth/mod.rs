//! Admin authentication context.
//!
//! The session itself is issued by the REST API; this module only carries
//! the token explicitly and gates `/admin` routes on its presence.

mod gate;
mod session;

pub use gate::{DASHBOARD_PATH, GateDecision, LOGIN_PATH, admin_gate, admin_gate_middleware};
pub use session::{AuthSession, SESSION_COOKIE};
