//! Route authorization decisions.
//!
//! Pure functions of session state and the requested path: no I/O, no
//! side effects, nothing ever thrown. The presentation layer maps the
//! returned decision onto a spinner, a redirect, or the protected content.

use crate::session::{Role, Session};

/// The shared authorization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session hydration or an auth action is in flight; no redirect
    /// decision may be made yet.
    Loading,
    Unauthenticated,
    /// Authenticated but lacking the required role.
    Forbidden,
    Authorized,
}

/// What the caller should render or navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render a blocking spinner; do not redirect.
    Loading,
    /// Render the protected content.
    Render,
    /// Send the visitor to the site root, remembering where they wanted to
    /// go. Customer auth is modal-based, so there is no login page to target.
    RedirectToRoot { return_to: String },
    /// Send the visitor to the static forbidden page.
    RedirectToForbidden,
    /// Send the visitor to the admin login page.
    RedirectToAdminLogin,
}

/// Whether the session satisfies a required role. Admin satisfies every
/// requirement; every guard goes through here so the two variants cannot
/// drift apart.
pub fn has_role(session: &Session, required: Role) -> bool {
    match (session.role, required) {
        (Some(Role::Admin), _) => true,
        (Some(Role::User), Role::User) => true,
        _ => false,
    }
}

/// Evaluate the shared state machine for a route requiring `required_role`
/// (or just authentication when `None`).
pub fn guard_state(session: &Session, required_role: Option<Role>) -> GuardState {
    if session.loading {
        return GuardState::Loading;
    }
    if !session.is_authenticated {
        return GuardState::Unauthenticated;
    }
    match required_role {
        Some(role) if !has_role(session, role) => GuardState::Forbidden,
        _ => GuardState::Authorized,
    }
}

/// Customer-facing guard: distinguishes "not logged in" (back to the root,
/// preserving the requested location) from "logged in but not allowed"
/// (forbidden page).
pub fn authorize_customer_route(
    session: &Session,
    path: &str,
    required_role: Option<Role>,
) -> RouteDecision {
    match guard_state(session, required_role) {
        GuardState::Loading => RouteDecision::Loading,
        GuardState::Unauthenticated => RouteDecision::RedirectToRoot {
            return_to: path.to_string(),
        },
        GuardState::Forbidden => RouteDecision::RedirectToForbidden,
        GuardState::Authorized => RouteDecision::Render,
    }
}

/// Admin-area guard: anything short of an authenticated admin goes to the
/// admin login page.
pub fn authorize_admin_route(session: &Session, _path: &str) -> RouteDecision {
    match guard_state(session, Some(Role::Admin)) {
        GuardState::Loading => RouteDecision::Loading,
        GuardState::Unauthenticated | GuardState::Forbidden => RouteDecision::RedirectToAdminLogin,
        GuardState::Authorized => RouteDecision::Render,
    }
}
