mod app_specific;
mod auth;
mod calendars;
mod events;
mod invitations;
mod user;
pub mod util;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use chronos_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, AUTH_ROUTE_PREFIX, CALENDARS_ROUTE_PREFIX,
    EVENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the `/api` router with every JSON endpoint behind the bearer
/// token middleware.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .push(app_specific::routes())
        .push(auth::routes())
        .push(user::routes())
        .push(calendars::routes())
        .push(invitations::routes())
        .push(events::routes())
}
