use salvo::{Depot, Response, Router, handler, writing::Json};

use chronos_core::constants::USER_ROUTE_COMPONENT;
use chronos_service::user as user_service;

use super::util::require_user_id;
use crate::db_handler::get_db_from_depot;
use crate::error::AppError;

/// ## Summary
/// GET /api/user/me - Profile of the authenticated user
#[handler]
async fn me(depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match user_service::me(&mut conn, user_id).await {
        Ok(profile) => res.render(Json(profile)),
        Err(e) => AppError::from(e).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(USER_ROUTE_COMPONENT).push(Router::with_path("me").get(me))
}
