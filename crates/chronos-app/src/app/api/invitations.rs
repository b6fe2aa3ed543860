use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};

use chronos_core::constants::CALENDAR_INVITATIONS_ROUTE_COMPONENT;
use chronos_service::calendar::invitation::{self as invitation_service, InviteRequest};

use super::util::{parse_body, path_id, require_user_id};
use crate::db_handler::get_db_from_depot;
use crate::error::AppError;

/// ## Summary
/// POST /api/calendar-invitations - Invite a user into a calendar by email
///
/// ## Errors
/// Returns HTTP 403 unless the caller owns the calendar, HTTP 404 for an
/// unknown invitee and HTTP 409 for duplicates
#[handler]
async fn invite(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let body: InviteRequest = match parse_body(req).await {
        Ok(b) => b,
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

    match invitation_service::invite(&mut conn, user_id, &body).await {
        Ok(invitation) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(invitation));
        }
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// GET /api/calendar-invitations - Pending invitations addressed to the caller
#[handler]
async fn list_incoming(depot: &mut Depot, res: &mut Response) {
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

    match invitation_service::list_incoming(&mut conn, user_id).await {
        Ok(invitations) => res.render(Json(invitations)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/calendar-invitations/{id}/accept - Join the calendar
#[handler]
async fn accept(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let id = match path_id(req, "id") {
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

    match invitation_service::accept(&mut conn, id, user_id).await {
        Ok(invitation) => res.render(Json(invitation)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/calendar-invitations/{id}/decline - Turn the invitation down
#[handler]
async fn decline(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let id = match path_id(req, "id") {
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

    match invitation_service::decline(&mut conn, id, user_id).await {
        Ok(invitation) => res.render(Json(invitation)),
        Err(e) => AppError::from(e).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDAR_INVITATIONS_ROUTE_COMPONENT)
        .get(list_incoming)
        .post(invite)
        .push(Router::with_path("{id}/accept").post(accept))
        .push(Router::with_path("{id}/decline").post(decline))
}
