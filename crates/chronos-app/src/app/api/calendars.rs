use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};

use chronos_core::constants::CALENDARS_ROUTE_COMPONENT;
use chronos_service::auth::get_viewer_id;
use chronos_service::calendar::service as calendar_service;
use chronos_service::calendar::{CalendarQuery, CreateCalendarRequest, UpdateCalendarRequest};

use super::util::{parse_body, parse_query, path_id, require_user_id};
use crate::db_handler::get_db_from_depot;
use crate::error::AppError;

/// ## Summary
/// GET /api/calendars/public - Paginated public calendars
///
/// Query: `name`, `sort_by` (`created_at` | `participants`), `sort_order`
/// (`asc` | `desc`), `page`, `limit`.
#[handler]
async fn list_public(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let query: CalendarQuery = match parse_query(req) {
        Ok(q) => q,
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

    match calendar_service::find_public(&mut conn, &query).await {
        Ok(page) => res.render(Json(page)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// GET /api/calendars/my - Calendars owned by the caller
#[handler]
async fn list_owned(depot: &mut Depot, res: &mut Response) {
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

    match calendar_service::find_by_owner(&mut conn, user_id).await {
        Ok(calendars) => res.render(Json(calendars)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// GET /api/calendars/participating - Calendars the caller joined
#[handler]
async fn list_participating(depot: &mut Depot, res: &mut Response) {
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

    match calendar_service::find_participating(&mut conn, user_id).await {
        Ok(calendars) => res.render(Json(calendars)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// GET /api/calendars/{id} - One calendar, subject to its visibility
///
/// ## Errors
/// Returns HTTP 404 if missing and HTTP 403 if hidden from the caller
#[handler]
async fn get_calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let id = match path_id(req, "id") {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let viewer = get_viewer_id(depot);
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match calendar_service::find_by_id(&mut conn, id, viewer).await {
        Ok(calendar) => res.render(Json(calendar)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/calendars - Create a calendar owned by the caller
#[handler]
async fn create_calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let body: CreateCalendarRequest = match parse_body(req).await {
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

    match calendar_service::create(&mut conn, user_id, &body).await {
        Ok(calendar) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(calendar));
        }
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// PATCH /api/calendars/{id} - Change name, description, color or visibility
///
/// ## Errors
/// Returns HTTP 403 unless the caller owns the calendar
#[handler]
async fn update_calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let id = match path_id(req, "id") {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let body: UpdateCalendarRequest = match parse_body(req).await {
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

    match calendar_service::update(&mut conn, id, user_id, body).await {
        Ok(calendar) => res.render(Json(calendar)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// DELETE /api/calendars/{id} - Remove a calendar and everything in it
///
/// ## Errors
/// Returns HTTP 403 unless the caller owns the calendar
#[handler]
async fn delete_calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
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

    match calendar_service::delete(&mut conn, id, user_id).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => AppError::from(e).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDARS_ROUTE_COMPONENT)
        .post(create_calendar)
        .push(Router::with_path("public").get(list_public))
        .push(Router::with_path("my").get(list_owned))
        .push(Router::with_path("participating").get(list_participating))
        .push(
            Router::with_path("{id}")
                .get(get_calendar)
                .patch(update_calendar)
                .delete(delete_calendar),
        )
}
