use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};

use chronos_core::constants::EVENTS_ROUTE_COMPONENT;
use chronos_service::event::service as event_service;
use chronos_service::event::{CreateEventRequest, EventFields, EventListQuery};

use super::util::{parse_body, parse_query, path_id, require_user_id};
use crate::db_handler::get_db_from_depot;
use crate::error::AppError;

/// ## Summary
/// GET /api/events - Events of the caller's calendars inside a time window
///
/// Query: `calendarId`, `fromDate`, `toDate` (RFC 3339). Without bounds the
/// window runs from three days ago to four days ahead.
///
/// ## Errors
/// Returns HTTP 400 for a window over one month and HTTP 403 for a calendar
/// the caller is not a member of
#[handler]
async fn list_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let query: EventListQuery = match parse_query(req) {
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

    match event_service::list(&mut conn, user_id, &query, chrono::Utc::now()).await {
        Ok(events) => res.render(Json(events)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/events - Schedule an event, optionally recurring
///
/// ## Errors
/// Returns HTTP 403 unless the caller is an owner or admin of the calendar
#[handler]
async fn create_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let body: CreateEventRequest = match parse_body(req).await {
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

    match event_service::create(&mut conn, user_id, body).await {
        Ok(event) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(event));
        }
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// PATCH /api/events/{id} - Replace an event's fields and recurrence
///
/// ## Errors
/// Returns HTTP 403 unless the caller created the event
#[handler]
async fn update_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let id = match path_id(req, "id") {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let body: EventFields = match parse_body(req).await {
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

    match event_service::update(&mut conn, id, user_id, body).await {
        Ok(event) => res.render(Json(event)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// DELETE /api/events/{id} - Remove an event
///
/// ## Errors
/// Returns HTTP 403 unless the caller created the event
#[handler]
async fn delete_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
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

    match event_service::delete(&mut conn, id, user_id).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => AppError::from(e).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list_events)
        .post(create_event)
        .push(
            Router::with_path("{id}")
                .patch(update_event)
                .delete(delete_event),
        )
}
