//! Request parsing shared by the JSON handlers.

use serde::de::DeserializeOwned;

use chronos_service::auth::get_user_from_depot;
use chronos_service::error::ServiceError;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is missing or does not match `T`.
pub async fn parse_body<T: DeserializeOwned>(req: &mut salvo::Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}

/// ## Summary
/// Parses the query string.
///
/// ## Errors
/// Returns `BadRequest` if a parameter has the wrong format.
pub fn parse_query<T: DeserializeOwned>(req: &mut salvo::Request) -> AppResult<T> {
    req.parse_queries::<T>().map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse query string");
        AppError::BadRequest("Invalid query parameters".to_string())
    })
}

/// ## Summary
/// Reads a UUID path parameter.
///
/// ## Errors
/// Returns `BadRequest` if the parameter is missing or not a UUID.
pub fn path_id(req: &salvo::Request, name: &str) -> AppResult<uuid::Uuid> {
    let Some(raw) = req.param::<String>(name) else {
        return Err(AppError::BadRequest(format!("{name} is required")));
    };
    uuid::Uuid::parse_str(&raw)
        .map_err(|_e| AppError::BadRequest(format!("Invalid {name} format")))
}

/// ## Summary
/// ID of the authenticated caller.
///
/// ## Errors
/// Returns `NotAuthenticated` for public requests.
pub fn require_user_id(depot: &salvo::Depot) -> AppResult<uuid::Uuid> {
    get_user_from_depot(depot)
        .map(|user| user.id)
        .map_err(|_e| AppError::ServiceError(ServiceError::NotAuthenticated))
}
