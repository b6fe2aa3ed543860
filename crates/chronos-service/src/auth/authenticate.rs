use chronos_core::config::Settings;
use chronos_db::db::connection::DbConnection;
use chronos_db::db::query::user;
use chronos_db::model::user::User;

use super::token::{self, Claims, TokenKind};
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
#[must_use]
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// ## Summary
/// Reads the bearer token of a request, if any.
///
/// ## Errors
/// Returns `NotAuthenticated` if an `Authorization` header is present but is
/// not a usable bearer token.
pub fn bearer_token(req: &salvo::Request) -> ServiceResult<Option<&str>> {
    let Some(value) = req.headers().get(salvo::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_e| ServiceError::NotAuthenticated)?;
    parse_bearer(value)
        .map(Some)
        .ok_or(ServiceError::NotAuthenticated)
}

/// ## Summary
/// Verifies an access token without touching the database.
///
/// ## Errors
/// Returns `NotAuthenticated` if the token is malformed, expired or not an
/// access token.
pub fn verify_access_token(config: &Settings, token: &str) -> ServiceResult<Claims> {
    token::verify(&config.auth, TokenKind::Access, token)
        .map_err(|_e| ServiceError::NotAuthenticated)
}

/// ## Summary
/// Resolves the user named by verified access token claims.
///
/// ## Errors
/// Returns `NotAuthenticated` if the user no longer exists, and database
/// errors otherwise.
#[tracing::instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn authenticate(conn: &mut DbConnection<'_>, claims: &Claims) -> ServiceResult<User> {
    let Some(user) = user::find_by_id(conn, claims.sub).await? else {
        tracing::debug!("Token subject no longer exists");
        return Err(ServiceError::NotAuthenticated);
    };

    tracing::trace!("Bearer token accepted");
    Ok(user)
}
