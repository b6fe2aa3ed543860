//! Queries for `refresh_session` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::refresh_session;
use crate::model::session::{NewRefreshSession, RefreshSession};

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_session(
    conn: &mut DbConnection<'_>,
    session: &NewRefreshSession<'_>,
) -> QueryResult<RefreshSession> {
    diesel::insert_into(refresh_session::table)
        .values(session)
        .returning(RefreshSession::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes the session with `token_hash` and returns it. A second call for
/// the same hash returns `None`, which makes refresh tokens single use.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn take_by_hash(
    conn: &mut DbConnection<'_>,
    token_hash: &str,
) -> QueryResult<Option<RefreshSession>> {
    diesel::delete(refresh_session::table.filter(refresh_session::token_hash.eq(token_hash)))
        .returning(RefreshSession::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_for_user(conn: &mut DbConnection<'_>, user_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(refresh_session::table.filter(refresh_session::user_id.eq(user_id)))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_expired(
    conn: &mut DbConnection<'_>,
    now: chrono::DateTime<chrono::Utc>,
) -> QueryResult<usize> {
    diesel::delete(refresh_session::table.filter(refresh_session::expires_at.le(now)))
        .execute(conn)
        .await
}
