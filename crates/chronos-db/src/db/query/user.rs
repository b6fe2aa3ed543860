//! Queries for `user` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::user;
use crate::model::user::{NewUser, User};

/// ## Summary
/// Returns a query to select all users.
#[must_use]
pub fn all() -> user::BoxedQuery<'static, diesel::pg::Pg> {
    user::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a user by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> user::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(user::id.eq(id))
}

/// ## Summary
/// Returns a query to find a user by email. Emails are stored lowercased.
#[must_use]
pub fn by_email(email: &str) -> user::BoxedQuery<'_, diesel::pg::Pg> {
    all().filter(user::email.eq(email))
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> QueryResult<Option<User>> {
    by_id(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_email(
    conn: &mut DbConnection<'_>,
    email: &str,
) -> QueryResult<Option<User>> {
    by_email(email)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a user and returns the stored row.
///
/// ## Errors
/// Returns a unique violation if the email is taken, or any other database error.
#[tracing::instrument(skip(conn, new_user), fields(user_id = %new_user.id))]
pub async fn create_user(conn: &mut DbConnection<'_>, new_user: &NewUser<'_>) -> QueryResult<User> {
    diesel::insert_into(user::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn set_active(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    is_active: bool,
) -> QueryResult<usize> {
    diesel::update(user::table.filter(user::id.eq(id)))
        .set(user::is_active.eq(is_active))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn set_password_hash(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    password_hash: &str,
) -> QueryResult<usize> {
    diesel::update(user::table.filter(user::id.eq(id)))
        .set(user::password_hash.eq(password_hash))
        .execute(conn)
        .await
}
