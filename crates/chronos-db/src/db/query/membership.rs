//! Queries for `calendar_user` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::calendar_user;
use crate::model::calendar::membership::{CalendarMembership, NewCalendarMembership};

/// ## Summary
/// Returns a query to find one user's membership in a calendar.
#[must_use]
pub fn by_calendar_and_user(
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> calendar_user::BoxedQuery<'static, diesel::pg::Pg> {
    calendar_user::table
        .filter(calendar_user::calendar_id.eq(calendar_id))
        .filter(calendar_user::user_id.eq(user_id))
        .into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find(
    conn: &mut DbConnection<'_>,
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<CalendarMembership>> {
    by_calendar_and_user(calendar_id, user_id)
        .select(CalendarMembership::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Whether the user holds any role in the calendar.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn is_participant(
    conn: &mut DbConnection<'_>,
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(by_calendar_and_user(
        calendar_id,
        user_id,
    )))
    .get_result(conn)
    .await
}

/// ## Summary
/// IDs of every calendar the user is a member of, owned ones included.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn calendar_ids_for_user(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<uuid::Uuid>> {
    calendar_user::table
        .filter(calendar_user::user_id.eq(user_id))
        .select(calendar_user::calendar_id)
        .load(conn)
        .await
}

/// ## Errors
/// Returns a unique violation if the user is already a member, or any other
/// database error.
pub async fn add_member(
    conn: &mut DbConnection<'_>,
    membership: &NewCalendarMembership,
) -> QueryResult<CalendarMembership> {
    diesel::insert_into(calendar_user::table)
        .values(membership)
        .returning(CalendarMembership::as_returning())
        .get_result(conn)
        .await
}
