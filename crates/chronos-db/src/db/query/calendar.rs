//! Queries for `calendar` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::Visibility;
use crate::db::schema::{calendar, calendar_user};
use crate::model::calendar::{Calendar, CalendarChangeset, NewCalendar};

/// Column the public listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicSort {
    #[default]
    #[serde(alias = "createdAt")]
    CreatedAt,
    Participants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// ## Summary
/// Returns a query to select all calendars.
#[must_use]
pub fn all() -> calendar::BoxedQuery<'static, diesel::pg::Pg> {
    calendar::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a calendar by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> calendar::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(calendar::id.eq(id))
}

/// ## Summary
/// Returns a query for calendars owned by a user, oldest first.
#[must_use]
pub fn by_owner(owner_id: uuid::Uuid) -> calendar::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(calendar::owner_id.eq(owner_id))
        .order(calendar::created_at.asc())
}

/// ## Summary
/// Returns a query for public calendars whose name matches `pattern` (`ILIKE`).
#[must_use]
pub fn public_matching(pattern: &str) -> calendar::BoxedQuery<'_, diesel::pg::Pg> {
    all()
        .filter(calendar::visibility.eq(Visibility::Public))
        .filter(calendar::name.ilike(pattern))
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> QueryResult<Option<Calendar>> {
    by_id(id)
        .select(Calendar::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_by_owner(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> QueryResult<Vec<Calendar>> {
    by_owner(owner_id)
        .select(Calendar::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads one page of public calendars and the total number of matches.
///
/// `pattern` is an `ILIKE` pattern; pass `"%"` to match every name.
///
/// ## Errors
/// Returns a database error if either query fails.
#[tracing::instrument(skip(conn))]
pub async fn list_public(
    conn: &mut DbConnection<'_>,
    pattern: &str,
    sort: PublicSort,
    order: SortOrder,
    offset: i64,
    limit: i64,
) -> QueryResult<(Vec<Calendar>, i64)> {
    let total: i64 = public_matching(pattern).count().get_result(conn).await?;

    let participants = diesel::dsl::count(calendar_user::user_id.nullable());
    let query = calendar::table
        .left_join(calendar_user::table)
        .filter(calendar::visibility.eq(Visibility::Public))
        .filter(calendar::name.ilike(pattern))
        .group_by(calendar::id)
        .select(Calendar::as_select())
        .into_boxed();

    let query = match (sort, order) {
        (PublicSort::CreatedAt, SortOrder::Asc) => query.order(calendar::created_at.asc()),
        (PublicSort::CreatedAt, SortOrder::Desc) => query.order(calendar::created_at.desc()),
        (PublicSort::Participants, SortOrder::Asc) => {
            query.order((participants.asc(), calendar::created_at.asc()))
        }
        (PublicSort::Participants, SortOrder::Desc) => {
            query.order((participants.desc(), calendar::created_at.asc()))
        }
    };

    let rows = query.offset(offset).limit(limit).load(conn).await?;

    Ok((rows, total))
}

/// ## Summary
/// Calendars the user belongs to without owning them.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_participating(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<Calendar>> {
    calendar::table
        .inner_join(calendar_user::table)
        .filter(calendar_user::user_id.eq(user_id))
        .filter(calendar::owner_id.ne(user_id))
        .order(calendar::created_at.asc())
        .select(Calendar::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_calendar(
    conn: &mut DbConnection<'_>,
    new_calendar: &NewCalendar<'_>,
) -> QueryResult<Calendar> {
    diesel::insert_into(calendar::table)
        .values(new_calendar)
        .returning(Calendar::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns `NotFound` if the calendar vanished, or any other database error.
pub async fn update_calendar(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    changes: &CalendarChangeset,
) -> QueryResult<Calendar> {
    diesel::update(calendar::table.filter(calendar::id.eq(id)))
        .set(changes)
        .returning(Calendar::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes a calendar. Memberships, invitations and events cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_calendar(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(calendar::table.filter(calendar::id.eq(id)))
        .execute(conn)
        .await
}
