//! Queries for `event`, `event_repeat` and `event_user` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::EventCategory;
use crate::db::schema::{event, event_repeat, event_user, user};
use crate::model::event::participant::NewEventParticipant;
use crate::model::event::repeat::{EventRepeat, NewEventRepeat};
use crate::model::event::{Event, EventChangeset, NewEvent};
use crate::model::user::UserSummary;

/// ## Summary
/// Returns a query to find an event by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> event::BoxedQuery<'static, diesel::pg::Pg> {
    event::table.filter(event::id.eq(id)).into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> QueryResult<Option<Event>> {
    by_id(id)
        .select(Event::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_repeat(
    conn: &mut DbConnection<'_>,
    event_id: uuid::Uuid,
) -> QueryResult<Option<EventRepeat>> {
    event_repeat::table
        .filter(event_repeat::event_id.eq(event_id))
        .select(EventRepeat::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads the candidate events of a listing between `from` and `to`.
///
/// A row qualifies when it is
/// - a non-recurring, non-reminder event starting in `[from, to]`,
/// - any recurring non-reminder event, whatever its start, or
/// - a reminder starting in `[from, to]`.
///
/// Recurring candidates still have to be checked against the window by the
/// caller.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn, calendar_ids), fields(calendar_count = calendar_ids.len()))]
pub async fn list_candidates(
    conn: &mut DbConnection<'_>,
    calendar_ids: &[uuid::Uuid],
    from: chrono::DateTime<chrono::Utc>,
    to: chrono::DateTime<chrono::Utc>,
) -> QueryResult<Vec<(Event, Option<EventRepeat>)>> {
    let starts_in_window = event::start_at.ge(from).and(event::start_at.le(to));
    let is_reminder = event::category.eq(EventCategory::Reminder);
    let not_reminder = event::category.ne(EventCategory::Reminder);
    let has_repeat = event_repeat::event_id.nullable().is_not_null();
    let no_repeat = event_repeat::event_id.nullable().is_null();

    event::table
        .left_join(event_repeat::table)
        .filter(event::calendar_id.eq_any(calendar_ids))
        .filter(
            starts_in_window
                .and(not_reminder)
                .and(no_repeat)
                .or(has_repeat.and(not_reminder))
                .or(is_reminder.and(starts_in_window)),
        )
        .order((event::start_at.asc(), event::id.asc()))
        .select((Event::as_select(), Option::<EventRepeat>::as_select()))
        .load(conn)
        .await
}

/// ## Summary
/// Participants of the given events with their public profile fields.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_participants(
    conn: &mut DbConnection<'_>,
    event_ids: &[uuid::Uuid],
) -> QueryResult<Vec<(uuid::Uuid, UserSummary)>> {
    event_user::table
        .inner_join(user::table)
        .filter(event_user::event_id.eq_any(event_ids))
        .order((event_user::event_id.asc(), user::name.asc()))
        .select((event_user::event_id, UserSummary::as_select()))
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_event(conn: &mut DbConnection<'_>, new_event: &NewEvent<'_>) -> QueryResult<Event> {
    diesel::insert_into(event::table)
        .values(new_event)
        .returning(Event::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_event(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    changes: &EventChangeset<'_>,
) -> QueryResult<Event> {
    diesel::update(event::table.filter(event::id.eq(id)))
        .set(changes)
        .returning(Event::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes an event. Its recurrence and participant rows cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_event(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(event::table.filter(event::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Inserts or replaces the recurrence row of an event.
///
/// ## Errors
/// Returns a database error if the upsert fails.
pub async fn upsert_repeat(
    conn: &mut DbConnection<'_>,
    repeat: &NewEventRepeat,
) -> QueryResult<EventRepeat> {
    diesel::insert_into(event_repeat::table)
        .values(repeat)
        .on_conflict(event_repeat::event_id)
        .do_update()
        .set(repeat)
        .returning(EventRepeat::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_repeat(conn: &mut DbConnection<'_>, event_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(event_repeat::table.filter(event_repeat::event_id.eq(event_id)))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn add_participant(
    conn: &mut DbConnection<'_>,
    participant: &NewEventParticipant,
) -> QueryResult<usize> {
    diesel::insert_into(event_user::table)
        .values(participant)
        .on_conflict_do_nothing()
        .execute(conn)
        .await
}
