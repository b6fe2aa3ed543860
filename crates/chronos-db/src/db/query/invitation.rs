//! Queries for `calendar_invitation` rows.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::InvitationStatus;
use crate::db::schema::calendar_invitation;
use crate::model::calendar::invitation::{CalendarInvitation, NewCalendarInvitation};

/// ## Summary
/// Returns a query for pending invitations addressed to a user, newest first.
#[must_use]
pub fn pending_for_invitee(
    invitee_id: uuid::Uuid,
) -> calendar_invitation::BoxedQuery<'static, diesel::pg::Pg> {
    calendar_invitation::table
        .filter(calendar_invitation::invitee_id.eq(invitee_id))
        .filter(calendar_invitation::status.eq(InvitationStatus::Pending))
        .order(calendar_invitation::created_at.desc())
        .into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> QueryResult<Option<CalendarInvitation>> {
    calendar_invitation::table
        .filter(calendar_invitation::id.eq(id))
        .select(CalendarInvitation::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_pending_for_invitee(
    conn: &mut DbConnection<'_>,
    invitee_id: uuid::Uuid,
) -> QueryResult<Vec<CalendarInvitation>> {
    pending_for_invitee(invitee_id)
        .select(CalendarInvitation::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn has_pending(
    conn: &mut DbConnection<'_>,
    calendar_id: uuid::Uuid,
    invitee_id: uuid::Uuid,
) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        calendar_invitation::table
            .filter(calendar_invitation::calendar_id.eq(calendar_id))
            .filter(calendar_invitation::invitee_id.eq(invitee_id))
            .filter(calendar_invitation::status.eq(InvitationStatus::Pending)),
    ))
    .get_result(conn)
    .await
}

/// ## Errors
/// Returns a unique violation if a pending invitation already exists, or any
/// other database error.
pub async fn create_invitation(
    conn: &mut DbConnection<'_>,
    invitation: &NewCalendarInvitation,
) -> QueryResult<CalendarInvitation> {
    diesel::insert_into(calendar_invitation::table)
        .values(invitation)
        .returning(CalendarInvitation::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Moves a pending invitation to `status`.
///
/// Returns `None` when the invitation is no longer pending, so two concurrent
/// answers cannot both succeed.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn resolve_pending(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    status: InvitationStatus,
) -> QueryResult<Option<CalendarInvitation>> {
    diesel::update(
        calendar_invitation::table
            .filter(calendar_invitation::id.eq(id))
            .filter(calendar_invitation::status.eq(InvitationStatus::Pending)),
    )
    .set(calendar_invitation::status.eq(status))
    .returning(CalendarInvitation::as_returning())
    .get_result(conn)
    .await
    .optional()
}
