//! Calendar invitations: owners invite users by email, invitees accept or
//! decline.

use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Deserialize;

use chronos_db::db::connection::DbConnection;
use chronos_db::db::enums::{CalendarRole, InvitationStatus};
use chronos_db::db::query::{calendar as calendar_query, invitation, membership, user as user_query};
use chronos_db::model::calendar::invitation::{CalendarInvitation, NewCalendarInvitation};
use chronos_db::model::calendar::membership::NewCalendarMembership;

use crate::auth::service::normalize_email;
use crate::error::{ServiceError, ServiceResult};
use crate::policy;

#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    pub calendar_id: uuid::Uuid,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: CalendarRole,
}

const fn default_role() -> CalendarRole {
    CalendarRole::Member
}

const ALREADY_PENDING: &str = "User already has a pending invitation to this calendar";

/// ## Summary
/// Invites the user registered under `request.email` into a calendar.
///
/// ## Errors
/// - `NotFound` if the calendar or the invitee does not exist
/// - `Forbidden` unless the inviter owns the calendar
/// - `ValidationError` when inviting as owner
/// - `Conflict` if the invitee is already a participant or already invited
///
/// ## Side Effects
/// Inserts a pending invitation.
#[tracing::instrument(skip(conn, request), fields(calendar_id = %request.calendar_id))]
pub async fn invite(
    conn: &mut DbConnection<'_>,
    inviter_id: uuid::Uuid,
    request: &InviteRequest,
) -> ServiceResult<CalendarInvitation> {
    let calendar = calendar_query::find_by_id(conn, request.calendar_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Calendar not found".to_string()))?;
    if !policy::can_manage(&calendar, inviter_id) {
        return Err(ServiceError::Forbidden(
            "Only the owner can invite users to this calendar".to_string(),
        ));
    }
    if request.role == CalendarRole::Owner {
        return Err(ServiceError::ValidationError(
            "Invited role must be admin or member".to_string(),
        ));
    }

    let email = normalize_email(&request.email);
    let invitee = user_query::find_by_email(conn, &email)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User with this email doesn't exist".to_string()))?;

    if membership::is_participant(conn, calendar.id, invitee.id).await? {
        return Err(ServiceError::Conflict(
            "User is already a participant of this calendar".to_string(),
        ));
    }
    if invitation::has_pending(conn, calendar.id, invitee.id).await? {
        return Err(ServiceError::Conflict(ALREADY_PENDING.to_string()));
    }

    let created = invitation::create_invitation(
        conn,
        &NewCalendarInvitation {
            id: uuid::Uuid::now_v7(),
            calendar_id: calendar.id,
            inviter_id,
            invitee_id: invitee.id,
            role: request.role,
        },
    )
    .await
    .map_err(|e| ServiceError::conflict_on_unique(e, ALREADY_PENDING))?;

    tracing::info!(invitation_id = %created.id, invitee_id = %invitee.id, "Invitation created");
    Ok(created)
}

/// ## Errors
/// Returns database errors.
pub async fn list_incoming(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
) -> ServiceResult<Vec<CalendarInvitation>> {
    Ok(invitation::list_pending_for_invitee(conn, user_id).await?)
}

async fn find_answerable(
    conn: &mut DbConnection<'_>,
    invitation_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<CalendarInvitation> {
    let found = invitation::find_by_id(conn, invitation_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;
    if found.invitee_id != user_id {
        return Err(ServiceError::Forbidden(
            "Invitation is addressed to another user".to_string(),
        ));
    }
    if !found.is_pending() {
        return Err(already_answered());
    }
    Ok(found)
}

fn already_answered() -> ServiceError {
    ServiceError::Conflict("Invitation has already been answered".to_string())
}

/// ## Summary
/// Accepts an invitation and joins the calendar with the invited role.
///
/// ## Errors
/// `NotFound`, `Forbidden` for anyone but the invitee, and `Conflict` if the
/// invitation was already answered or the user already joined.
///
/// ## Side Effects
/// Marks the invitation accepted and inserts the membership in one
/// transaction.
#[tracing::instrument(skip(conn))]
pub async fn accept(
    conn: &mut DbConnection<'_>,
    invitation_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<CalendarInvitation> {
    find_answerable(conn, invitation_id, user_id).await?;

    conn.transaction::<_, ServiceError, _>(move |tx| {
        async move {
            let accepted =
                invitation::resolve_pending(tx, invitation_id, InvitationStatus::Accepted)
                    .await?
                    .ok_or_else(already_answered)?;

            membership::add_member(
                tx,
                &NewCalendarMembership {
                    calendar_id: accepted.calendar_id,
                    user_id,
                    role: accepted.role,
                },
            )
            .await
            .map_err(|e| {
                ServiceError::conflict_on_unique(e, "User is already a participant of this calendar")
            })?;

            tracing::info!(calendar_id = %accepted.calendar_id, "Invitation accepted");
            Ok(accepted)
        }
        .scope_boxed()
    })
    .await
}

/// ## Errors
/// `NotFound`, `Forbidden` for anyone but the invitee, and `Conflict` if the
/// invitation was already answered.
///
/// ## Side Effects
/// Marks the invitation declined.
#[tracing::instrument(skip(conn))]
pub async fn decline(
    conn: &mut DbConnection<'_>,
    invitation_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> ServiceResult<CalendarInvitation> {
    find_answerable(conn, invitation_id, user_id).await?;

    invitation::resolve_pending(conn, invitation_id, InvitationStatus::Declined)
        .await?
        .ok_or_else(already_answered)
}
