//! Authorization rules for calendars and events.
//!
//! Management is owner-only. Reads depend on visibility, with shared
//! calendars additionally open to participants.

use chronos_db::db::enums::{CalendarRole, Visibility};
use chronos_db::model::calendar::Calendar;
use chronos_db::model::event::Event;

use crate::error::{ServiceError, ServiceResult};

/// True iff `user_id` owns the calendar.
#[must_use]
pub fn can_manage(calendar: &Calendar, user_id: uuid::Uuid) -> bool {
    calendar.owner_id == user_id
}

/// ## Summary
/// Checks whether `viewer` may read `calendar`.
///
/// `is_participant` is only consulted for shared calendars.
///
/// ## Errors
/// Returns `Forbidden` when the viewer may not read the calendar.
pub fn check_read_access(
    calendar: &Calendar,
    viewer: Option<uuid::Uuid>,
    is_participant: bool,
) -> ServiceResult<()> {
    let is_owner = viewer.is_some_and(|id| can_manage(calendar, id));
    match calendar.visibility {
        Visibility::Public => Ok(()),
        Visibility::Private if is_owner => Ok(()),
        Visibility::Private => Err(ServiceError::Forbidden("Calendar is private".to_string())),
        Visibility::Shared if is_owner || (viewer.is_some() && is_participant) => Ok(()),
        Visibility::Shared => Err(ServiceError::Forbidden(
            "User is not a participant of this shared calendar".to_string(),
        )),
    }
}

#[must_use]
pub const fn can_create_events(role: CalendarRole) -> bool {
    matches!(role, CalendarRole::Owner | CalendarRole::Admin)
}

/// Only the creator may change or remove an event.
#[must_use]
pub fn can_modify_event(event: &Event, user_id: uuid::Uuid) -> bool {
    event.creator_id == user_id
}
