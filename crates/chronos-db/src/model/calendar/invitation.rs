use crate::{db::schema, model};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

pub use crate::db::enums::{CalendarRole, InvitationStatus};

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::calendar_invitation)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(model::calendar::Calendar, foreign_key = calendar_id))]
pub struct CalendarInvitation {
    pub id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub inviter_id: uuid::Uuid,
    pub invitee_id: uuid::Uuid,
    pub role: CalendarRole,
    pub status: InvitationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CalendarInvitation {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::calendar_invitation)]
pub struct NewCalendarInvitation {
    pub id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub inviter_id: uuid::Uuid,
    pub invitee_id: uuid::Uuid,
    pub role: CalendarRole,
}
