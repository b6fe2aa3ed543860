use crate::{db::schema, model};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

pub use crate::db::enums::CalendarRole;

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::calendar_user)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(calendar_id, user_id))]
#[diesel(belongs_to(model::calendar::Calendar, foreign_key = calendar_id))]
#[diesel(belongs_to(model::user::User, foreign_key = user_id))]
pub struct CalendarMembership {
    pub calendar_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: CalendarRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::calendar_user)]
pub struct NewCalendarMembership {
    pub calendar_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: CalendarRole,
}
