use crate::{db::schema, model};
use diesel::{pg::Pg, prelude::*};

pub use crate::db::enums::CalendarRole;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::event_user)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(event_id, user_id))]
#[diesel(belongs_to(model::event::Event, foreign_key = event_id))]
pub struct EventParticipant {
    pub event_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: CalendarRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::event_user)]
pub struct NewEventParticipant {
    pub event_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: CalendarRole,
}
