pub mod participant;
pub mod repeat;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::{db::schema, model};

pub use crate::db::enums::EventCategory;

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::event)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(model::calendar::Calendar, foreign_key = calendar_id))]
pub struct Event {
    pub id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub creator_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub link: Option<String>,
    pub category: EventCategory,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event)]
pub struct NewEvent<'a> {
    pub id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub creator_id: uuid::Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub color: Option<&'a str>,
    pub link: Option<&'a str>,
    pub category: EventCategory,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Full replacement of the mutable event columns. `end_at` is always written
/// so switching to a reminder clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::event)]
#[diesel(treat_none_as_null = true)]
pub struct EventChangeset<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub color: Option<&'a str>,
    pub link: Option<&'a str>,
    pub category: EventCategory,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
}
