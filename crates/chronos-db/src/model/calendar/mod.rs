pub mod invitation;
pub mod membership;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::{db::schema, model};

pub use crate::db::enums::Visibility;

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::calendar)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(model::user::User, foreign_key = owner_id))]
pub struct Calendar {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub visibility: Visibility,
    pub owner_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::calendar)]
pub struct NewCalendar<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub color: Option<&'a str>,
    pub visibility: Visibility,
    pub owner_id: uuid::Uuid,
}

/// Partial update. `None` leaves a column untouched; `Some(None)` clears a
/// nullable column.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schema::calendar)]
pub struct CalendarChangeset {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

impl CalendarChangeset {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.visibility.is_none()
    }
}
