use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// Account row. The password hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::user)]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::user)]
pub struct NewUser<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub surname: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Public profile fields attached to event participants.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::user)]
#[diesel(check_for_backend(Pg))]
pub struct UserSummary {
    pub id: uuid::Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub avatar_url: Option<String>,
}
