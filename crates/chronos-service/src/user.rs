use serde::Serialize;

use chronos_db::db::connection::DbConnection;
use chronos_db::db::query::user as user_query;
use chronos_db::model::user::User;

use crate::error::{ServiceError, ServiceResult};

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: uuid::Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
        }
    }
}

/// ## Summary
/// Loads the profile of `user_id`.
///
/// ## Errors
/// Returns `NotFound` if the user no longer exists.
pub async fn me(conn: &mut DbConnection<'_>, user_id: uuid::Uuid) -> ServiceResult<UserProfile> {
    user_query::find_by_id(conn, user_id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}
