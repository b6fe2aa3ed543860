//! Depot helpers for the authenticated user of a Salvo request.

use chronos_db::model::user::User;

use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const AUTHENTICATED_PRINCIPAL: &str = "__authenticated_principal";
}

/// Who is making the request, as stored in the depot by the auth middleware.
#[derive(Debug, Clone)]
pub enum DepotUser {
    User(User),
    Public,
}

/// Get the authenticated user from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no user is found in the depot or if the user is public.
pub fn get_user_from_depot(depot: &salvo::Depot) -> ServiceResult<&User> {
    let depot_user = depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    match depot_user {
        DepotUser::User(user) => Ok(user),
        DepotUser::Public => Err(ServiceError::NotAuthenticated),
    }
}

/// ID of the requesting user, or `None` for public requests.
#[must_use]
pub fn get_viewer_id(depot: &salvo::Depot) -> Option<uuid::Uuid> {
    match depot.get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL) {
        Ok(DepotUser::User(user)) => Some(user.id),
        Ok(DepotUser::Public) => None,
        Err(_missing) => {
            tracing::warn!("Depot missing user context; treating request as public");
            None
        }
    }
}

/// Check if the request is from an authenticated user (not public).
#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL)
        .is_ok_and(|u| matches!(u, DepotUser::User(_)))
}
