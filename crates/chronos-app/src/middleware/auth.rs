use salvo::Depot;
use tracing::error;

use crate::error::AppError;
use crate::{config::get_config_from_depot, db_handler::get_db_from_depot};
use chronos_service::auth::authenticate::{authenticate, bearer_token, verify_access_token};
use chronos_service::auth::{DepotUser, depot_keys};
use chronos_service::error::ServiceError;

/// ## Summary
/// Middleware handler for bearer token authentication.
/// Use this as a hoop on routes whose handlers need to know the caller.
pub struct AuthMiddleware;

/// ## Summary
/// Authenticates the request and stores the caller in the depot.
///
/// Requests without an `Authorization` header continue as public. A header
/// that does not carry a valid access token for an existing user ends the
/// request with 401.
///
/// ## Side Effects
/// Inserts a [`DepotUser`] under `AUTHENTICATED_PRINCIPAL` for downstream handlers.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotUser::Public);
            return;
        }

        let token = match bearer_token(req) {
            Ok(Some(token)) => token.to_string(),
            Ok(None) => {
                depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotUser::Public);
                return;
            }
            Err(e) => {
                AppError::from(e).render(res);
                ctrl.skip_rest();
                return;
            }
        };

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                e.render(res);
                ctrl.skip_rest();
                return;
            }
        };

        let claims = match verify_access_token(&config, &token) {
            Ok(claims) => claims,
            Err(e) => {
                AppError::from(e).render(res);
                ctrl.skip_rest();
                return;
            }
        };

        let provider = match get_db_from_depot(depot) {
            Ok(p) => p,
            Err(e) => {
                error!(error = ?e, "Failed to get database provider from depot");
                e.render(res);
                ctrl.skip_rest();
                return;
            }
        };

        let mut conn = match provider.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get database connection");
                AppError::from(e).render(res);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(&mut conn, &claims).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "User authenticated successfully");
                depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotUser::User(user));
            }
            Err(ServiceError::NotAuthenticated) => {
                AppError::from(ServiceError::NotAuthenticated).render(res);
                ctrl.skip_rest();
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                AppError::from(service_err).render(res);
                ctrl.skip_rest();
            }
        }
    }
}
