use salvo::{Router, handler};

use chronos_core::constants::APP_ROUTE_COMPONENT;

#[handler]
async fn healthcheck() -> &'static str {
    "OK"
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT).push(Router::with_path("healthcheck").get(healthcheck))
}
