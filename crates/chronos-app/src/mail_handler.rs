use std::sync::Arc;

use salvo::async_trait;

use chronos_service::mail::{Mailer, depot_keys};

/// Injects the outbound [`Mailer`] into every request depot.
pub struct MailerHandler {
    pub mailer: Arc<dyn Mailer>,
}

#[async_trait]
impl salvo::Handler for MailerHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.insert(depot_keys::MAILER, Arc::clone(&self.mailer));
    }
}
