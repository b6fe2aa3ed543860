//! Outbound mail.
//!
//! Handlers reach the configured [`Mailer`] through the depot; delivery itself
//! is left to the implementation.

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const MAILER: &str = "__mailer";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    #[must_use]
    pub fn activation(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Activate your Chronos account".to_string(),
            body: format!("Follow this link to activate your account: {link}"),
        }
    }

    #[must_use]
    pub fn password_reset(to: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Reset your Chronos password".to_string(),
            body: format!("Follow this link to choose a new password: {link}"),
        }
    }
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// ## Errors
    /// Returns an error if the message could not be handed off.
    async fn send(&self, message: MailMessage) -> ServiceResult<()>;
}

/// Writes every message to the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> ServiceResult<()> {
        tracing::info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Outgoing mail"
        );
        Ok(())
    }
}

/// ## Summary
/// Retrieves the mailer from the depot.
///
/// ## Errors
/// Returns `InvalidConfiguration` if no mailer was injected.
pub fn get_mailer_from_depot(depot: &salvo::Depot) -> ServiceResult<Arc<dyn Mailer>> {
    depot
        .get::<Arc<dyn Mailer>>(depot_keys::MAILER)
        .cloned()
        .map_err(|_e| ServiceError::InvalidConfiguration("Mailer not found in depot".to_string()))
}
