use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

use chronos_core::error::CoreError;
use chronos_db::error::DbError;
use chronos_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

const INTERNAL_ERROR: &str = "Internal server error";
const DATABASE_UNAVAILABLE: &str = "Database unavailable";

fn core_status(err: &CoreError) -> Option<StatusCode> {
    match err {
        CoreError::ValidationError(_)
        | CoreError::InvalidInput(_)
        | CoreError::InvalidFrequency(_)
        | CoreError::InvalidInterval(_)
        | CoreError::IntervalOverflow(_)
        | CoreError::InvalidPeriod(_) => Some(StatusCode::BAD_REQUEST),
        CoreError::ConfigError(_) | CoreError::InvariantViolation(_) => None,
    }
}

fn db_status(err: &DbError) -> Option<StatusCode> {
    match err {
        DbError::PoolError(_) => Some(StatusCode::SERVICE_UNAVAILABLE),
        DbError::CoreError(core) => core_status(core),
        DbError::DatabaseError(_) | DbError::MigrationError(_) => None,
    }
}

impl AppError {
    /// HTTP status for this error. Anything without a client-facing meaning is a 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let status = match self {
            Self::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::CoreError(err) => core_status(err),
            Self::DatabaseError(err) => db_status(err),
            Self::ServiceError(err) => match err {
                ServiceError::ValidationError(_) => Some(StatusCode::BAD_REQUEST),
                ServiceError::NotAuthenticated => Some(StatusCode::UNAUTHORIZED),
                ServiceError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
                ServiceError::NotFound(_) => Some(StatusCode::NOT_FOUND),
                ServiceError::Conflict(_) => Some(StatusCode::CONFLICT),
                ServiceError::CoreError(core) => core_status(core),
                ServiceError::DatabaseError(db) => db_status(db),
                ServiceError::TokenError(_)
                | ServiceError::InvalidConfiguration(_)
                | ServiceError::InvariantViolation(_)
                | ServiceError::DieselError(_) => None,
            },
        };
        status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Message shown to the client. Server-side failures are not described.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_ERROR.to_string(),
            StatusCode::SERVICE_UNAVAILABLE => DATABASE_UNAVAILABLE.to_string(),
            _ => match self {
                Self::BadRequest(msg)
                | Self::ServiceError(
                    ServiceError::ValidationError(msg)
                    | ServiceError::Forbidden(msg)
                    | ServiceError::NotFound(msg)
                    | ServiceError::Conflict(msg),
                ) => msg.clone(),
                Self::ServiceError(ServiceError::NotAuthenticated) => "Unauthorized".to_string(),
                Self::CoreError(CoreError::ValidationError(msg))
                | Self::ServiceError(ServiceError::CoreError(CoreError::ValidationError(msg))) => {
                    msg.clone()
                }
                other => other.to_string(),
            },
        }
    }

    /// ## Summary
    /// Writes the status and a JSON `{"error": ...}` body.
    ///
    /// ## Side Effects
    /// Logs server-side failures at error level.
    pub fn render(self, res: &mut salvo::Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        res.status_code(status);
        res.render(Json(ErrorResponse {
            error: self.public_message(),
        }));
    }
}
