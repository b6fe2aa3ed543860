//! JWT issuing and verification.
//!
//! Every token kind is signed with HS256 under its own secret, so an access
//! token can never be replayed as a refresh, activation or reset token.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use chronos_core::config::AuthConfig;

use crate::error::{ServiceError, ServiceResult};

/// Lifetime of an emailed activation link.
pub const ACTIVATION_TTL_SECS: i64 = 24 * 60 * 60;
/// Lifetime of an emailed password reset link.
pub const RESET_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    Activation,
    Reset,
}

impl TokenKind {
    fn secret(self, config: &AuthConfig) -> &str {
        match self {
            Self::Access => &config.access_secret,
            Self::Refresh => &config.refresh_secret,
            Self::Activation => &config.activation_secret,
            Self::Reset => &config.reset_secret,
        }
    }

    /// Lifetime of a token of this kind.
    #[must_use]
    pub fn ttl(self, config: &AuthConfig) -> TimeDelta {
        let secs = match self {
            Self::Access => i64::try_from(config.access_ttl_secs).unwrap_or(i64::MAX),
            Self::Refresh => i64::try_from(config.refresh_ttl_secs).unwrap_or(i64::MAX),
            Self::Activation => ACTIVATION_TTL_SECS,
            Self::Reset => RESET_TTL_SECS,
        };
        TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: uuid::Uuid,
}

impl Claims {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Access and refresh token handed out on register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// ## Summary
/// Signs a token of `kind` for the given user.
///
/// ## Errors
/// Returns `TokenError` if encoding fails.
pub fn issue(
    config: &AuthConfig,
    kind: TokenKind,
    user_id: uuid::Uuid,
    email: &str,
    now: DateTime<Utc>,
) -> ServiceResult<(String, Claims)> {
    let exp = now
        .checked_add_signed(kind.ttl(config))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
        jti: uuid::Uuid::new_v4(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(kind.secret(config).as_bytes()),
    )?;

    Ok((token, claims))
}

/// ## Summary
/// Verifies signature and expiry of a token of `kind`.
///
/// ## Errors
/// Returns `TokenError` if the token is malformed, expired or signed with
/// another secret.
pub fn verify(config: &AuthConfig, kind: TokenKind, token: &str) -> ServiceResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(kind.secret(config).as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, ?kind, "Token verification failed");
        ServiceError::TokenError(e)
    })?;

    Ok(data.claims)
}
