//! Account lifecycle: registration, login, token refresh, logout, activation
//! and password reset.

use chrono::Utc;
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

use chronos_core::config::Settings;
use chronos_core::constants::{CLIENT_ACTIVATE_PATH, CLIENT_RESET_PASSWORD_PATH};
use chronos_db::db::connection::DbConnection;
use chronos_db::db::query::{session as session_query, user as user_query};
use chronos_db::model::user::NewUser;

use super::password::{check_password_strength, hash_password, verify_password};
use super::session::{hash_token, issue_pair};
use super::token::{self, TokenKind, TokenPair};
use crate::error::{ServiceError, ServiceResult};
use crate::mail::{MailMessage, Mailer};

const WRONG_CREDENTIALS: &str = "Wrong email or password";
const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Body of operations that only report completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub const OK: Self = Self { success: true };
}

/// Emails are compared and stored lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(request: &RegisterRequest, email: &str) -> ServiceResult<()> {
    if request.name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ServiceError::ValidationError(
            "Email must be a valid address".to_string(),
        ));
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return Err(ServiceError::ValidationError(
            "Email must be a valid address".to_string(),
        ));
    }
    check_password_strength(&request.password)
}

/// ## Summary
/// Creates an inactive account, mails an activation link and signs the user in.
///
/// ## Errors
/// Returns `ValidationError` for malformed input or an email that is already
/// registered, and database, token or mail errors otherwise.
///
/// ## Side Effects
/// - Inserts a user row and a refresh session row
/// - Sends an activation mail
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn register(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    mailer: &dyn Mailer,
    request: &RegisterRequest,
) -> ServiceResult<TokenPair> {
    let email = normalize_email(&request.email);
    validate_registration(request, &email)?;

    if user_query::find_by_email(conn, &email).await?.is_some() {
        return Err(ServiceError::ValidationError(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let name = request.name.trim().to_string();
    let surname = request
        .surname
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let auth = settings.auth.clone();
    let now = Utc::now();

    let (user, pair) = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let new_user = NewUser {
                    id: uuid::Uuid::now_v7(),
                    name: &name,
                    surname: surname.as_deref(),
                    email: &email,
                    password_hash: &password_hash,
                };
                let user = user_query::create_user(tx, &new_user)
                    .await
                    .map_err(|e| match e {
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            _,
                        ) => ServiceError::ValidationError(
                            "User with this email already exists".to_string(),
                        ),
                        other => ServiceError::DieselError(other),
                    })?;
                let pair = issue_pair(tx, &auth, &user, now).await?;
                Ok((user, pair))
            }
            .scope_boxed()
        })
        .await?;

    let (activation_token, _) =
        token::issue(&settings.auth, TokenKind::Activation, user.id, &user.email, now)?;
    let link = settings.client.link(CLIENT_ACTIVATE_PATH, &activation_token);
    mailer
        .send(MailMessage::activation(&user.email, &link))
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(pair)
}

/// ## Summary
/// Signs a user in with email and password.
///
/// ## Errors
/// Returns `ValidationError` when the email is unknown or the password does
/// not match.
///
/// ## Side Effects
/// Inserts a refresh session row.
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    request: &LoginRequest,
) -> ServiceResult<TokenPair> {
    let email = normalize_email(&request.email);
    let Some(user) = user_query::find_by_email(conn, &email).await? else {
        return Err(ServiceError::ValidationError(WRONG_CREDENTIALS.to_string()));
    };

    match verify_password(&request.password, &user.password_hash) {
        Ok(()) => {}
        Err(ServiceError::NotAuthenticated) => {
            return Err(ServiceError::ValidationError(WRONG_CREDENTIALS.to_string()));
        }
        Err(e) => return Err(e),
    }

    let pair = issue_pair(conn, &settings.auth, &user, Utc::now()).await?;
    tracing::debug!(user_id = %user.id, "User logged in");
    Ok(pair)
}

/// ## Summary
/// Exchanges a refresh token for a new token pair.
///
/// The presented token's session is consumed, so each refresh token works
/// once.
///
/// ## Errors
/// Returns `Forbidden` if the token does not verify, was already used or
/// belongs to a user that no longer exists.
///
/// ## Side Effects
/// Deletes the presented session and inserts a new one.
#[tracing::instrument(skip_all)]
pub async fn refresh(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    refresh_token: &str,
) -> ServiceResult<TokenPair> {
    let forbidden = || ServiceError::Forbidden("Invalid refresh token".to_string());

    let claims = token::verify(&settings.auth, TokenKind::Refresh, refresh_token)
        .map_err(|_e| forbidden())?;
    let token_hash = hash_token(refresh_token);
    let auth = settings.auth.clone();
    let now = Utc::now();

    conn.transaction::<_, ServiceError, _>(move |tx| {
        async move {
            let Some(session) = session_query::take_by_hash(tx, &token_hash).await? else {
                tracing::debug!(user_id = %claims.sub, "Refresh token already used or revoked");
                return Err(forbidden());
            };
            if session.user_id != claims.sub || session.expires_at <= now {
                return Err(forbidden());
            }
            let Some(user) = user_query::find_by_id(tx, claims.sub).await? else {
                return Err(forbidden());
            };
            issue_pair(tx, &auth, &user, now).await
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Revokes the session behind a refresh token. Revoking twice is not an error.
///
/// ## Errors
/// Returns `Forbidden` if the token does not verify.
///
/// ## Side Effects
/// Deletes the session row, if present.
#[tracing::instrument(skip_all)]
pub async fn logout(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    refresh_token: &str,
) -> ServiceResult<Success> {
    let claims = token::verify(&settings.auth, TokenKind::Refresh, refresh_token)
        .map_err(|_e| ServiceError::Forbidden("Invalid refresh token".to_string()))?;

    let removed = session_query::take_by_hash(conn, &hash_token(refresh_token)).await?;
    tracing::debug!(user_id = %claims.sub, removed = removed.is_some(), "User logged out");

    Ok(Success::OK)
}

/// ## Summary
/// Activates the account of `user_id` using an emailed activation token.
///
/// ## Errors
/// Returns `ValidationError` if the token does not verify or was issued for
/// another user, and `NotFound` if the user no longer exists.
///
/// ## Side Effects
/// Sets `is_active` on the user row.
#[tracing::instrument(skip(conn, settings, activation_token))]
pub async fn activate(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    activation_token: &str,
    user_id: uuid::Uuid,
) -> ServiceResult<Success> {
    let claims = token::verify(&settings.auth, TokenKind::Activation, activation_token)
        .map_err(|_e| ServiceError::ValidationError(INVALID_TOKEN.to_string()))?;
    if claims.sub != user_id {
        return Err(ServiceError::ValidationError(INVALID_TOKEN.to_string()));
    }

    let updated = user_query::set_active(conn, user_id, true).await?;
    if updated == 0 {
        return Err(ServiceError::NotFound("User not found".to_string()));
    }

    tracing::info!(%user_id, "User activated");
    Ok(Success::OK)
}

/// ## Summary
/// Mails a password reset link to a registered email.
///
/// ## Errors
/// Returns `ValidationError` if no user has this email.
///
/// ## Side Effects
/// Sends a password reset mail.
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn send_reset_password_link(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    mailer: &dyn Mailer,
    request: &ForgotPasswordRequest,
) -> ServiceResult<Success> {
    let email = normalize_email(&request.email);
    let Some(user) = user_query::find_by_email(conn, &email).await? else {
        return Err(ServiceError::ValidationError(
            "User with this email doesn't exist".to_string(),
        ));
    };

    let (reset_token, _) =
        token::issue(&settings.auth, TokenKind::Reset, user.id, &user.email, Utc::now())?;
    let link = settings.client.link(CLIENT_RESET_PASSWORD_PATH, &reset_token);
    mailer
        .send(MailMessage::password_reset(&user.email, &link))
        .await?;

    Ok(Success::OK)
}

/// ## Summary
/// Sets a new password using an emailed reset token and signs the user out
/// everywhere.
///
/// ## Errors
/// Returns `ValidationError` if the token does not verify or the password is
/// too weak, and `NotFound` if the user no longer exists.
///
/// ## Side Effects
/// - Updates the password hash
/// - Deletes every refresh session of the user
#[tracing::instrument(skip_all)]
pub async fn reset_password(
    conn: &mut DbConnection<'_>,
    settings: &Settings,
    request: &ResetPasswordRequest,
) -> ServiceResult<Success> {
    let claims = token::verify(&settings.auth, TokenKind::Reset, &request.token)
        .map_err(|_e| ServiceError::ValidationError(INVALID_TOKEN.to_string()))?;
    check_password_strength(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let user_id = claims.sub;

    conn.transaction::<_, ServiceError, _>(move |tx| {
        async move {
            let updated = user_query::set_password_hash(tx, user_id, &password_hash).await?;
            if updated == 0 {
                return Err(ServiceError::NotFound("User not found".to_string()));
            }
            let revoked = session_query::delete_for_user(tx, user_id).await?;
            tracing::info!(%user_id, revoked, "Password reset");
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(Success::OK)
}
