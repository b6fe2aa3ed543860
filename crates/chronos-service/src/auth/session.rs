//! Refresh token persistence.
//!
//! Refresh tokens are stored as SHA-256 digests. Presenting a token consumes
//! its row, so each refresh token works once.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use chronos_core::config::AuthConfig;
use chronos_db::db::connection::DbConnection;
use chronos_db::db::query::session;
use chronos_db::model::session::NewRefreshSession;
use chronos_db::model::user::User;

use super::token::{self, TokenKind, TokenPair};
use crate::error::ServiceResult;

/// Hex-encoded SHA-256 digest of a refresh token.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// ## Summary
/// Issues an access and refresh token for `user` and records the refresh
/// token.
///
/// ## Errors
/// Returns an error if signing or the insert fails.
///
/// ## Side Effects
/// Inserts a `refresh_session` row.
#[tracing::instrument(skip(conn, config, user), fields(user_id = %user.id))]
pub async fn issue_pair(
    conn: &mut DbConnection<'_>,
    config: &AuthConfig,
    user: &User,
    now: DateTime<Utc>,
) -> ServiceResult<TokenPair> {
    let (access_token, _) = token::issue(config, TokenKind::Access, user.id, &user.email, now)?;
    let (refresh_token, refresh_claims) =
        token::issue(config, TokenKind::Refresh, user.id, &user.email, now)?;

    let token_hash = hash_token(&refresh_token);
    session::create_session(
        conn,
        &NewRefreshSession {
            id: uuid::Uuid::now_v7(),
            user_id: user.id,
            token_hash: &token_hash,
            expires_at: refresh_claims.expires_at(),
        },
    )
    .await?;

    tracing::debug!("Issued token pair");

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}
