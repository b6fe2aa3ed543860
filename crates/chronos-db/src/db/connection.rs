//! Connection pool shared by every request.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use chronos_core::config::DatabaseConfig;

use crate::db::DbProvider;
use crate::error::DbResult;

pub type DbPool = Pool<AsyncPgConnection>;

/// A connection checked out of a [`DbPool`]; it goes back on drop.
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

/// Checkout wait before a request gives up with a pool error.
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// ## Summary
/// Builds the pool described by the `database` config section.
///
/// ## Errors
/// Returns an error if the pool cannot be built from the configured URL.
pub async fn pool_from_config(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    create_pool(&config.url, u32::from(config.max_connections)).await
}

/// ## Summary
/// Creates a pool of at most `size` connections to `database_url`.
///
/// One connection is opened eagerly so a wrong URL fails at startup rather
/// than on the first request.
///
/// ## Errors
/// Returns an error if the pool cannot be created with the provided database URL.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(size.max(1))
        .min_idle(Some(1))
        .connection_timeout(CHECKOUT_TIMEOUT)
        .test_on_check_out(false)
        .build(manager)
        .await?;

    tracing::debug!(pool_size = size, "Database pool ready");

    Ok(pool)
}

impl DbProvider for DbPool {
    fn get_connection<'a>(
        &'a self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = DbResult<DbConnection<'a>>> + Send + 'a>>
    {
        Box::pin(async move {
            let conn = self.get().await.inspect_err(|e| {
                tracing::warn!(error = %e, "Failed to check out a database connection");
            })?;
            Ok(conn)
        })
    }
}
