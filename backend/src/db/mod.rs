//! PostgreSQL pool setup and migrations

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pool tuning
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            // Short enough that an unreachable database surfaces as 503
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Connect a pool with default settings and the given size cap
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let settings = PoolSettings {
        max_connections,
        ..Default::default()
    };
    create_pool_with(database_url, &settings).await
}

pub async fn create_pool_with(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(database_url)?.application_name("clinic-backend");

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections.min(settings.max_connections))
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = settings.max_connections,
        min = settings.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
