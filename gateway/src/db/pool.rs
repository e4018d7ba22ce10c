//! PostgreSQL connection pool setup.
//!
//! One pool is created at process start and shared by all request tasks;
//! transactions are acquired from it per request.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db::schema;

/// Create the shared connection pool from configuration.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        max_connections = config.db_max_connections,
        "postgres_pool_created"
    );

    Ok(pool)
}

/// Apply the pipeline schema.
///
/// Every statement is `CREATE ... IF NOT EXISTS`, so this is safe to run on
/// every startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in schema::statements() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to initialize database schema")?;
    }

    info!("postgres_schema_initialized");

    Ok(())
}
