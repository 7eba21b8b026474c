use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;
use crate::error::TreeError;

/// Open the process-wide PostgreSQL pool.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, TreeError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}
