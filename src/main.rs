use std::sync::Arc;

use closure_table::{db, http, schema, telemetry, AppConfig, TreeError, TreeService};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), TreeError> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    let conn = db::connect(&config.database).await?;
    if config.database.ensure_schema {
        schema::ensure_schema(&conn).await?;
        tracing::info!("schema ensured");
    }

    let service = Arc::new(TreeService::new(conn, config.tree.clone()));
    tracing::info!(lock = ?service.config().lock_strategy(), "tree service ready");
    let app = http::router(service);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "closure-table listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
