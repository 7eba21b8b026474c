//! Liveness and readiness checks.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dto::ApiResponse;
use crate::service::TreeService;
use crate::traits::{ClosureStore, NodeStore};

pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::message("Process is alive")))
}

/// Ready once the pool can reach the database.
pub async fn readiness<N, S>(State(service): State<Arc<TreeService<N, S>>>) -> impl IntoResponse
where
    N: NodeStore,
    S: ClosureStore,
{
    match service.connection().ping().await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::message("Database is reachable"))),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failure("Database is unreachable")),
            )
        }
    }
}
