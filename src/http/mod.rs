//! Axum router exposing the tree over JSON.

pub mod error;
pub mod handlers;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::service::TreeService;
use crate::traits::{ClosureStore, NodeStore};

pub fn router<N, S>(service: Arc<TreeService<N, S>>) -> Router
where
    N: NodeStore,
    S: ClosureStore,
{
    Router::new()
        .route(
            "/nodes",
            get(handlers::list_roots::<N, S>).post(handlers::create_node::<N, S>),
        )
        .route(
            "/nodes/:id",
            get(handlers::get_node::<N, S>)
                .put(handlers::update_node::<N, S>)
                .delete(handlers::delete_node::<N, S>),
        )
        .route(
            "/nodes/:id/descendants",
            get(handlers::list_descendants::<N, S>),
        )
        .route("/nodes/:id/move", post(handlers::move_node::<N, S>))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness::<N, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
