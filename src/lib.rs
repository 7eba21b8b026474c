//! Closure-table tree service on SeaORM (PostgreSQL).
//!
//! Every node owns a self-edge of depth 0 plus one `node_closure` row per
//! ancestor, so subtree reads are a single indexed lookup. The crate exposes
//! the stores, the transactional [`TreeService`] and an axum [`router`] over it.

pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod http;
pub mod lock;
pub mod schema;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use config::{
    AdvisoryLockKey, AdvisoryLockStrategy, AppConfig, ClosureTableConfig, DatabaseConfig,
    LogFormat,
};
pub use error::TreeError;
pub use http::router;
pub use service::TreeService;
pub use store::{SeaClosureStore, SeaNodeStore};
pub use traits::{ClosureStore, NodeStore};
