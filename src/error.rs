use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the closure-table stores and tree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    ReferenceNotFound(String),

    #[error("node {0} not found")]
    NotFound(Uuid),

    #[error("cannot move node {node} under {target}: target is inside the moved subtree")]
    CyclicMove { node: Uuid, target: Uuid },

    #[error("closure-table currently supports PostgreSQL connections only")]
    UnsupportedBackend,

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("closure-table invariant violation: {0}")]
    Invariant(String),
}

impl TreeError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn ancestor_not_found() -> Self {
        Self::ReferenceNotFound("Ancestor node is not found".to_string())
    }

    /// True for failures caused by the caller rather than the infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::ReferenceNotFound(_)
                | Self::NotFound(_)
                | Self::CyclicMove { .. }
        )
    }
}
