use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dto::ApiResponse;
use crate::error::TreeError;

impl TreeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TreeError::Validation(_) => StatusCode::BAD_REQUEST,
            TreeError::NotFound(_) => StatusCode::NOT_FOUND,
            TreeError::ReferenceNotFound(_) | TreeError::CyclicMove { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TreeError::UnsupportedBackend
            | TreeError::Database(_)
            | TreeError::Sqlx(_)
            | TreeError::Io(_)
            | TreeError::Config(_)
            | TreeError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TreeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_client_error() {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        } else {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
            "Internal server error".to_string()
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

impl From<JsonRejection> for TreeError {
    fn from(rejection: JsonRejection) -> Self {
        TreeError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for TreeError {
    fn from(rejection: PathRejection) -> Self {
        TreeError::validation(rejection.body_text())
    }
}
