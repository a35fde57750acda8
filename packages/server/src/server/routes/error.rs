use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::{ErrorKind, LifecycleError};

impl LifecycleError {
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LifecycleError {
    fn into_response(self) -> Response {
        if let LifecycleError::Storage(e) = &self {
            tracing::error!(error = %e, "Storage failure");
        }

        (
            self.status_code(),
            Json(json!({
                "error": self.kind(),
                "message": self.public_message(),
            })),
        )
            .into_response()
    }
}
