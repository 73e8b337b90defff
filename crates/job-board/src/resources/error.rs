use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Failure of a resource operation. The message is passed through to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// The payload could not be coerced into the record shape.
    #[error("{0}")]
    Validation(String),
    /// The document store is unreachable or failed for a reason unrelated to the payload.
    #[error("{0}")]
    Infrastructure(String),
}

impl ResourceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResourceError::Validation(_) => StatusCode::BAD_REQUEST,
            ResourceError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SchemaError> for ResourceError {
    fn from(value: SchemaError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<StoreError> for ResourceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Rejected(message) => Self::Validation(message),
            StoreError::Unavailable(message) => Self::Infrastructure(message),
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
