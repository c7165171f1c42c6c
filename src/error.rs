//! Ошибки HTTP слоя

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ModelError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} model not loaded")]
    ModelUnavailable(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServiceError::Validation(msg) => json!({ "error": msg }),
            ServiceError::ModelUnavailable(_) => {
                tracing::error!(detail = %self, "Model unavailable");
                json!({ "error": self.to_string() })
            }
            // Детали наружу не отдаем, только id для поиска в логах
            ServiceError::Model(_) | ServiceError::Store(_) | ServiceError::Internal(_) => {
                let correlation_id = uuid::Uuid::new_v4().to_string();
                tracing::error!(correlation_id = %correlation_id, detail = %self, "Request failed");
                json!({
                    "error": "Internal server error",
                    "correlation_id": correlation_id,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            ServiceError::Validation("Missing required field: rainfall".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ModelUnavailable("Regression").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unavailable_message_names_model() {
        assert_eq!(
            ServiceError::ModelUnavailable("Sequence").to_string(),
            "Sequence model not loaded"
        );
    }
}
