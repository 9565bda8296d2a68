//! Handler failures and their JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::filter::FilterError;
use crate::store::StoreError;

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Submitted payload, echoed back on 404.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Underlying store failure on 500.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Data not found")]
    NotFound { data: Value },

    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` on store calls.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            ApiError::Validation(_) => {
                warn!(%message, "rejected request");
                ErrorBody {
                    message,
                    data: None,
                    error: None,
                }
            }
            ApiError::NotFound { data } => ErrorBody {
                message,
                data: Some(data),
                error: None,
            },
            ApiError::Store { source, .. } => {
                error!(error = %source, "{message}");
                ErrorBody {
                    message,
                    data: None,
                    error: Some(source.to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_errors_become_validation_failures() {
        let err = ApiError::from(FilterError::Missing);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("monthYear"));
    }

    #[test]
    fn store_adapter_keeps_context_and_source() {
        let err = ApiError::store("Error updating data")(StoreError::Unavailable("timeout".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error updating data");
        assert!(matches!(err, ApiError::Store { source: StoreError::Unavailable(_), .. }));
    }

    #[test]
    fn error_body_omits_absent_fields() {
        let body = ErrorBody {
            message: "bad".to_string(),
            data: None,
            error: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"message":"bad"}"#);
    }
}
