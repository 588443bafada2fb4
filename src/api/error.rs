//! API 错误与 JSON 错误响应

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ExtractionError, StorageError};

/// API 层错误，统一返回 `{success: false, message}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 输入错误（400）
    #[error("{0}")]
    BadRequest(String),
    /// 资源不存在（404）
    #[error("{0}")]
    NotFound(String),
    /// 上游或内部错误（500），消息原样返回
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
