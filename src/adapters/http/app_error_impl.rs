use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidEmail
            | AppError::MissingName
            | AppError::DuplicateEmail
            | AppError::InvalidRequest(_)
            | AppError::RateLimited => tracing::warn!(error = %self, "Request rejected"),
            _ => tracing::error!(error = ?self, "Request failed"),
        }

        match self {
            AppError::InvalidEmail => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidEmail,
                self.to_string(),
            ),
            AppError::MissingName => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::MissingName,
                self.to_string(),
            ),
            AppError::InvalidRequest(_) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                self.to_string(),
            ),
            AppError::DuplicateEmail => {
                let body = serde_json::json!({
                    "status": "duplicate",
                    "code": ErrorCode::DuplicateEmail.as_str(),
                    "message": self.to_string(),
                });
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AppError::RateLimited => error_resp(
                StatusCode::TOO_MANY_REQUESTS,
                ErrorCode::RateLimited,
                self.to_string(),
            ),
            AppError::Storage(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::StorageFailure,
                self.to_string(),
            ),
            AppError::Email(_) | AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Something went wrong. Please try again.".into(),
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({
        "status": "error",
        "code": code.as_str(),
        "message": message,
    });
    (status, Json(body)).into_response()
}
