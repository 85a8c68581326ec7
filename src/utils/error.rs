use std::fmt::Display;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};
use validator::ValidationErrors;

use super::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
///
/// 서비스 계층은 이 타입만 반환하고, HTTP 상태 코드로의 변환은
/// `IntoResponse` 구현에서만 일어납니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 필수 입력 누락 또는 형식 오류
    #[error("{0}")]
    InvalidInput(String),
    /// 입력은 올바르지만 현재 상태에서 허용되지 않는 요청
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid request body: {0}")]
    JsonParseFailed(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// 예상하지 못한 영속성/런타임 오류. `cause`는 로그에만 남깁니다.
    #[error("{message}")]
    InternalError { message: String, cause: String },
}

impl AppError {
    /// 클라이언트에 노출되는 에러 메시지
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        // 에러 로깅
        match &self {
            AppError::InternalError { message, cause } => {
                error!(cause = %cause, "Internal Server Error: {}", message);
            }
            _ => {
                warn!(status = status.as_u16(), "Request rejected: {}", message);
            }
        }

        let error_response = ErrorResponse::new(status.as_u16(), message);

        (status, Json(error_response)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::ValidationError(message)
    }
}

/// 편의 함수들
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        AppError::InvalidOperation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    /// 내부 오류를 공개 메시지와 원인으로 감쌉니다.
    pub fn internal(msg: impl Into<String>, cause: impl Display) -> Self {
        AppError::InternalError {
            message: msg.into(),
            cause: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn should_map_error_kinds_to_status_codes() {
        assert_eq!(
            AppError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::invalid_operation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::internal("x", "db down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn should_hide_internal_cause_from_message() {
        let err = AppError::internal("Error removing team member", "connection reset");

        assert_eq!(err.message(), "Error removing team member");
        assert!(!err.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn should_render_error_envelope() {
        // Arrange
        let err = AppError::forbidden("Only the team creator or admin can remove members");

        // Act
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // Assert
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 403);
        assert_eq!(
            json["message"],
            "Only the team creator or admin can remove members"
        );
    }
}
