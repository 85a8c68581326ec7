use serde::Serialize;
use utoipa::ToSchema;

/// API 기본 응답 구조체
///
/// 형식:
/// ```json
/// {
///   "success": true,
///   "message": "Member removed successfully",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 에러 응답 구조체
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = 404)]
    pub status_code: u16,
    #[schema(example = "Member not found in this team")]
    pub message: String,
}

impl ErrorResponse {
    /// 에러 응답 생성
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
        }
    }
}
