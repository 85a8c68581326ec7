use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use super::dto::{AttendanceCode, AttendanceRecord, MarkAttendanceRequest};
use super::service::AttendanceService;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;
#[allow(unused_imports)]
use super::dto::{
    SuccessAttendanceCodeResponse, SuccessAttendanceListResponse, SuccessAttendanceRecordResponse,
};

/// 출석 코드 조회 API
///
/// 처음 호출하면 코드를 발급하고, 이후에는 같은 코드를 돌려줍니다.
#[utoipa::path(
    get,
    path = "/api/form/attendanceCode/{id}",
    params(("id" = String, Path, description = "폼 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "출석 코드 조회 성공", body = SuccessAttendanceCodeResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "등록 없음", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn get_attendance_code(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(form_id): Path<String>,
) -> Result<Json<BaseResponse<AttendanceCode>>, AppError> {
    let code = AttendanceService::get_attendance_code(&state.db, &form_id, &user).await?;

    Ok(Json(BaseResponse::success(
        "Attendance code fetched successfully",
        code,
    )))
}

/// 출석 처리 API (관리자)
#[utoipa::path(
    post,
    path = "/api/form/markAttendance",
    request_body = MarkAttendanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "출석 처리 성공", body = SuccessAttendanceRecordResponse),
        (status = 400, description = "코드 누락", body = ErrorResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse),
        (status = 404, description = "잘못된 코드", body = ErrorResponse),
        (status = 409, description = "이미 출석 처리됨", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<AttendanceRecord>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let record = AttendanceService::mark_attendance(&state.db, &req.attendance_code).await?;

    Ok(Json(BaseResponse::success(
        "Attendance marked successfully",
        record,
    )))
}

/// 출석 현황 내보내기 API (관리자)
#[utoipa::path(
    get,
    path = "/api/form/export-attendance/{id}",
    params(("id" = String, Path, description = "폼 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "출석 현황 조회 성공", body = SuccessAttendanceListResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse),
        (status = 404, description = "폼 없음", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn export_attendance(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<BaseResponse<Vec<AttendanceRecord>>>, AppError> {
    let records = AttendanceService::export_attendance(&state.db, &form_id).await?;

    Ok(Json(BaseResponse::success(
        "Attendance exported successfully",
        records,
    )))
}
