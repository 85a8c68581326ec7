use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use super::dto::{RegisterRequest, RegistrationSummary, RemoveMemberRequest, TeamDetails};
use super::service::RegistrationService;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;
#[allow(unused_imports)]
use super::dto::{SuccessRegistrationListResponse, SuccessTeamDetailsResponse};

/// 팀 상세 조회 API
///
/// 호출자가 속한 팀의 요약과 멤버 프로필을 반환합니다.
#[utoipa::path(
    get,
    path = "/api/form/teamDetails/{formId}",
    params(("formId" = String, Path, description = "폼 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "팀 상세 조회 성공", body = SuccessTeamDetailsResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "등록 없음", body = ErrorResponse),
        (status = 500, description = "서버 내부 오류", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn get_team_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(form_id): Path<String>,
) -> Result<Json<BaseResponse<TeamDetails>>, AppError> {
    let details = RegistrationService::get_team_details(&state.db, &form_id, &user).await?;

    Ok(Json(BaseResponse::success(
        "Team details fetched successfully",
        details,
    )))
}

/// 팀 멤버 삭제 API
///
/// 팀 생성자 또는 관리자만 멤버를 삭제할 수 있고, 마지막 멤버는 삭제할 수 없습니다.
#[utoipa::path(
    delete,
    path = "/api/form/removeMember/{formId}",
    params(("formId" = String, Path, description = "폼 ID")),
    request_body = RemoveMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "멤버 삭제 성공", body = SuccessTeamDetailsResponse),
        (status = 400, description = "잘못된 요청 / 팀 행사 아님 / 마지막 멤버", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "생성자 또는 관리자 아님", body = ErrorResponse),
        (status = 404, description = "등록 또는 멤버 없음", body = ErrorResponse),
        (status = 500, description = "서버 내부 오류", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(form_id): Path<String>,
    payload: Result<Json<RemoveMemberRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamDetails>>, AppError> {
    let Json(req) = payload?;

    let details =
        RegistrationService::remove_member(&state.db, &form_id, &user, req.member_email()).await?;

    Ok(Json(BaseResponse::success(
        "Member removed successfully",
        details,
    )))
}

/// 폼 등록 API
///
/// 개인 폼은 본인만, 팀 폼은 `teamName`으로 팀을 만들거나 `teamCode`로 합류합니다.
#[utoipa::path(
    post,
    path = "/api/form/register/{formId}",
    params(("formId" = String, Path, description = "폼 ID")),
    request_body = RegisterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "등록 성공", body = SuccessTeamDetailsResponse),
        (status = 400, description = "잘못된 요청 / 마감 / 정원 초과", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "폼 또는 팀 코드 없음", body = ErrorResponse),
        (status = 409, description = "이미 등록됨", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn register(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(form_id): Path<String>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamDetails>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let details = RegistrationService::register(&state.db, &form_id, &user, req).await?;

    Ok(Json(BaseResponse::success("Registration successful", details)))
}

/// 폼 등록 목록 다운로드 API (관리자)
#[utoipa::path(
    get,
    path = "/api/form/download/{id}",
    params(("id" = String, Path, description = "폼 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "등록 목록 조회 성공", body = SuccessRegistrationListResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse),
        (status = 404, description = "폼 없음", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn download_registrations(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<BaseResponse<Vec<RegistrationSummary>>>, AppError> {
    let registrations = RegistrationService::list_registrations(&state.db, &form_id).await?;

    Ok(Json(BaseResponse::success(
        "Registrations fetched successfully",
        registrations,
    )))
}
