use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use super::dto::{FormDeleteResponse, FormRequest, FormResponse};
use super::service::FormService;
use crate::state::AppState;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;
#[allow(unused_imports)]
use super::dto::{SuccessFormDeleteResponse, SuccessFormListResponse, SuccessFormResponse};

/// 전체 폼 목록 조회 API
#[utoipa::path(
    get,
    path = "/api/form/getAllForms",
    responses(
        (status = 200, description = "폼 목록 조회 성공", body = SuccessFormListResponse),
        (status = 500, description = "서버 내부 오류", body = ErrorResponse)
    ),
    tag = "Form"
)]
pub async fn get_all_forms(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<Vec<FormResponse>>>, AppError> {
    let forms = FormService::list_forms(&state.db).await?;

    Ok(Json(BaseResponse::success("Forms fetched successfully", forms)))
}

/// 폼 생성 API (관리자)
#[utoipa::path(
    post,
    path = "/api/form/addForm",
    request_body = FormRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "폼 생성 성공", body = SuccessFormResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn add_form(
    State(state): State<AppState>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FormResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let form = FormService::add_form(&state.db, req).await?;

    Ok(Json(BaseResponse::success("Form created successfully", form)))
}

/// 폼 수정 API (관리자)
#[utoipa::path(
    put,
    path = "/api/form/editForm/{id}",
    params(("id" = String, Path, description = "폼 ID")),
    request_body = FormRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "폼 수정 성공", body = SuccessFormResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse),
        (status = 404, description = "폼 없음", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FormResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let form = FormService::edit_form(&state.db, &form_id, req).await?;

    Ok(Json(BaseResponse::success("Form updated successfully", form)))
}

/// 폼 삭제 API (관리자)
///
/// 폼에 연결된 등록도 함께 삭제됩니다.
#[utoipa::path(
    delete,
    path = "/api/form/deleteForm/{id}",
    params(("id" = String, Path, description = "폼 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "폼 삭제 성공", body = SuccessFormDeleteResponse),
        (status = 403, description = "관리자 아님", body = ErrorResponse),
        (status = 404, description = "폼 없음", body = ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<BaseResponse<FormDeleteResponse>>, AppError> {
    let deleted = FormService::delete_form(&state.db, &form_id).await?;

    Ok(Json(BaseResponse::success("Form deleted successfully", deleted)))
}
