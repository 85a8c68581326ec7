use axum::{extract::State, http::StatusCode, Json};

use super::dto::HealthStatus;
use super::service::check_health;
use crate::state::AppState;

/// 헬스체크 API
///
/// 버전, 가동 시간, DB ping 결과를 반환합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "정상 또는 지연", body = HealthStatus),
        (status = 503, description = "데이터베이스 연결 불가", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = check_health(&state.db).await;

    (status.http_status(), Json(status))
}
