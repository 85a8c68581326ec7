use std::sync::Arc;

use crate::config::AppConfig;
use sea_orm::DatabaseConnection;

/// 핸들러와 미들웨어가 공유하는 상태
///
/// `db`는 main에서 한 번 연결한 풀을 `Arc`로 공유하며, 종료 시 main이 직접 닫습니다.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    /// JWT 비밀키 등 인증 설정 포함
    pub config: AppConfig,
}
