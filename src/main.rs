use std::net::SocketAddr;
use std::sync::Arc;

use registration_server::config::{establish_connection, AppConfig};
use registration_server::domain::health::init_start_time;
use registration_server::shutdown::shutdown_signal;
use registration_server::utils::logging::init_logging;
use registration_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 종료 시까지 유지)
    let _log_guard = init_logging();
    init_start_time();

    // 3. 설정 및 DB 연결
    let config = AppConfig::from_env()?;
    let db = Arc::new(establish_connection(&config).await?);

    let state = AppState {
        db: Arc::clone(&db),
        config: config.clone(),
    };

    // 4. 서버 실행
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 5. 커넥션 풀 정리 (다른 참조가 남아 있으면 drop 시 정리)
    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await?,
        Err(_) => tracing::warn!("Database pool still shared at shutdown, skipping explicit close"),
    }
    tracing::info!("Server stopped");

    Ok(())
}
