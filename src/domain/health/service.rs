use std::sync::OnceLock;
use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::time::timeout;

use super::dto::{DatabaseCheck, HealthState, HealthStatus};

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

const PING_TIMEOUT: Duration = Duration::from_secs(3);
const DEGRADED_AFTER: Duration = Duration::from_millis(500);

/// 가동 시간 기준점. main에서 서버 시작 전에 호출합니다.
pub fn init_start_time() {
    STARTED_AT.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    STARTED_AT.get().map_or(0, |t| t.elapsed().as_secs())
}

pub async fn check_health(db: &DatabaseConnection) -> HealthStatus {
    let database = ping_database(db).await;

    HealthStatus {
        status: HealthState::classify(&database, DEGRADED_AFTER),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime_secs(),
        database,
    }
}

async fn ping_database(db: &DatabaseConnection) -> DatabaseCheck {
    let started = Instant::now();

    match timeout(PING_TIMEOUT, db.ping()).await {
        Ok(Ok(())) => DatabaseCheck::reachable(started.elapsed()),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "database ping failed");
            DatabaseCheck::unreachable(started.elapsed(), e.to_string())
        }
        Err(_) => {
            tracing::warn!(timeout_ms = PING_TIMEOUT.as_millis() as u64, "database ping timed out");
            DatabaseCheck::unreachable(PING_TIMEOUT, "ping timed out")
        }
    }
}
