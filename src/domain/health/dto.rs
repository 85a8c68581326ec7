use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// `/health` 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub database: DatabaseCheck,
}

impl HealthStatus {
    /// 로드밸런서가 읽는 상태 코드. DB에 닿지 못할 때만 503입니다.
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            HealthState::Healthy | HealthState::Degraded => StatusCode::OK,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// DB 응답이 느림
    Degraded,
    /// DB 연결 불가
    Unhealthy,
}

impl HealthState {
    pub fn classify(check: &DatabaseCheck, degraded_after: Duration) -> Self {
        if !check.reachable {
            HealthState::Unhealthy
        } else if check.latency_ms >= degraded_after.as_millis() as u64 {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        }
    }
}

/// DB ping 결과
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    pub reachable: bool,
    #[schema(example = 4)]
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatabaseCheck {
    pub fn reachable(latency: Duration) -> Self {
        Self {
            reachable: true,
            latency_ms: latency.as_millis() as u64,
            error: None,
        }
    }

    pub fn unreachable(latency: Duration, error: impl Into<String>) -> Self {
        Self {
            reachable: false,
            latency_ms: latency.as_millis() as u64,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_millis(500);

    #[test]
    fn should_classify_unreachable_database_as_unhealthy() {
        let check = DatabaseCheck::unreachable(Duration::from_millis(10), "connection refused");

        assert_eq!(HealthState::classify(&check, THRESHOLD), HealthState::Unhealthy);
    }

    #[test]
    fn should_classify_slow_database_as_degraded() {
        let check = DatabaseCheck::reachable(Duration::from_millis(800));

        assert_eq!(HealthState::classify(&check, THRESHOLD), HealthState::Degraded);
    }

    #[test]
    fn should_classify_fast_database_as_healthy() {
        let check = DatabaseCheck::reachable(Duration::from_millis(3));

        assert_eq!(HealthState::classify(&check, THRESHOLD), HealthState::Healthy);
    }

    #[test]
    fn should_answer_503_only_when_unhealthy() {
        // Arrange
        let status = |state| HealthStatus {
            status: state,
            version: "0.1.0",
            uptime_secs: 1,
            database: DatabaseCheck::reachable(Duration::ZERO),
        };

        // Act & Assert
        assert_eq!(status(HealthState::Healthy).http_status(), StatusCode::OK);
        assert_eq!(status(HealthState::Degraded).http_status(), StatusCode::OK);
        assert_eq!(
            status(HealthState::Unhealthy).http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn should_serialize_database_check_inline() {
        let status = HealthStatus {
            status: HealthState::Degraded,
            version: "0.1.0",
            uptime_secs: 60,
            database: DatabaseCheck::reachable(Duration::from_millis(700)),
        };

        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "degraded");
        assert_eq!(json["uptimeSecs"], 60);
        assert_eq!(json["database"]["reachable"], true);
        assert_eq!(json["database"]["latencyMs"], 700);
        assert!(json["database"].get("error").is_none());
    }
}
