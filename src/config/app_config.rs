use std::env;

const DEV_JWT_SECRET: &str = "secret";

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: i64,
    /// true면 시작 시 엔티티 기준으로 테이블/인덱스를 생성합니다.
    pub db_schema_update: bool,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키-값 조회 함수에서 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let is_production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if is_production => return Err(ConfigError::MissingJwtSecret),
            None => {
                tracing::warn!(
                    "JWT_SECRET is not set; using the development default. Set it in production."
                );
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt_expiration = lookup("JWT_EXPIRATION")
            .unwrap_or_else(|| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidExpiration)?;

        let db_schema_update = match lookup("DB_SCHEMA_UPDATE") {
            Some(value) => value.parse::<bool>().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
                );
                false
            }),
            None => false,
        };

        Ok(Self {
            server_port,
            database_url,
            jwt_secret,
            jwt_expiration,
            db_schema_update,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid expiration time")]
    InvalidExpiration,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
    #[error("JWT_SECRET environment variable is required in production")]
    MissingJwtSecret,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_apply_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/db")]))
                .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.jwt_expiration, 86400);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(!config.db_schema_update);
    }

    #[test]
    fn should_fail_without_database_url() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingDatabaseUrl)));
    }

    #[test]
    fn should_require_jwt_secret_in_production() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("APP_ENV", "production"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingJwtSecret)));
    }

    #[test]
    fn should_fail_for_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("SERVER_PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn should_read_schema_update_flag() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("DB_SCHEMA_UPDATE", "true"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();

        assert!(config.db_schema_update);
        assert_eq!(config.jwt_secret, "s3cr3t");
    }
}
