//! tracing 구독자 설정
//!
//! stdout에는 항상 JSON 로그를 쓰고, `LOG_DIR`이 지정된 경우에만 일별 파일을 함께 남깁니다.

use std::path::PathBuf;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,registration_server=debug,tower_http=info";
const LOG_FILE_PREFIX: &str = "registration-server.log";

/// 환경변수에서 읽은 로깅 설정
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub filter: String,
    pub log_dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            filter: non_blank("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            log_dir: non_blank("LOG_DIR").map(PathBuf::from),
        }
    }
}

/// 전역 구독자를 설치합니다.
///
/// 파일 출력을 켠 경우 반환된 guard를 main이 끝까지 들고 있어야 버퍼가 비워집니다.
pub fn init_logging() -> Option<WorkerGuard> {
    let settings = LogSettings::from_lookup(|key| std::env::var(key).ok());

    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|err| {
        eprintln!("Invalid RUST_LOG '{}': {}, using default", settings.filter, err);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true);

    let (file_layer, guard) = match settings.log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            let layer = fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing: {}", err);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_log_to_stdout_only_by_default() {
        let settings = LogSettings::from_lookup(lookup(&[]));

        assert_eq!(settings.filter, DEFAULT_FILTER);
        assert_eq!(settings.log_dir, None);
    }

    #[test]
    fn should_enable_file_output_when_log_dir_is_set() {
        let settings = LogSettings::from_lookup(lookup(&[
            ("LOG_DIR", "/var/log/registration"),
            ("RUST_LOG", "warn"),
        ]));

        assert_eq!(settings.filter, "warn");
        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/registration")));
    }

    #[test]
    fn should_ignore_blank_values() {
        let settings = LogSettings::from_lookup(lookup(&[("LOG_DIR", "  "), ("RUST_LOG", "")]));

        assert_eq!(settings.filter, DEFAULT_FILTER);
        assert_eq!(settings.log_dir, None);
    }
}
