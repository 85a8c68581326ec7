use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 클라이언트가 보낸 값을 그대로 쓸 수 있는 최대 길이
const MAX_REQUEST_ID_LEN: usize = 128;

/// 들어온 `x-request-id`를 쓸 수 있으면 재사용하고, 아니면 UUID v4를 새로 만듭니다.
pub fn resolve_request_id(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// 요청마다 ID를 정해 요청/응답 헤더에 싣고, 그 ID의 span 안에서 핸들러를 실행합니다.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    span.in_scope(|| log_completion(response.status(), elapsed_ms));

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

fn log_completion(status: StatusCode, elapsed_ms: u64) {
    let code = status.as_u16();
    if status.is_server_error() {
        error!(status = code, elapsed_ms, "request failed");
    } else if status.is_client_error() {
        warn!(status = code, elapsed_ms, "request rejected");
    } else {
        info!(status = code, elapsed_ms, "request completed");
    }
}
