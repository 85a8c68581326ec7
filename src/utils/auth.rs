use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::decode_token;

/// 쿠키 이름 상수
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 사용자 권한 등급. 선언 순서가 곧 권한의 크기입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// `required` 등급 이상이면 true
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }
}

/// 인증된 호출자 정보 (`{email, access}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    pub access: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.access == Role::Admin
    }
}

/// 토큰 검증 미들웨어
///
/// Authorization 헤더(Bearer) 또는 `access_token` 쿠키에서 JWT를 꺼내 검증하고,
/// 호출자 정보를 request extension에 넣습니다.
pub async fn verify_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())?;
    let claims = decode_token(&token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(CurrentUser {
        email: claims.sub,
        access: claims.access,
    });

    Ok(next.run(request).await)
}

/// 권한 게이트 미들웨어. `verify_token` 뒤에서 동작해야 합니다.
pub async fn check_access(
    required: Role,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !user.access.satisfies(required) {
        tracing::warn!(
            email = %user.email,
            access = ?user.access,
            required = ?required,
            "access denied"
        );
        return Err(AppError::forbidden(
            "You do not have permission to access this resource",
        ));
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

fn extract_token(headers: &axum::http::HeaderMap) -> Result<String, AppError> {
    // 1. Authorization 헤더
    if let Some(auth_header) = headers.get(AUTHORIZATION) {
        let value = auth_header
            .to_str()
            .map_err(|_| AppError::unauthorized("Malformed authorization header"))?;

        return value
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::unauthorized("Invalid token format"));
    }

    // 2. 쿠키: "name1=value1; name2=value2"
    let cookie_header = headers
        .get(COOKIE)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    let cookie_str = cookie_header
        .to_str()
        .map_err(|_| AppError::unauthorized("Malformed cookie header"))?;

    cookie_str
        .split(';')
        .filter_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(ACCESS_TOKEN_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}
