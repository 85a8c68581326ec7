use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::auth::Role;
use super::error::AppError;

/// JWT Claims 구조체
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Access level
    pub access: Role,
    /// Issued At
    pub iat: usize,
    /// Expiration
    pub exp: usize,
}

/// JWT 토큰 생성 (Access Token)
///
/// 토큰 발급 플로우(로그인)는 이 서버 밖에 있으며, 같은 비밀키를 공유하는
/// 발급자와 테스트가 이 함수를 사용합니다.
pub fn encode_token(
    email: String,
    access: Role,
    secret: &str,
    expiration_seconds: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(expiration_seconds))
        .ok_or_else(|| AppError::internal("Token creation failed", "expiration overflow"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: email,
        access,
        iat: now.timestamp() as usize,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal("Token creation failed", e))
}

/// JWT 토큰 검증
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token has expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_and_decode() {
        let secret = "test_secret";
        let email = "a@x.com".to_string();

        let token =
            encode_token(email.clone(), Role::Admin, secret, 3600).expect("Token generation failed");
        let claims = decode_token(&token, secret).expect("Token validation failed");

        assert_eq!(claims.sub, email);
        assert_eq!(claims.access, Role::Admin);
    }

    #[test]
    fn test_invalid_token() {
        let result = decode_token("invalid_token", "test_secret");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = encode_token("a@x.com".into(), Role::User, "secret-a", 3600).unwrap();
        let result = decode_token(&token, "secret-b");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        // 기본 leeway(60초)보다 충분히 과거로 만료
        let token = encode_token("a@x.com".into(), Role::User, "secret", -3600).unwrap();
        let result = decode_token(&token, "secret");

        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("unexpected result: {:?}", other.map(|c| c.sub)),
        }
    }
}
