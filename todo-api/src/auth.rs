//! Bearer 令牌认证
//!
//! 受保护路由在进入适配器与调度器之前完成认证：
//! `NoCredential → CredentialPresent → {Valid, Invalid}`。
//! 仅 `Valid` 放行，并把解析出的 `Subject` 写入请求扩展。
//!
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_application::{context::Subject, error::AppError};

use crate::{config::JwtConfig, state::AppState, transport::ApiError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        }
    }
}

/// 令牌校验：成功时给出调用主体
pub trait TokenVerifier: Send + Sync {
    fn validate(&self, token: &str) -> Result<Subject, TokenError>;
}

/// 认证状态
#[derive(Debug)]
pub enum CredentialState {
    NoCredential,
    CredentialPresent(String),
    Valid(Subject),
    Invalid(TokenError),
}

impl CredentialState {
    /// 从 `Authorization: Bearer <token>` 读取凭据
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return CredentialState::NoCredential;
        };

        let mut parts = header.splitn(2, ' ');
        let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
            return CredentialState::NoCredential;
        };
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return CredentialState::NoCredential;
        }

        let token = token.trim();
        if token.is_empty() {
            return CredentialState::NoCredential;
        }
        CredentialState::CredentialPresent(token.to_string())
    }

    /// 校验已出示的凭据；其余状态原样返回
    pub fn verify(self, verifier: &dyn TokenVerifier) -> Self {
        match self {
            CredentialState::CredentialPresent(token) => match verifier.validate(&token) {
                Ok(subject) => CredentialState::Valid(subject),
                Err(err) => CredentialState::Invalid(err),
            },
            other => other,
        }
    }
}

/// 受保护路由的中间件：未通过认证直接 401
pub async fn require_subject(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential =
        CredentialState::from_headers(request.headers()).verify(state.verifier.as_ref());

    match credential {
        CredentialState::Valid(subject) => {
            tracing::debug!(subject = %subject.id, "credential accepted");
            request.extensions_mut().insert(subject);
            Ok(next.run(request).await)
        }
        CredentialState::Invalid(err) => {
            tracing::warn!(error = %err, path = %request.uri().path(), "credential rejected");
            Err(AppError::Unauthorized.into())
        }
        CredentialState::NoCredential | CredentialState::CredentialPresent(_) => {
            Err(AppError::Unauthorized.into())
        }
    }
}

/// JWT 声明
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 共享密钥校验，检查签发方、受众与过期时间
#[derive(Clone)]
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// 为主体签发令牌（本地调试与测试用）
    pub fn issue(&self, subject: &Subject, ttl: Duration) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::Invalid(e.to_string()))?;
        let claims = Claims {
            sub: subject.id.clone(),
            name: subject.name.clone(),
            roles: subject.roles.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}

impl TokenVerifier for JwtVerifier {
    fn validate(&self, token: &str) -> Result<Subject, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;
        Ok(Subject {
            id: claims.sub,
            name: claims.name,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-unit-tests".into(),
            issuer: "todo-api".into(),
            audience: "todo-clients".into(),
        }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let verifier = JwtVerifier::new(&config());
        let subject = Subject::new("user-1").with_role("Administrator");

        let token = verifier.issue(&subject, Duration::from_secs(3600)).unwrap();
        let resolved = verifier.validate(&token).unwrap();

        assert_eq!(resolved, subject);
        assert!(resolved.has_role("Administrator"));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let issuer = JwtVerifier::new(&JwtConfig {
            secret: "another-secret".into(),
            ..config()
        });
        let token = issuer.issue(&Subject::new("u"), Duration::from_secs(60)).unwrap();

        let err = JwtVerifier::new(&config()).validate(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let issuer = JwtVerifier::new(&JwtConfig {
            audience: "someone-else".into(),
            ..config()
        });
        let token = issuer.issue(&Subject::new("u"), Duration::from_secs(60)).unwrap();

        assert!(JwtVerifier::new(&config()).validate(&token).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let verifier = JwtVerifier::new(&config());
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "u".into(),
            name: None,
            roles: vec![],
            iss: "todo-api".into(),
            aud: "todo-clients".into(),
            // 超出默认 60 秒容差
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(verifier.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn header_parsing_follows_states() {
        let verifier = JwtVerifier::new(&config());

        assert!(matches!(
            CredentialState::from_headers(&HeaderMap::new()),
            CredentialState::NoCredential
        ));
        assert!(matches!(
            CredentialState::from_headers(&headers("Basic abc")),
            CredentialState::NoCredential
        ));
        assert!(matches!(
            CredentialState::from_headers(&headers("Bearer   ")),
            CredentialState::NoCredential
        ));

        let present = CredentialState::from_headers(&headers("bearer not-a-jwt"));
        assert!(matches!(present, CredentialState::CredentialPresent(ref t) if t == "not-a-jwt"));
        assert!(matches!(present.verify(&verifier), CredentialState::Invalid(_)));

        let token = verifier.issue(&Subject::new("u-9"), Duration::from_secs(60)).unwrap();
        let state = CredentialState::from_headers(&headers(&format!("Bearer {token}"))).verify(&verifier);
        assert!(matches!(state, CredentialState::Valid(ref s) if s.id == "u-9"));
    }
}
