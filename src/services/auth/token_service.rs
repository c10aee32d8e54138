//! JWT 토큰 관리 서비스 구현
//!
//! HMAC-SHA256으로 서명된 JSON Web Token의 발급과 검증을 담당합니다.
//! 서명 키는 생성 시점에 한 번 주입된 [`JwtConfig`]에서만 가져옵니다.

use std::collections::HashSet;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use crate::config::JwtConfig;
use crate::domain::entities::users::UserId;
use crate::domain::models::token::TokenClaims;

/// 토큰 발급/검증 에러
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token provided")]
    Missing,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token issuer is not accepted")]
    InvalidIssuer,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT 토큰 관리 서비스
///
/// 검증은 순수 함수이며 저장소를 조회하지 않습니다.
/// 토큰을 폐기하는 유일한 방법은 서명 비밀키를 교체하는 것입니다.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    expiration_hours: Option<i64>,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp는 설정된 경우에만 존재하므로 필수 클레임에서 제외
        validation.required_spec_claims = HashSet::new();
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            expiration_hours: config.expiration_hours,
        }
    }

    /// 사용자를 위한 서명된 토큰 발급
    ///
    /// # Arguments
    ///
    /// * `user_id` - 저장소가 할당한 사용자 ID
    /// * `username` - 토큰에 포함될 사용자 이름
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let token = token_service.issue(1, "bob")?;
    /// ```
    pub fn issue(&self, user_id: UserId, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();

        let claims = TokenClaims {
            user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            exp: self.expiration_hours
                .map(|hours| (now + Duration::hours(hours)).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// 토큰 서명과 클레임을 검증합니다.
    ///
    /// # Errors
    ///
    /// * `TokenError::Missing` - 빈 토큰
    /// * `TokenError::BadSignature` - 다른 키로 서명되었거나 변조된 토큰
    /// * `TokenError::Expired` - `exp`가 지난 토큰
    /// * `TokenError::InvalidIssuer` - 발급자가 다른 토큰
    /// * `TokenError::Malformed` - 그 외 해석할 수 없는 토큰
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let claims = token_service.verify(token)?;
    /// println!("User ID: {}", claims.user_id);
    /// ```
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                _ => TokenError::Malformed,
            })
    }

    /// Authorization 헤더 값에서 토큰 부분 추출
    ///
    /// `Bearer {token}` 형식과 토큰만 있는 형식을 모두 받습니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let token = TokenService::extract_token("Bearer eyJhbGciOiJIUzI1NiIs...")?;
    /// let same = TokenService::extract_token("eyJhbGciOiJIUzI1NiIs...")?;
    /// ```
    pub fn extract_token(auth_header: &str) -> Result<&str, TokenError> {
        let value = auth_header.trim();

        let token = match value.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            Some(_) => return Err(TokenError::Malformed),
            None => value,
        };

        if token.is_empty() || token.eq_ignore_ascii_case("bearer") {
            return Err(TokenError::Missing);
        }
        Ok(token)
    }
}
