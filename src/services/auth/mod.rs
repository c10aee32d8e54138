//! 인증 및 보안 서비스 모듈
//!
//! 패스워드 해싱, 토큰 서명, 외부 프로바이더 위임 인증과
//! 이들을 조율하는 인증 서비스를 제공합니다.
//!
//! # Security
//!
//! - Argon2id (v=19) 패스워드 해시와 상수 시간 비교
//! - HMAC-SHA256 토큰 서명, 비밀키는 시작 시 한 번만 로드
//! - 외부 호출 타임아웃
//! - "사용자 없음"과 "패스워드 불일치"는 호출자에게 구분되지 않음
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::AuthenticationService;
//!
//! let response = auth_service.login_local("bob", "correcthorse").await?;
//! let claims = token_service.verify(&response.token)?;
//! ```

pub mod password_hasher;
pub mod token_service;
pub mod jellyfin_auth_client;
pub mod authentication_service;

pub use password_hasher::{Argon2Params, PasswordHashError, PasswordHasher};
pub use token_service::{TokenError, TokenService};
pub use jellyfin_auth_client::{DelegatedAuthClient, DelegatedAuthError, JellyfinAuthClient};
pub use authentication_service::{AuthError, AuthenticationService};
