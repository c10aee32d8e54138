//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 생성자로 의존성을 주입받는 평범한 구조체이며,
//! `ServiceRegistry`가 시작 시점에 한 번 조립해 `web::Data`로 공유합니다.
//!
//! # Features
//!
//! - Argon2id 패스워드 해싱
//! - HS256 JWT 토큰 발급/검증
//! - 로컬 및 Jellyfin 위임 로그인, 회원가입
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthenticationService, TokenService};
//!
//! let tokens = Arc::new(TokenService::new(jwt_config));
//! let auth = AuthenticationService::new(users, PasswordHasher::default(), tokens, None);
//! ```

pub mod auth;
