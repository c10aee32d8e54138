//! Watcharr 인증 서비스
//!
//! 로컬 계정과 Jellyfin 위임 로그인을 지원하는 Rust 기반 인증 서비스입니다.
//! 패스워드는 Argon2id로 해싱되고, 로그인에 성공하면 HS256으로 서명된
//! JWT 토큰이 발급됩니다.
//!
//! # Features
//!
//! - **로컬 인증**: 사용자명/패스워드 회원가입 및 로그인
//! - **Jellyfin**: 외부 서버에 자격 증명을 위임하고, 첫 로그인 시 계정 자동 생성
//! - **JWT 인증**: 저장소 조회 없이 검증 가능한 상태 없는 토큰
//! - **사용자 저장소**: MongoDB 또는 메모리 저장소
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증 및 응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← PasswordHasher, TokenService, AuthenticationService
//! └─────────────────┘
//!      │        │
//!      ▼        ▼
//! ┌─────────┐ ┌──────────┐
//! │UserStore│ │ Jellyfin │
//! └─────────┘ └──────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use watcharr_auth::config::Environment;
//! use watcharr_auth::core::registry::ServiceRegistry;
//!
//! let registry = ServiceRegistry::initialize(&Environment::current()).await?;
//! let response = registry.auth_service().register("bob", "correcthorse").await?;
//! let claims = registry.token_service().verify(&response.token)?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
