//! # 인증 요청 DTO 모듈
//!
//! 로컬 로그인, Jellyfin 로그인, 회원가입은 모두 같은 본문 형태를 사용합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use actix_web::{web, HttpResponse};
//! use validator::Validate;
//! use crate::domain::dto::users::request::AuthRequest;
//!
//! async fn login(payload: web::Json<AuthRequest>) -> Result<HttpResponse, AppError> {
//!     payload.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
//!     // ...
//! }
//! ```
//!
//! 검증 실패는 핸들러에서 HTTP 400 Bad Request로 변환됩니다.

pub mod auth_request;

pub use auth_request::AuthRequest;
