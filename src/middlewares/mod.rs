//! 요청 파이프라인 미들웨어
//!
//! 보호된 스코프에 `.wrap(AuthMiddleware::new())`으로 적용합니다.
//! 토큰 검증에 성공하면 요청 extensions에 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)가
//! 들어가고, 실패하면 핸들러가 실행되기 전에 401로 응답합니다.

pub mod auth_middleware;
mod auth_inner;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
