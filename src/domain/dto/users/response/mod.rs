//! 인증 응답 DTO 모듈

pub mod auth_response;

pub use auth_response::AuthResponse;
