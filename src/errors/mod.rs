//! 에러 타입 모듈
//!
//! HTTP 경계에서 사용하는 [`AppError`](errors::AppError)를 제공합니다.

pub mod errors;

pub use errors::{AppError, AppResult, ErrorContext};
