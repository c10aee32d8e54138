//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 인증 로직                           ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 사용자 저장소                    ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 요청 본문을 검증한 뒤 서비스에 위임하고,
//! 서비스 에러는 `AppError`로 변환되어 `{"error": "..."}` 형태로 응답됩니다.

pub mod auth;
