//! # Core Module
//!
//! 애플리케이션 수명 주기 전반에 걸친 핵심 구성 요소를 제공합니다.
//!
//! ### [`registry`] - 서비스 컨테이너
//! - **ServiceRegistry**: 시작 시점에 설정을 읽어 서비스 그래프를 한 번 조립
//! - **앱 데이터 등록**: `web::Data`로 핸들러와 미들웨어에 주입
//!
//! 에러 타입은 [`crate::errors`] 모듈에 있습니다.

pub mod registry;

pub use registry::*;
