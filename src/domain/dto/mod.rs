//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 데이터를 전송하기 위한 객체들을 정의하는 모듈입니다.
//! 클라이언트와 서버 간의 데이터 계약(Contract)을 명확히 정의합니다.
//!
//! ## 설계 원칙
//!
//! - **명시적 인터페이스**: 요청은 `{username, password}`, 응답은 `{token}` 하나뿐입니다
//! - **런타임 검증**: `validator` crate로 비어 있는 입력을 400으로 거절합니다
//! - **민감 정보 보호**: 요청 DTO의 `Debug` 출력에는 비밀번호가 나타나지 않습니다
//!
//! ## 모듈 구조
//!
//! ```text
//! dto/
//! └── users/
//!     ├── request/    # AuthRequest (로그인/회원가입 공용)
//!     └── response/   # AuthResponse
//! ```

pub mod users;

pub use users::*;
