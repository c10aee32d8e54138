//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델과 외부 시스템 통합 모델을 정의합니다.
//!
//! ## 모듈 구성
//!
//! - [`auth`] - 요청에 부착되는 인증된 주체와 위임 인증 결과
//! - [`token`] - 서명된 토큰의 클레임
//! - [`jellyfin`] - Jellyfin `AuthenticateByName` API의 요청/응답 와이어 타입
//!
//! 외부 API의 필드명은 와이어 타입 안에서만 `#[serde(rename)]`으로 다루고,
//! 서비스 계층에는 도메인 타입([`auth::DelegatedIdentity`])만 노출합니다.

pub mod auth;
pub mod token;
pub mod jellyfin;
