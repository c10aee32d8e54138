//! # Domain Layer Module
//!
//! 인증 서브시스템의 도메인 계층입니다.
//! 영속 엔티티, 외부 시스템 통합 모델, HTTP 계약(DTO)을 분리해서 정의합니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - 저장소에 기록되는 User
//! ├── DTOs      - 요청/응답 본문 (AuthRequest, AuthResponse)
//! └── Models    - 토큰 클레임, 인증된 주체, Jellyfin 와이어 타입
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB)
//! ```
//!
//! ## 경계 규칙
//!
//! - `User` 엔티티는 HTTP 응답으로 직렬화되지 않습니다. 해시가 포함되어 있기 때문입니다.
//! - 프로세스 밖으로 나가는 것은 토큰 문자열, `TokenClaims`, `AuthenticatedUser`뿐입니다.
//! - 외부 API 필드명(`Username`, `Pw`, `User.Id`)은 `models::jellyfin`에만 존재합니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::users::{User, UserId};
pub use dto::users::{AuthRequest, AuthResponse};
pub use models::auth::{AuthenticatedUser, DelegatedIdentity};
pub use models::token::TokenClaims;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_exports_are_the_nested_types() {
        let user: entities::users::User = User::new_local("bob".to_string(), "hash".to_string());
        let id: UserId = user.id.unwrap_or_default();
        assert_eq!(id, 0);

        let response: dto::users::response::AuthResponse = AuthResponse { token: "t".to_string() };
        assert_eq!(response.token, "t");
    }
}
