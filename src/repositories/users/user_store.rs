//! # 사용자 저장소 추상화
//!
//! 인증 서비스가 의존하는 영속 계층의 최소 인터페이스입니다.
//!
//! ## 계약
//!
//! - `create`는 `id`가 비어 있는 사용자를 받아 새 ID를 할당한 사용자를 돌려줍니다.
//! - `(username, provider)` 또는 `third_party_id` 중복은 반드시 [`StoreError::Conflict`]로 보고합니다.
//!   중복 검사와 삽입은 원자적이어야 하며, 동시에 들어온 두 요청 중 하나만 성공합니다.
//! - 조회 결과가 없는 것은 에러가 아니라 `Ok(None)`입니다.

use async_trait::async_trait;
use thiserror::Error;
use crate::config::AuthProvider;
use crate::domain::entities::users::{User, UserId};

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StoreError {
    /// 유일성 제약 위반
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// 그 외 저장소 장애 (연결, 직렬화 등)
    #[error("user store failure: {0}")]
    Backend(String),
}

/// 사용자 신원 저장소
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자명과 프로바이더로 조회합니다.
    ///
    /// `Local` 조회는 프로바이더 필드가 없는 오래된 레코드도 포함합니다.
    async fn find_by_username_and_provider(
        &self,
        username: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError>;

    /// 외부 프로바이더 사용자 ID로 조회합니다.
    async fn find_by_third_party_id(&self, third_party_id: &str) -> Result<Option<User>, StoreError>;

    /// 사용자 ID로 조회합니다.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// 새 사용자를 저장하고 ID가 할당된 사용자를 반환합니다.
    async fn create(&self, user: User) -> Result<User, StoreError>;
}
