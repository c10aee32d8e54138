//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증과 Jellyfin 위임 인증을 모두 표현하는 단일 사용자 모델을 제공합니다.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;

/// 저장소가 발급하는 사용자 식별자 (1부터 단조 증가, 재사용 없음)
pub type UserId = i64;

/// 사용자 엔티티
///
/// 불변 조건:
/// - `(username, provider)` 조합은 저장소 전체에서 유일합니다.
/// - 로컬 사용자는 항상 비어 있지 않은 `password_hash`를 가집니다.
/// - 위임 사용자는 항상 비어 있지 않은 `third_party_id`를 가지며 해시가 없습니다.
/// - `id`는 저장 시 한 번 할당된 뒤 바뀌지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// 사용자 이름 (위임 사용자는 프로바이더가 알려준 이름을 캐시)
    pub username: String,
    /// 인코딩된 Argon2id 해시 (위임 사용자의 경우 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 인증 프로바이더 (필드가 없으면 Local)
    #[serde(default)]
    pub provider: AuthProvider,
    /// 외부 프로바이더의 사용자 ID (로컬 사용자의 경우 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_id: Option<String>,
    /// 생성 시간
    pub created_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (사용자명/패스워드)
    pub fn new_local(username: String, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            password_hash: Some(password_hash),
            provider: AuthProvider::Local,
            third_party_id: None,
            created_at: DateTime::now(),
        }
    }

    /// 새 위임 인증 사용자 생성
    ///
    /// 패스워드는 저장하지 않습니다. 인증은 항상 외부 프로바이더에 위임됩니다.
    pub fn new_delegated(provider: AuthProvider, third_party_id: String, username: String) -> Self {
        Self {
            id: None,
            username,
            password_hash: None,
            provider,
            third_party_id: Some(third_party_id),
            created_at: DateTime::now(),
        }
    }

    /// 로컬 인증 사용자인지 확인
    pub fn is_local_auth(&self) -> bool {
        matches!(self.provider, AuthProvider::Local)
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.is_local_auth()
            && self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}
