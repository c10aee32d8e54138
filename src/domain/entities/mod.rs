//! # Entities Module
//!
//! 저장소에 영속되는 도메인 엔티티를 정의합니다.
//!
//! ## MongoDB 문서 형태
//!
//! ```text
//! {
//!   "_id": 1,                       // 카운터로 발급되는 정수 ID
//!   "username": "bob",
//!   "password_hash": "$argon2id$v=19$...",   // 로컬 사용자만
//!   "provider": 0,                  // 0 = local, 1 = jellyfin
//!   "third_party_id": "abc",        // 위임 사용자만
//!   "created_at": ISODate(...)
//! }
//! ```
//!
//! 스키마 진화는 `#[serde(default)]`와 `Option<T>`로 처리합니다.
//! `provider` 필드가 없는 오래된 문서는 로컬 사용자로 읽힙니다.

pub mod users;
