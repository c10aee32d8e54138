//! Users Entity Module
//!
//! 로컬 계정과 위임(Jellyfin) 계정을 하나로 통합한 User 엔티티를 포함합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! // 로컬 사용자 생성
//! let user = User::new_local("bob".to_string(), encoded_hash);
//!
//! // Jellyfin 사용자 생성 (패스워드 없음)
//! let delegated = User::new_delegated(AuthProvider::Jellyfin, "e5a1...".to_string(), "Bob".to_string());
//! ```

pub mod user;

pub use user::{User, UserId};
