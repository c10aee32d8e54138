//! JWT 인증 토큰 클레임
//!
//! 서명된 토큰의 페이로드 구조를 정의합니다.
use serde::{Deserialize, Serialize};
use crate::domain::entities::users::UserId;

/// JWT 토큰의 클레임(Payload) 구조체
///
/// 개인정보 보호를 위해 최소한의 정보만 포함합니다.
///
/// ## 클레임 구성
///
/// - `userId`: 사용자 ID
/// - `username`: 발급 시점의 사용자 이름
/// - `iat`: 토큰 발급 시간 (Unix timestamp)
/// - `iss`: 발급자 (기본값 `watcharr`)
/// - `exp`: 토큰 만료 시간 (만료가 설정된 경우에만)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// 사용자 이름
    pub username: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 발급자
    pub iss: String,
    /// 토큰 만료 시간 (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
