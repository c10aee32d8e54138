//! `POST /Users/AuthenticateByName` 와이어 타입
//!
//! Jellyfin API는 PascalCase 필드명을 사용합니다.
//! 응답에는 세션 토큰 등 더 많은 필드가 있지만 여기서는 사용자 식별 정보만 읽습니다.

use serde::{Deserialize, Serialize};
use crate::domain::models::auth::DelegatedIdentity;

/// 요청 본문 `{"Username": "...", "Pw": "..."}`
#[derive(Serialize)]
pub struct AuthenticateByNameRequest<'a> {
    #[serde(rename = "Username")]
    pub username: &'a str,
    #[serde(rename = "Pw")]
    pub pw: &'a str,
}

/// 응답 본문 중 `User` 객체
#[derive(Debug, Deserialize)]
pub struct AuthenticateByNameResponse {
    #[serde(rename = "User")]
    pub user: JellyfinUser,
}

#[derive(Debug, Deserialize)]
pub struct JellyfinUser {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

impl From<JellyfinUser> for DelegatedIdentity {
    fn from(user: JellyfinUser) -> Self {
        Self {
            external_user_id: user.id,
            external_display_name: user.name,
        }
    }
}
