use serde::{Deserialize, Serialize};

/// 인증 성공 응답
///
/// 로그인과 회원가입 모두 서명된 토큰 하나만 돌려줍니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

impl AuthResponse {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}
