//! 인증 요청 DTO
//!
//! 인증을 요청하는 사용자의 자격 증명을 매핑합니다.
use std::fmt;
use serde::Deserialize;
use validator::{Validate, ValidationError};
use crate::utils::string_utils::is_valid_string;

/// 로그인/회원가입 요청 구조체
///
/// 사용자명은 앞뒤 공백을 포함해 그대로 저장/조회됩니다.
#[derive(Deserialize, Validate)]
pub struct AuthRequest {
    #[validate(
        length(min = 1, message = "사용자명을 입력해주세요"),
        custom(function = "validate_not_blank")
    )]
    pub username: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if !is_valid_string(value) {
        let mut error = ValidationError::new("blank");
        error.message = Some("공백만으로 구성될 수 없습니다".into());
        return Err(error);
    }
    Ok(())
}
