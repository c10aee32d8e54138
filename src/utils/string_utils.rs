//! 문자열 처리 유틸리티 함수 모듈
//!
//! 요청 검증과 설정 로딩에서 공통으로 쓰이는 문자열 헬퍼입니다.

/// 문자열이 유효한지 검사합니다 (빈 문자열이나 공백만 있는지 확인).
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::is_valid_string;
///
/// assert_eq!(is_valid_string("Hello"), true);
/// assert_eq!(is_valid_string("   "), false);
/// assert_eq!(is_valid_string(""), false);
/// ```
pub fn is_valid_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 외부 서버 주소를 정규화합니다.
///
/// 앞뒤 공백과 끝의 `/`를 모두 제거해 경로를 바로 이어 붙일 수 있게 만듭니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(normalize_base_url(" http://jf.local:8096/ "), "http://jf.local:8096");
/// ```
pub fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
