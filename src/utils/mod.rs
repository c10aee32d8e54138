//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 문자열 검증과 정규화 유틸리티

pub mod string_utils;
