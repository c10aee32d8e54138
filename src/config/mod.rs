//! # Configuration Module
//!
//! 인증 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값을 시작 시점에 한 번 읽어 불변 구조체로 제공합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 사용자 저장소 설정
//! - [`auth_config`] - JWT, Argon2id, Jellyfin 위임 인증 설정
//!
//! ## 설계 원칙
//!
//! - 민감한 정보(서명 비밀키)는 환경 변수로만 제공되며 로그에 남기지 않습니다
//! - 프로덕션에서 필수 설정이 누락되면 시작 단계에서 실패합니다
//! - 서비스는 전역 상태 대신 생성자로 설정을 주입받습니다
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{Environment, JwtConfig, JellyfinConfig};
//!
//! let env = Environment::current();
//! let jwt = JwtConfig::from_env(&env)?;
//! let jellyfin = JellyfinConfig::from_env(); // None이면 위임 로그인 비활성화
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
