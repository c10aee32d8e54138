//! # Authentication Configuration Module
//!
//! 토큰 서명, 패스워드 해싱, 위임 인증 프로바이더(Jellyfin) 관련 설정을 관리하는 모듈입니다.
//!
//! 모든 설정은 애플리케이션 시작 시 한 번만 환경 변수에서 읽혀
//! 불변 구조체로 만들어지고, 각 서비스의 생성자로 명시적으로 전달됩니다.
//! 요청 처리 중에 환경 변수를 다시 읽는 일은 없습니다.
//!
//! ## 환경 변수
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ISSUER="watcharr"            # 선택
//! export JWT_EXPIRATION_HOURS="24"        # 선택, 미설정 시 만료 없음
//! ```
//!
//! ### Argon2id 파라미터
//! ```bash
//! export ARGON2_MEMORY_KIB="65536"
//! export ARGON2_ITERATIONS="3"
//! export ARGON2_PARALLELISM="2"
//! export ARGON2_SALT_LENGTH="16"
//! export ARGON2_KEY_LENGTH="32"
//! ```
//!
//! ### Jellyfin 위임 로그인
//! ```bash
//! export JELLYFIN_HOST="https://jellyfin.example.com"
//! export JELLYFIN_TIMEOUT_SECS="10"
//! ```

use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use crate::config::Environment;
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::services::auth::password_hasher::{
    Argon2Params, ITERATIONS_RANGE, KEY_LENGTH_RANGE, MEMORY_KIB_RANGE, PARALLELISM_RANGE, SALT_LENGTH_RANGE,
};
use crate::utils::string_utils::{is_valid_string, normalize_base_url};

/// JWT 기본 발급자
pub const DEFAULT_ISSUER: &str = "watcharr";

/// 사용자가 어느 인증 공급자에서 왔는지 나타내는 열거형
///
/// 저장소와 와이어에는 정수 태그로 기록됩니다 (`Local` = 0, `Jellyfin` = 1).
/// 새로운 프로바이더는 변형을 추가하고 태그를 하나 할당하면 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AuthProvider {
    /// 로컬 사용자명/패스워드 인증
    #[default]
    Local,
    /// Jellyfin 미디어 서버 위임 인증
    Jellyfin,
}

impl AuthProvider {
    /// 저장용 정수 태그
    pub fn tag(&self) -> u8 {
        match self {
            AuthProvider::Local => 0,
            AuthProvider::Jellyfin => 1,
        }
    }

    /// 로깅 및 `/auth/available` 응답에 쓰이는 소문자 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Jellyfin => "jellyfin",
        }
    }
}

impl From<AuthProvider> for u8 {
    fn from(provider: AuthProvider) -> Self {
        provider.tag()
    }
}

impl TryFrom<u8> for AuthProvider {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(AuthProvider::Local),
            1 => Ok(AuthProvider::Jellyfin),
            other => Err(format!("Unknown auth provider tag: {}", other)),
        }
    }
}

/// JSON Web Token 서명 설정
///
/// 서명 비밀키는 시작 시 한 번 로드된 뒤 읽기 전용으로만 사용됩니다.
/// 비밀키를 교체하면 이전에 발급된 모든 토큰이 무효화되며,
/// 이것이 이 시스템의 유일한 토큰 폐기 수단입니다.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    /// `None`이면 `exp` 클레임을 넣지 않습니다.
    pub expiration_hours: Option<i64>,
}

impl JwtConfig {
    /// 고정된 값으로 설정을 만듭니다. 테스트와 임베딩 용도입니다.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            expiration_hours: None,
        }
    }

    /// 환경 변수에서 JWT 설정을 로드합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 프로덕션에서 `JWT_SECRET`이 비어 있는 경우,
    ///   또는 `JWT_EXPIRATION_HOURS`가 양의 정수가 아닌 경우
    ///
    /// 프로덕션이 아닌 환경에서 비밀키가 없으면 프로세스 단위의 임의 키를 생성합니다.
    /// 이 경우 재시작할 때마다 기존 토큰이 모두 무효화됩니다.
    pub fn from_env(environment: &Environment) -> Result<Self, AppError> {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                return Err(AppError::ConfigError("JWT_SECRET must be set in production".to_string()));
            }
            _ => {
                log::warn!("JWT_SECRET이 설정되지 않아 임시 비밀키를 생성합니다 (재시작 시 모든 토큰 무효화)");
                generate_ephemeral_secret()?
            }
        };

        let issuer = env::var("JWT_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let expiration_hours = match env::var("JWT_EXPIRATION_HOURS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let hours = raw.trim().parse::<i64>()
                    .ok()
                    .filter(|h| *h > 0)
                    .ok_or_else(|| AppError::ConfigError(format!("JWT_EXPIRATION_HOURS 값이 올바르지 않습니다: {}", raw)))?;
                Some(hours)
            }
            _ => None,
        };

        Ok(Self { secret, issuer, expiration_hours })
    }
}

// 비밀키가 로그에 남지 않도록 Debug 출력에서 가림
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

fn generate_ephemeral_secret() -> AppResult<String> {
    let mut bytes = [0u8; 48];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .context("임시 JWT 비밀키 생성 실패")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// 패스워드 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// 환경 변수로 덮어쓴 Argon2id 파라미터를 반환합니다.
    ///
    /// 범위를 벗어나거나 파싱할 수 없는 값은 경고 후 기본값을 사용합니다.
    ///
    /// # Environment Defaults
    ///
    /// - memory: 65536 KiB (64 MiB)
    /// - iterations: 3
    /// - parallelism: 2
    /// - salt: 16 bytes, key: 32 bytes
    pub fn argon2_params() -> Argon2Params {
        let defaults = Argon2Params::default();

        Argon2Params {
            memory_kib: read_bounded("ARGON2_MEMORY_KIB", defaults.memory_kib, &MEMORY_KIB_RANGE),
            iterations: read_bounded("ARGON2_ITERATIONS", defaults.iterations, &ITERATIONS_RANGE),
            parallelism: read_bounded("ARGON2_PARALLELISM", defaults.parallelism, &PARALLELISM_RANGE),
            salt_length: read_bounded("ARGON2_SALT_LENGTH", defaults.salt_length, &SALT_LENGTH_RANGE),
            key_length: read_bounded("ARGON2_KEY_LENGTH", defaults.key_length, &KEY_LENGTH_RANGE),
        }
    }
}

fn read_bounded<T>(key: &str, default: T, range: &RangeInclusive<T>) -> T
where
    T: std::str::FromStr + PartialOrd + Copy + fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if range.contains(&value) => value,
            _ => {
                log::warn!("{} 값({})이 허용 범위 {}..={}를 벗어나 기본값 {}를 사용합니다", key, raw, range.start(), range.end(), default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Jellyfin 위임 인증 설정
///
/// `JELLYFIN_HOST`가 없으면 설정 자체가 존재하지 않으며(`None`),
/// 이는 "기능 비활성화"를 의미합니다. 요청 실패와는 구별되는 상태입니다.
#[derive(Debug, Clone)]
pub struct JellyfinConfig {
    /// 끝의 `/`가 제거된 서버 주소
    pub host: String,
    /// 외부 호출 1회당 최대 대기 시간
    pub timeout: Duration,
}

impl JellyfinConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: normalize_base_url(&host.into()),
            timeout,
        }
    }

    /// 환경 변수에서 Jellyfin 설정을 로드합니다.
    pub fn from_env() -> Option<Self> {
        let host = env::var("JELLYFIN_HOST").ok().filter(|h| is_valid_string(h))?;
        let timeout_secs = read_bounded("JELLYFIN_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS, &(1..=300));

        Some(Self::new(host, Duration::from_secs(timeout_secs)))
    }
}
