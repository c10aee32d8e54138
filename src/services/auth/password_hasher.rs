//! Argon2id 패스워드 해싱 서비스
//!
//! 패스워드를 자기 기술적(self-describing) 문자열로 인코딩합니다.
//! 인코딩 문자열 안에 알고리즘, 버전, 파라미터, 솔트가 모두 들어 있으므로
//! 파라미터를 바꾼 뒤에도 예전에 저장된 해시를 그대로 검증할 수 있습니다.
//!
//! ## 인코딩 형식
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=2$<base64 salt>$<base64 key>
//! ```
//!
//! base64는 패딩 없는 표준 알파벳을 사용합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let hasher = PasswordHasher::default();
//! let encoded = hasher.hash("hunter2")?;
//! assert!(hasher.verify("hunter2", &encoded)?);
//! ```
//!
//! 해싱은 CPU와 메모리를 많이 쓰는 블로킹 작업입니다.
//! 비동기 컨텍스트에서는 `web::block`으로 감싸서 호출합니다.

use std::fmt::Display;
use std::ops::RangeInclusive;
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use thiserror::Error;

const ALGORITHM_ID: &str = "argon2id";
const ARGON2_VERSION: u32 = 0x13;

/// 허용되는 메모리 비용 범위 (KiB, 최대 4 GiB)
pub const MEMORY_KIB_RANGE: RangeInclusive<u32> = 8..=4 * 1024 * 1024;
/// 허용되는 반복 횟수 범위
pub const ITERATIONS_RANGE: RangeInclusive<u32> = 1..=64;
/// 허용되는 병렬도 범위
pub const PARALLELISM_RANGE: RangeInclusive<u32> = 1..=64;
/// 허용되는 솔트 길이 범위 (bytes)
pub const SALT_LENGTH_RANGE: RangeInclusive<usize> = 8..=64;
/// 허용되는 키 길이 범위 (bytes)
pub const KEY_LENGTH_RANGE: RangeInclusive<usize> = 16..=64;

/// Argon2id 비용 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도 (lane 수)
    pub parallelism: u32,
    /// 솔트 길이 (bytes)
    pub salt_length: usize,
    /// 파생 키 길이 (bytes)
    pub key_length: usize,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 2,
            salt_length: 16,
            key_length: 32,
        }
    }
}

/// 패스워드 해싱/검증 에러
///
/// 디코딩 관련 에러는 모두 "검증 실패"로 닫힙니다. 형식이 이상한 해시가 성공으로 처리되는 경우는 없습니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("encoded hash does not have the expected number of fields")]
    MalformedHash,

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("incompatible argon2 version: {0}")]
    VersionMismatch(u32),

    #[error("failed to decode hash: {0}")]
    DecodeFailure(String),

    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("random source failure: {0}")]
    Io(String),
}

/// 인코딩 문자열에서 복원한 해시 구성 요소
struct DecodedHash {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

/// Argon2id 패스워드 해셔
///
/// 상태가 없고 `Clone`이 가벼우므로 블로킹 스레드로 복제해서 넘길 수 있습니다.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    params: Argon2Params,
}

impl PasswordHasher {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    /// 설정된 파라미터로 패스워드를 해싱합니다.
    pub fn hash(&self, secret: &str) -> Result<String, PasswordHashError> {
        self.hash_with(secret, &self.params)
    }

    /// 지정한 파라미터로 패스워드를 해싱합니다.
    ///
    /// 매 호출마다 OS 난수원에서 새 솔트를 생성하므로
    /// 같은 패스워드라도 결과 문자열은 매번 다릅니다.
    ///
    /// # Errors
    ///
    /// * `PasswordHashError::Io` - 난수원에서 솔트를 읽지 못한 경우
    /// * `PasswordHashError::InvalidParams` - argon2가 파라미터를 거부한 경우
    pub fn hash_with(&self, secret: &str, params: &Argon2Params) -> Result<String, PasswordHashError> {
        let mut salt = vec![0u8; params.salt_length];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordHashError::Io(e.to_string()))?;

        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            Some(params.key_length),
        )
        .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;

        let mut key = vec![0u8; params.key_length];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
            .hash_password_into(secret.as_bytes(), &salt, &mut key)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;

        Ok(format!(
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM_ID,
            ARGON2_VERSION,
            params.memory_kib,
            params.iterations,
            params.parallelism,
            STANDARD_NO_PAD.encode(&salt),
            STANDARD_NO_PAD.encode(&key),
        ))
    }

    /// 패스워드가 인코딩된 해시와 일치하는지 확인합니다.
    ///
    /// 해시에 기록된 파라미터와 솔트로 키를 다시 파생한 뒤 상수 시간 비교를 수행합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 일치
    /// * `Ok(false)` - 불일치
    /// * `Err(_)` - 해시 문자열을 해석할 수 없음
    pub fn verify(&self, secret: &str, encoded: &str) -> Result<bool, PasswordHashError> {
        let decoded = decode_hash(encoded)?;

        let argon2_params = Params::new(
            decoded.memory_kib,
            decoded.iterations,
            decoded.parallelism,
            Some(decoded.key.len()),
        )
        .map_err(|e| PasswordHashError::DecodeFailure(e.to_string()))?;

        let mut computed = vec![0u8; decoded.key.len()];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
            .hash_password_into(secret.as_bytes(), &decoded.salt, &mut computed)
            .map_err(|e| PasswordHashError::DecodeFailure(e.to_string()))?;

        Ok(computed.ct_eq(&decoded.key).into())
    }
}

fn decode_hash(encoded: &str) -> Result<DecodedHash, PasswordHashError> {
    let fields: Vec<&str> = encoded.split('$').collect();
    if fields.len() != 6 || !fields[0].is_empty() {
        return Err(PasswordHashError::MalformedHash);
    }

    if fields[1] != ALGORITHM_ID {
        return Err(PasswordHashError::UnsupportedAlgorithm(fields[1].to_string()));
    }

    let version = fields[2]
        .strip_prefix("v=")
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| PasswordHashError::DecodeFailure(format!("bad version field '{}'", fields[2])))?;
    if version != ARGON2_VERSION {
        return Err(PasswordHashError::VersionMismatch(version));
    }

    let (memory_kib, iterations, parallelism) = parse_cost_params(fields[3])?;

    let salt = STANDARD_NO_PAD
        .decode(fields[4])
        .map_err(|e| PasswordHashError::DecodeFailure(format!("salt: {}", e)))?;
    let key = STANDARD_NO_PAD
        .decode(fields[5])
        .map_err(|e| PasswordHashError::DecodeFailure(format!("key: {}", e)))?;

    // 디코딩된 비용은 설정에서 허용하는 범위를 넘을 수 없음
    ensure_in_range("m", memory_kib, &MEMORY_KIB_RANGE)?;
    ensure_in_range("t", iterations, &ITERATIONS_RANGE)?;
    ensure_in_range("p", parallelism, &PARALLELISM_RANGE)?;
    ensure_in_range("salt length", salt.len(), &SALT_LENGTH_RANGE)?;
    ensure_in_range("key length", key.len(), &KEY_LENGTH_RANGE)?;

    Ok(DecodedHash { memory_kib, iterations, parallelism, salt, key })
}

fn ensure_in_range<T>(name: &str, value: T, range: &RangeInclusive<T>) -> Result<(), PasswordHashError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PasswordHashError::DecodeFailure(format!(
            "{} {} outside {}..={}",
            name, value, range.start(), range.end()
        )))
    }
}

// "m=<m>,t=<t>,p=<p>" 순서 고정
fn parse_cost_params(field: &str) -> Result<(u32, u32, u32), PasswordHashError> {
    let bad = || PasswordHashError::DecodeFailure(format!("bad parameter field '{}'", field));

    let parts: Vec<&str> = field.split(',').collect();
    if parts.len() != 3 {
        return Err(bad());
    }

    let read = |part: &str, prefix: &str| {
        part.strip_prefix(prefix)
            .and_then(|value| value.parse::<u32>().ok())
            .ok_or_else(bad)
    };

    Ok((read(parts[0], "m=")?, read(parts[1], "t=")?, read(parts[2], "p=")?))
}
