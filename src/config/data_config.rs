//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, 요청 속도 제한, 사용자 저장소 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 프로덕션 환경 여부
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// 환경 변수에서 서버 설정을 읽어옵니다.
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: 바인딩 주소 (기본값: "127.0.0.1")
    /// - `PORT`: 포트 번호 (기본값: 8080)
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self { host, port }
    }

    /// `host:port` 형태의 바인딩 주소
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 사용자 저장소 백엔드 종류
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// MongoDB 컬렉션 (운영 기본값)
    MongoDb,
    /// 프로세스 메모리 (개발/테스트용, 재시작 시 데이터 소실)
    Memory,
}

/// 사용자 저장소 설정
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub mongodb_uri: String,
    pub database_name: String,
}

impl StoreConfig {
    /// 환경 변수에서 저장소 설정을 읽어옵니다.
    ///
    /// # Environment Variables
    ///
    /// - `USER_STORE`: `mongodb` (기본값) 또는 `memory`
    /// - `MONGODB_URI`: MongoDB 연결 URI (기본값: "mongodb://localhost:27017")
    /// - `DATABASE_NAME`: 데이터베이스 이름 (기본값: "watcharr_auth")
    pub fn from_env() -> Self {
        let backend = match env::var("USER_STORE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "memory" | "in-memory" => StoreBackend::Memory,
            _ => StoreBackend::MongoDb,
        };

        Self {
            backend,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "watcharr_auth".to_string()),
        }
    }
}

/// 요청 속도 제한 설정
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub const DEFAULT_PER_SECOND: u64 = 100;
    pub const DEFAULT_BURST_SIZE: u32 = 200;

    /// 환경 변수에서 Rate Limiting 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
    /// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
    ///
    /// 해석할 수 없거나 0인 값은 기본값으로 대체됩니다.
    pub fn from_env() -> Self {
        let per_second = parse_positive("RATE_LIMIT_PER_SECOND", Self::DEFAULT_PER_SECOND);
        let burst_size = parse_positive("RATE_LIMIT_BURST_SIZE", Self::DEFAULT_BURST_SIZE as u64);

        Self {
            per_second,
            burst_size: u32::try_from(burst_size).unwrap_or(Self::DEFAULT_BURST_SIZE),
        }
    }
}

fn parse_positive(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => {
                log::error!("{} 파싱 실패: {:?}. 기본값 {} 사용", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("DEV"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(!Environment::Development.is_production());
    }

    #[test]
    fn test_rate_limit_defaults_are_nonzero() {
        assert!(RateLimitConfig::DEFAULT_PER_SECOND > 0);
        assert!(RateLimitConfig::DEFAULT_BURST_SIZE >= RateLimitConfig::DEFAULT_PER_SECOND as u32);
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig { host: "0.0.0.0".to_string(), port: 9000 };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}
