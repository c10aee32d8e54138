//! # Service Registry
//!
//! 시작 시점에 모든 서비스를 한 번씩 생성하고 Actix 앱 데이터로 등록하는 컨테이너입니다.
//! 전역 상태 없이 생성자 주입으로만 조립되며, 테스트에서는 원하는 부품을
//! [`ServiceRegistry::from_parts`]로 직접 조립할 수 있습니다.
//!
//! ## 초기화 순서
//!
//! ```text
//! 1. 설정 로드
//!    ├─ JwtConfig       (JWT_SECRET, JWT_ISSUER, JWT_EXPIRATION_HOURS)
//!    ├─ PasswordConfig  (ARGON2_*)
//!    ├─ JellyfinConfig  (JELLYFIN_HOST, 없으면 위임 로그인 비활성화)
//!    └─ StoreConfig     (USER_STORE, MONGODB_URI, DATABASE_NAME)
//!
//! 2. 저장소 준비
//!    ├─ MongoDB: 연결 → ping → 인덱스 생성
//!    └─ Memory: 빈 저장소
//!
//! 3. 서비스 조립
//!    ├─ TokenService (미들웨어와 인증 서비스가 같은 인스턴스를 공유)
//!    └─ AuthenticationService
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let registry = ServiceRegistry::initialize(&Environment::current()).await?;
//!
//! HttpServer::new(move || {
//!     let registry = registry.clone();
//!     App::new()
//!         .configure(|cfg| registry.configure(cfg))
//!         .configure(configure_all_routes)
//! })
//! ```

use std::sync::Arc;
use actix_web::web;
use log::{info, warn};
use crate::config::{Environment, JellyfinConfig, JwtConfig, PasswordConfig, StoreBackend, StoreConfig};
use crate::db::Database;
use crate::errors::AppError;
use crate::repositories::users::{MemoryUserRepository, UserRepository, UserStore};
use crate::services::auth::{
    AuthenticationService, DelegatedAuthClient, JellyfinAuthClient, PasswordHasher, TokenService,
};

/// 애플리케이션 서비스 컨테이너
///
/// 내부 값은 모두 `Arc` 기반이라 워커마다 복제해도 같은 인스턴스를 공유합니다.
#[derive(Clone)]
pub struct ServiceRegistry {
    tokens: web::Data<TokenService>,
    auth: web::Data<AuthenticationService>,
}

impl ServiceRegistry {
    /// 환경 변수로부터 전체 서비스 그래프를 구성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 프로덕션에서 `JWT_SECRET`이 없거나 설정 값이 잘못된 경우
    /// * `AppError::DatabaseError` - MongoDB 연결 또는 인덱스 생성 실패
    pub async fn initialize(environment: &Environment) -> Result<Self, AppError> {
        let jwt_config = JwtConfig::from_env(environment)?;
        let hasher = PasswordHasher::new(PasswordConfig::argon2_params());
        let jellyfin_config = JellyfinConfig::from_env();
        let store_config = StoreConfig::from_env();

        let users = Self::open_store(&store_config).await?;

        match &jellyfin_config {
            Some(config) => info!("🔗 Jellyfin 로그인 활성화: {}", config.host),
            None => info!("Jellyfin 로그인 비활성화 (JELLYFIN_HOST 없음)"),
        }

        Self::from_parts(users, hasher, jwt_config, jellyfin_config.as_ref())
    }

    /// 이미 준비된 부품으로 컨테이너를 조립합니다.
    ///
    /// `jellyfin`이 `None`이면 위임 로그인은 `ProviderDisabled`로 거절됩니다.
    pub fn from_parts(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        jwt_config: JwtConfig,
        jellyfin: Option<&JellyfinConfig>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::new(jwt_config));

        let delegated = match jellyfin {
            Some(config) => {
                let client: Arc<dyn DelegatedAuthClient> = Arc::new(JellyfinAuthClient::new(config)?);
                Some(client)
            }
            None => None,
        };

        let auth = AuthenticationService::new(users, hasher, Arc::clone(&tokens), delegated);

        Ok(Self {
            tokens: web::Data::from(tokens),
            auth: web::Data::new(auth),
        })
    }

    async fn open_store(config: &StoreConfig) -> Result<Arc<dyn UserStore>, AppError> {
        match config.backend {
            StoreBackend::MongoDb => {
                info!("📡 데이터베이스 연결 중...");
                let database = Database::connect(config).await?;
                let repository = UserRepository::new(&database);
                repository.create_indexes().await?;
                Ok(Arc::new(repository))
            }
            StoreBackend::Memory => {
                warn!("⚠️ 메모리 사용자 저장소 사용 중: 재시작하면 모든 계정이 사라집니다");
                Ok(Arc::new(MemoryUserRepository::new()))
            }
        }
    }

    /// 서비스들을 앱 데이터로 등록합니다.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tokens.clone())
            .app_data(self.auth.clone());
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    pub fn auth_service(&self) -> &AuthenticationService {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use crate::services::auth::Argon2Params;
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(Argon2Params {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            key_length: 32,
        })
    }

    #[test]
    fn test_without_jellyfin_no_providers_are_available() {
        let registry = ServiceRegistry::from_parts(
            Arc::new(MemoryUserRepository::new()),
            cheap_hasher(),
            JwtConfig::new("registry-secret"),
            None,
        )
        .unwrap();

        assert!(registry.auth_service().available_providers().is_empty());
    }

    #[test]
    fn test_with_jellyfin_provider_is_listed() {
        let jellyfin = JellyfinConfig::new("http://jf.local:8096/", Duration::from_secs(3));
        let registry = ServiceRegistry::from_parts(
            Arc::new(MemoryUserRepository::new()),
            cheap_hasher(),
            JwtConfig::new("registry-secret"),
            Some(&jellyfin),
        )
        .unwrap();

        assert_eq!(registry.auth_service().available_providers(), vec!["jellyfin"]);
    }

    #[actix_web::test]
    async fn test_token_service_is_shared_with_authentication() {
        let registry = ServiceRegistry::from_parts(
            Arc::new(MemoryUserRepository::new()),
            cheap_hasher(),
            JwtConfig::new("registry-secret"),
            None,
        )
        .unwrap();

        let response = registry.auth_service().register("bob", "pw").await.unwrap();
        let claims = registry.token_service().verify(&response.token).unwrap();

        assert_eq!(claims.username, "bob");
    }
}
