//! # 인증 서비스
//!
//! 회원가입, 로컬 로그인, 위임(Jellyfin) 로그인의 세 가지 흐름을 조율합니다.
//! 세 흐름은 마지막 단계(토큰 발급)만 공유하고, 주체를 확인하는 방식은 완전히 다릅니다.
//!
//! ```text
//! register        : hash ─▶ store.create(Local) ─────────────────────────▶ issue
//! login_local     : store.find(username, Local) ─▶ verify ───────────────▶ issue
//! login_delegated : provider.authenticate ─▶ store.find(third_party_id)
//!                                          └─▶ (없으면) store.create ────▶ issue
//! ```
//!
//! 각 흐름은 요청 단위로 독립적이며 서비스 자체는 가변 상태를 갖지 않습니다.
//! 에러는 정밀한 [`AuthError`]로 반환되고, HTTP 경계에서 거친 결과로 합쳐집니다.

use std::sync::Arc;
use actix_web::web;
use thiserror::Error;
use crate::config::AuthProvider;
use crate::domain::dto::users::response::AuthResponse;
use crate::domain::entities::users::User;
use crate::domain::models::auth::DelegatedIdentity;
use crate::repositories::users::{StoreError, UserStore};
use crate::services::auth::jellyfin_auth_client::{DelegatedAuthClient, DelegatedAuthError};
use crate::services::auth::password_hasher::PasswordHasher;
use crate::services::auth::token_service::TokenService;

/// 인증 흐름 에러
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserAlreadyExists,

    #[error("unknown error: {0}")]
    Unknown(String),

    #[error("store did not assign an id to the new user")]
    IdNotAssigned,

    #[error("token issuance failed: {0}")]
    TokenIssuanceFailed(String),

    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("user not found")]
    UserNotFound,

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("incorrect credentials")]
    IncorrectCredentials,

    #[error("delegated login provider is not enabled")]
    ProviderDisabled,

    #[error("provider request failed: {0}")]
    RequestFailed(String),

    #[error("provider response could not be processed: {0}")]
    ResponseProcessingFailed(String),

    #[error("provider returned an empty user id")]
    ProviderReturnedEmptyId,

    #[error("user creation failed: {0}")]
    UserCreationFailed(String),
}

impl From<DelegatedAuthError> for AuthError {
    fn from(err: DelegatedAuthError) -> Self {
        match err {
            DelegatedAuthError::Rejected { .. } => AuthError::IncorrectCredentials,
            DelegatedAuthError::RequestFailed(msg) => AuthError::RequestFailed(msg),
            DelegatedAuthError::Timeout => AuthError::RequestFailed("provider timed out".to_string()),
            DelegatedAuthError::ResponseProcessing(msg) => AuthError::ResponseProcessingFailed(msg),
            DelegatedAuthError::EmptyUserId => AuthError::ProviderReturnedEmptyId,
        }
    }
}

const DUMMY_PASSWORD: &str = "watcharr-dummy-password";

/// 인증 서비스
///
/// `delegated`가 `None`이면 위임 로그인 기능이 꺼져 있는 상태입니다.
pub struct AuthenticationService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    delegated: Option<Arc<dyn DelegatedAuthClient>>,
    /// 존재하지 않는 사용자 로그인 시 검증 대상으로 쓰는 해시 (설정된 파라미터로 생성)
    dummy_hash: Option<String>,
}

impl AuthenticationService {
    /// 서비스를 생성합니다.
    ///
    /// 설정된 파라미터로 더미 해시를 한 번 만들기 때문에 해싱 1회 비용이 듭니다.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
        delegated: Option<Arc<dyn DelegatedAuthClient>>,
    ) -> Self {
        let dummy_hash = hasher
            .hash(DUMMY_PASSWORD)
            .map_err(|e| log::warn!("더미 패스워드 해시 생성 실패: {}", e))
            .ok();

        Self { users, hasher, tokens, delegated, dummy_hash }
    }

    /// 활성화된 위임 로그인 프로바이더 목록
    pub fn available_providers(&self) -> Vec<&'static str> {
        self.delegated
            .iter()
            .map(|client| client.provider().as_str())
            .collect()
    }

    /// 새 로컬 사용자를 등록하고 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::UserAlreadyExists` - 같은 사용자명의 로컬 계정이 이미 존재
    /// * `AuthError::HashingFailed` - 패스워드 해싱 실패
    /// * `AuthError::IdNotAssigned` - 저장소가 ID 없이 사용자를 돌려준 경우
    /// * `AuthError::Unknown` - 그 외 저장소 오류
    pub async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_hash = web::block(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        let user = self.users
            .create(User::new_local(username.to_string(), password_hash))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                StoreError::Backend(msg) => AuthError::Unknown(msg),
            })?;

        log::info!("로컬 사용자 등록: id={:?}", user.id);
        self.issue_for(&user)
    }

    /// 로컬 사용자명/패스워드로 로그인합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - 해당 사용자명의 로컬 계정 없음
    /// * `AuthError::IncorrectCredentials` - 패스워드 불일치
    /// * `AuthError::LoginFailed` - 저장된 해시를 해석할 수 없음
    pub async fn login_local(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let found = self.users
            .find_by_username_and_provider(username, AuthProvider::Local)
            .await
            .map_err(|e| AuthError::Unknown(e.to_string()))?;

        let Some(user) = found else {
            // 사용자가 없어도 패스워드 불일치와 같은 양의 작업을 수행
            self.verify_against_dummy(password).await;
            return Err(AuthError::UserNotFound);
        };

        let encoded = match user.password_hash.clone() {
            Some(hash) if user.can_authenticate_with_password() => hash,
            _ => return Err(AuthError::LoginFailed("stored user has no password hash".to_string())),
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let matches = web::block(move || hasher.verify(&password, &encoded))
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?
            .map_err(|e| {
                log::warn!("저장된 패스워드 해시 해석 실패: id={:?}, {}", user.id, e);
                AuthError::LoginFailed(e.to_string())
            })?;

        if !matches {
            return Err(AuthError::IncorrectCredentials);
        }

        self.issue_for(&user)
    }

    /// 위임 프로바이더로 로그인합니다.
    ///
    /// 처음 보는 외부 사용자는 로컬 레코드를 만들고, 이미 있는 사용자는 그대로 재사용합니다.
    /// 재사용 시 캐시된 사용자명은 갱신하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::ProviderDisabled` - 프로바이더가 설정되지 않음
    /// * `AuthError::IncorrectCredentials` - 프로바이더가 자격 증명을 거부
    /// * `AuthError::RequestFailed` - 전송 실패 또는 타임아웃
    /// * `AuthError::ResponseProcessingFailed` - 응답 해석 실패
    /// * `AuthError::ProviderReturnedEmptyId` - 빈 사용자 ID
    /// * `AuthError::UserCreationFailed` - 로컬 레코드 생성 실패
    pub async fn login_delegated(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let client = self.delegated.as_ref().ok_or(AuthError::ProviderDisabled)?;

        let identity = client.authenticate(username, password).await?;

        let existing = self.users
            .find_by_third_party_id(&identity.external_user_id)
            .await
            .map_err(|e| AuthError::Unknown(e.to_string()))?;

        let user = match existing {
            Some(user) => user,
            None => self.create_delegated_user(client.provider(), &identity).await?,
        };

        self.issue_for(&user)
    }

    async fn verify_against_dummy(&self, password: &str) {
        let Some(encoded) = self.dummy_hash.clone() else {
            return;
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        if let Err(e) = web::block(move || hasher.verify(&password, &encoded)).await {
            log::warn!("더미 패스워드 검증 실행 실패: {}", e);
        }
    }

    async fn create_delegated_user(
        &self,
        provider: AuthProvider,
        identity: &DelegatedIdentity,
    ) -> Result<User, AuthError> {
        let user = User::new_delegated(
            provider,
            identity.external_user_id.clone(),
            identity.external_display_name.clone(),
        );

        match self.users.create(user).await {
            Ok(created) => {
                log::info!("{} 사용자 최초 로그인, 로컬 레코드 생성: id={:?}", provider.as_str(), created.id);
                Ok(created)
            }
            // 동시 요청이 먼저 만든 경우 한 번만 다시 조회
            Err(StoreError::Conflict(msg)) => self.users
                .find_by_third_party_id(&identity.external_user_id)
                .await
                .map_err(|e| AuthError::UserCreationFailed(e.to_string()))?
                .ok_or(AuthError::UserCreationFailed(msg)),
            Err(StoreError::Backend(msg)) => Err(AuthError::UserCreationFailed(msg)),
        }
    }

    fn issue_for(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let user_id = user.id.ok_or(AuthError::IdNotAssigned)?;

        self.tokens
            .issue(user_id, &user.username)
            .map(AuthResponse::new)
            .map_err(|e| AuthError::TokenIssuanceFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use super::*;
    use crate::config::JwtConfig;
    use crate::domain::entities::users::UserId;
    use crate::repositories::users::MemoryUserRepository;
    use crate::services::auth::password_hasher::Argon2Params;

    /// 고정된 결과를 돌려주는 가짜 프로바이더
    struct FakeProvider {
        result: fn() -> Result<DelegatedIdentity, DelegatedAuthError>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(result: fn() -> Result<DelegatedIdentity, DelegatedAuthError>) -> Arc<Self> {
            Arc::new(Self { result, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl DelegatedAuthClient for FakeProvider {
        fn provider(&self) -> AuthProvider {
            AuthProvider::Jellyfin
        }

        async fn authenticate(&self, _username: &str, _password: &str) -> Result<DelegatedIdentity, DelegatedAuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn jellyfin_bob() -> Result<DelegatedIdentity, DelegatedAuthError> {
        Ok(DelegatedIdentity {
            external_user_id: "jf-bob".to_string(),
            external_display_name: "Bob".to_string(),
        })
    }

    /// 모든 호출이 실패하는 저장소
    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn find_by_username_and_provider(&self, _username: &str, _provider: AuthProvider) -> Result<Option<User>, StoreError> {
            Err(StoreError::Backend("connection reset".to_string()))
        }
        async fn find_by_third_party_id(&self, _third_party_id: &str) -> Result<Option<User>, StoreError> {
            Err(StoreError::Backend("connection reset".to_string()))
        }
        async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
            Err(StoreError::Backend("connection reset".to_string()))
        }
        async fn create(&self, _user: User) -> Result<User, StoreError> {
            Err(StoreError::Backend("connection reset".to_string()))
        }
    }

    /// 생성은 항상 충돌로 실패하고, 충돌 이후에야 레코드가 보이는 저장소 (경쟁에서 진 상황)
    struct LostRaceStore {
        inner: MemoryUserRepository,
    }

    #[async_trait]
    impl UserStore for LostRaceStore {
        async fn find_by_username_and_provider(&self, u: &str, p: AuthProvider) -> Result<Option<User>, StoreError> {
            self.inner.find_by_username_and_provider(u, p).await
        }
        async fn find_by_third_party_id(&self, id: &str) -> Result<Option<User>, StoreError> {
            self.inner.find_by_third_party_id(id).await
        }
        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
            self.inner.find_by_id(id).await
        }
        async fn create(&self, user: User) -> Result<User, StoreError> {
            // 다른 요청이 같은 사용자를 먼저 만든 것처럼 동작
            self.inner.create(user.clone()).await?;
            Err(StoreError::Conflict("duplicate key".to_string()))
        }
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(JwtConfig::new("test-secret")))
    }

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(Argon2Params {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            key_length: 32,
        })
    }

    fn service_with(
        users: Arc<dyn UserStore>,
        delegated: Option<Arc<dyn DelegatedAuthClient>>,
    ) -> AuthenticationService {
        AuthenticationService::new(users, cheap_hasher(), tokens(), delegated)
    }

    #[actix_web::test]
    async fn test_register_then_login_scenario() {
        let service = service_with(Arc::new(MemoryUserRepository::new()), None);

        let registered = service.register("bob", "correcthorse").await.unwrap();
        assert!(!registered.token.is_empty());

        let login = service.login_local("bob", "correcthorse").await.unwrap();
        let claims = tokens().verify(&login.token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.username, "bob");

        let wrong = service.login_local("bob", "wrongpass").await.unwrap_err();
        assert!(matches!(wrong, AuthError::IncorrectCredentials));

        let nobody = service.login_local("nobody", "x").await.unwrap_err();
        assert!(matches!(nobody, AuthError::UserNotFound));
    }

    #[actix_web::test]
    async fn test_duplicate_registration_keeps_first_token_valid() {
        let service = service_with(Arc::new(MemoryUserRepository::new()), None);

        let first = service.register("alice", "pw1").await.unwrap();
        let second = service.register("alice", "pw2").await.unwrap_err();

        assert!(matches!(second, AuthError::UserAlreadyExists));
        assert_eq!(tokens().verify(&first.token).unwrap().username, "alice");
        // 두 번째 패스워드로는 로그인할 수 없음
        assert!(service.login_local("alice", "pw2").await.is_err());
        assert!(service.login_local("alice", "pw1").await.is_ok());
    }

    #[actix_web::test]
    async fn test_delegated_user_does_not_satisfy_local_login() {
        let store = Arc::new(MemoryUserRepository::new());
        let service = service_with(store.clone(), Some(FakeProvider::new(jellyfin_bob)));

        service.login_delegated("bob", "anything").await.unwrap();

        let err = service.login_local("Bob", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[actix_web::test]
    async fn test_local_user_without_hash_fails_closed() {
        let store = Arc::new(MemoryUserRepository::new());
        let mut user = User::new_local("carol".to_string(), String::new());
        user.password_hash = None;
        store.create(user).await.unwrap();

        let service = service_with(store, None);
        let err = service.login_local("carol", "").await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed(_)));
    }

    #[actix_web::test]
    async fn test_corrupt_stored_hash_is_login_failed() {
        let store = Arc::new(MemoryUserRepository::new());
        store.create(User::new_local("dave".to_string(), "$argon2id$v=19$broken".to_string())).await.unwrap();

        let service = service_with(store, None);
        let err = service.login_local("dave", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed(_)));
    }

    #[actix_web::test]
    async fn test_delegated_login_creates_once_then_reuses() {
        let store = Arc::new(MemoryUserRepository::new());
        let provider = FakeProvider::new(jellyfin_bob);
        let service = service_with(store.clone(), Some(provider.clone()));

        let first = service.login_delegated("bob", "pw").await.unwrap();
        let second = service.login_delegated("bob", "pw").await.unwrap();

        let first_claims = tokens().verify(&first.token).unwrap();
        let second_claims = tokens().verify(&second.token).unwrap();
        assert_eq!(first_claims.user_id, second_claims.user_id);
        assert_eq!(first_claims.username, "Bob");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        let stored = store.find_by_third_party_id("jf-bob").await.unwrap().unwrap();
        assert_eq!(stored.provider, AuthProvider::Jellyfin);
        assert!(stored.password_hash.is_none());
        // 레코드는 하나뿐
        assert!(store.find_by_id(2).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_delegated_login_keeps_cached_username() {
        let store = Arc::new(MemoryUserRepository::new());
        store
            .create(User::new_delegated(AuthProvider::Jellyfin, "jf-bob".to_string(), "OldName".to_string()))
            .await
            .unwrap();

        let service = service_with(store, Some(FakeProvider::new(jellyfin_bob)));
        let response = service.login_delegated("bob", "pw").await.unwrap();

        assert_eq!(tokens().verify(&response.token).unwrap().username, "OldName");
    }

    #[actix_web::test]
    async fn test_lost_creation_race_retries_lookup() {
        let store = Arc::new(LostRaceStore { inner: MemoryUserRepository::new() });
        let service = service_with(store, Some(FakeProvider::new(jellyfin_bob)));

        let response = service.login_delegated("bob", "pw").await.unwrap();
        assert_eq!(tokens().verify(&response.token).unwrap().user_id, 1);
    }

    #[actix_web::test]
    async fn test_disabled_provider_is_distinct() {
        let service = service_with(Arc::new(MemoryUserRepository::new()), None);

        let err = service.login_delegated("bob", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::ProviderDisabled));
        assert!(service.available_providers().is_empty());
    }

    #[actix_web::test]
    async fn test_available_providers_lists_jellyfin() {
        let service = service_with(Arc::new(MemoryUserRepository::new()), Some(FakeProvider::new(jellyfin_bob)));
        assert_eq!(service.available_providers(), vec!["jellyfin"]);
    }

    #[actix_web::test]
    async fn test_provider_failures_are_mapped() {
        let cases: [(fn() -> Result<DelegatedIdentity, DelegatedAuthError>, fn(&AuthError) -> bool); 4] = [
            (|| Err(DelegatedAuthError::Rejected { status: 401 }), |e| matches!(e, AuthError::IncorrectCredentials)),
            (|| Err(DelegatedAuthError::Timeout), |e| matches!(e, AuthError::RequestFailed(_))),
            (|| Err(DelegatedAuthError::ResponseProcessing("eof".into())), |e| matches!(e, AuthError::ResponseProcessingFailed(_))),
            (|| Err(DelegatedAuthError::EmptyUserId), |e| matches!(e, AuthError::ProviderReturnedEmptyId)),
        ];

        for (result, expected) in cases {
            let store = Arc::new(MemoryUserRepository::new());
            let service = service_with(store.clone(), Some(FakeProvider::new(result)));

            let err = service.login_delegated("bob", "pw").await.unwrap_err();
            assert!(expected(&err), "unexpected error: {:?}", err);
            // 실패 시 레코드가 생기지 않음
            assert!(store.find_by_id(1).await.unwrap().is_none());
        }
    }

    #[actix_web::test]
    async fn test_store_failures_are_mapped() {
        let service = service_with(Arc::new(BrokenStore), Some(FakeProvider::new(jellyfin_bob)));

        assert!(matches!(service.register("bob", "pw").await.unwrap_err(), AuthError::Unknown(_)));
        assert!(matches!(service.login_local("bob", "pw").await.unwrap_err(), AuthError::Unknown(_)));
        assert!(matches!(service.login_delegated("bob", "pw").await.unwrap_err(), AuthError::Unknown(_)));
    }

    #[actix_web::test]
    async fn test_dummy_hash_uses_configured_params() {
        let service = service_with(Arc::new(MemoryUserRepository::new()), None);
        let dummy = service.dummy_hash.as_deref().unwrap();

        assert!(dummy.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
        assert!(!service.hasher.verify("pw", dummy).unwrap());
    }

    #[actix_web::test]
    async fn test_unknown_user_costs_as_much_as_wrong_password() {
        let hasher = PasswordHasher::new(Argon2Params {
            memory_kib: 4096,
            iterations: 4,
            parallelism: 1,
            salt_length: 16,
            key_length: 32,
        });
        let service = AuthenticationService::new(Arc::new(MemoryUserRepository::new()), hasher, tokens(), None);
        service.register("bob", "correcthorse").await.unwrap();

        let mut wrong_password = std::time::Duration::MAX;
        let mut unknown_user = std::time::Duration::MAX;
        for _ in 0..3 {
            let started = std::time::Instant::now();
            assert!(matches!(service.login_local("bob", "wrong").await, Err(AuthError::IncorrectCredentials)));
            wrong_password = wrong_password.min(started.elapsed());

            let started = std::time::Instant::now();
            assert!(matches!(service.login_local("nobody", "wrong").await, Err(AuthError::UserNotFound)));
            unknown_user = unknown_user.min(started.elapsed());
        }

        // 없는 사용자도 키 파생을 한 번 수행해야 함
        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user {:?} vs wrong password {:?}",
            unknown_user,
            wrong_password
        );
    }

    #[actix_web::test]
    async fn test_unknown_user_without_dummy_hash_is_still_not_found() {
        let hasher = PasswordHasher::new(Argon2Params { memory_kib: 1, ..*cheap_hasher().params() });
        let service = AuthenticationService::new(Arc::new(MemoryUserRepository::new()), hasher, tokens(), None);

        assert!(service.dummy_hash.is_none());
        assert!(matches!(service.login_local("nobody", "pw").await, Err(AuthError::UserNotFound)));
    }

    #[actix_web::test]
    async fn test_invalid_hasher_params_surface_as_error() {
        let hasher = PasswordHasher::new(Argon2Params { memory_kib: 1, ..*cheap_hasher().params() });
        let service = AuthenticationService::new(Arc::new(MemoryUserRepository::new()), hasher, tokens(), None);

        let err = service.register("bob", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::HashingFailed(_)));
    }
}
