//! # 메모리 사용자 저장소
//!
//! 개발/테스트용 프로세스 메모리 저장소입니다. 재시작하면 데이터가 사라집니다.
//! 유일성 검사와 삽입은 하나의 쓰기 락 구간 안에서 수행됩니다.

use std::sync::RwLock;
use async_trait::async_trait;
use crate::config::AuthProvider;
use crate::domain::entities::users::{User, UserId};
use crate::repositories::users::user_store::{StoreError, UserStore};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    last_id: UserId,
}

/// `RwLock`으로 보호되는 메모리 사용자 저장소
#[derive(Default)]
pub struct MemoryUserRepository {
    state: RwLock<MemoryState>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find<P>(&self, predicate: P) -> Result<Option<User>, StoreError>
    where
        P: Fn(&User) -> bool,
    {
        let state = self.state
            .read()
            .map_err(|_| StoreError::Backend("메모리 저장소 락이 손상되었습니다".to_string()))?;

        Ok(state.users.iter().find(|user| predicate(user)).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_username_and_provider(
        &self,
        username: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError> {
        self.find(|user| user.username == username && user.provider == provider)
    }

    async fn find_by_third_party_id(&self, third_party_id: &str) -> Result<Option<User>, StoreError> {
        self.find(|user| user.third_party_id.as_deref() == Some(third_party_id))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.find(|user| user.id == Some(id))
    }

    async fn create(&self, mut user: User) -> Result<User, StoreError> {
        let mut state = self.state
            .write()
            .map_err(|_| StoreError::Backend("메모리 저장소 락이 손상되었습니다".to_string()))?;

        if state.users.iter().any(|u| u.username == user.username && u.provider == user.provider) {
            return Err(StoreError::Conflict(format!(
                "username '{}' already exists for provider {}",
                user.username,
                user.provider.as_str()
            )));
        }

        if let Some(third_party_id) = user.third_party_id.as_deref() {
            if state.users.iter().any(|u| u.third_party_id.as_deref() == Some(third_party_id)) {
                return Err(StoreError::Conflict("third_party_id already exists".to_string()));
            }
        }

        state.last_id += 1;
        user.id = Some(state.last_id);
        state.users.push(user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;

    #[actix_web::test]
    async fn test_ids_start_at_one_and_increase() {
        let repo = MemoryUserRepository::new();

        let first = repo.create(User::new_local("alice".into(), "h1".into())).await.unwrap();
        let second = repo.create(User::new_local("bob".into(), "h2".into())).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find_by_id(2).await.unwrap().unwrap().username, "bob");
    }

    #[actix_web::test]
    async fn test_same_username_different_provider_is_allowed() {
        let repo = MemoryUserRepository::new();

        repo.create(User::new_local("bob".into(), "h".into())).await.unwrap();
        let delegated = repo.create(User::new_delegated(AuthProvider::Jellyfin, "jf-1".into(), "bob".into())).await.unwrap();

        assert_eq!(delegated.provider, AuthProvider::Jellyfin);
        let local = repo.find_by_username_and_provider("bob", AuthProvider::Local).await.unwrap().unwrap();
        assert!(local.password_hash.is_some());
    }

    #[actix_web::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = MemoryUserRepository::new();

        repo.create(User::new_local("bob".into(), "h".into())).await.unwrap();
        let err = repo.create(User::new_local("bob".into(), "other".into())).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_duplicate_third_party_id_is_conflict() {
        let repo = MemoryUserRepository::new();

        repo.create(User::new_delegated(AuthProvider::Jellyfin, "jf-1".into(), "bob".into())).await.unwrap();
        let err = repo.create(User::new_delegated(AuthProvider::Jellyfin, "jf-1".into(), "robert".into())).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(repo.find_by_third_party_id("jf-1").await.unwrap().unwrap().username, "bob");
    }

    #[test]
    fn test_concurrent_creates_admit_exactly_one() {
        let repo = Arc::new(MemoryUserRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    let user = User::new_local("race".into(), format!("hash-{}", i));
                    actix_web::rt::System::new().block_on(repo.create(user))
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(successes, 1);
    }
}
