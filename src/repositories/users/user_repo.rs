//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 MongoDB 데이터 액세스 계층입니다.
//!
//! ## 특징
//!
//! - **정수 ID 발급**: `counters` 컬렉션의 원자적 `$inc`로 1부터 단조 증가하는 ID를 발급
//! - **데이터 무결성**: 유일성은 애플리케이션이 아닌 유니크 인덱스가 보장
//! - **에러 분류**: 중복 키(11000) 에러는 [`StoreError::Conflict`]로 변환

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::Deserialize;
use crate::config::AuthProvider;
use crate::db::Database;
use crate::domain::entities::users::{User, UserId};
use crate::errors::AppError;
use crate::repositories::users::user_store::{StoreError, UserStore};

const USERS_COLLECTION: &str = "users";
const COUNTERS_COLLECTION: &str = "counters";
const USER_SEQUENCE: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Deserialize)]
struct Counter {
    seq: i64,
}

/// 사용자 데이터 액세스 리포지토리
///
/// ## 컬렉션
///
/// - **`users`**: 사용자 문서
///   - `usr_name_to_type`: `(username, provider)` 유니크 복합 인덱스
///   - `third_party_id_unique`: `third_party_id`가 있는 문서에만 적용되는 유니크 부분 인덱스
/// - **`counters`**: `{ _id: "users", seq: <마지막 발급 ID> }`
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let repo = UserRepository::new(&database);
/// repo.create_indexes().await?;
///
/// let created = repo.create(User::new_local("bob".into(), hash)).await?;
/// let found = repo.find_by_username_and_provider("bob", AuthProvider::Local).await?;
/// ```
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
    counters: Collection<Document>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        let database = db.get_database();
        Self {
            users: database.collection::<User>(USERS_COLLECTION),
            counters: database.collection::<Document>(COUNTERS_COLLECTION),
        }
    }

    /// 유니크 인덱스를 생성합니다. 이미 존재하면 아무 일도 하지 않습니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let username_provider_index = IndexModel::builder()
            .keys(doc! { "username": 1, "provider": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("usr_name_to_type".to_string())
                .build())
            .build();

        let third_party_index = IndexModel::builder()
            .keys(doc! { "third_party_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "third_party_id": { "$exists": true } })
                .name("third_party_id_unique".to_string())
                .build())
            .build();

        self.users
            .create_indexes([username_provider_index, third_party_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// 다음 사용자 ID를 발급합니다.
    ///
    /// 삽입이 실패해도 발급된 번호는 되돌리지 않으므로 ID는 재사용되지 않습니다.
    async fn next_id(&self) -> Result<UserId, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self.counters
            .find_one_and_update(
                doc! { "_id": USER_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .with_options(options)
            .await
            .map_err(into_store_error)?
            .ok_or_else(|| StoreError::Backend("ID 카운터를 읽을 수 없습니다".to_string()))?;

        let counter: Counter = mongodb::bson::from_document(counter)
            .map_err(|e| StoreError::Backend(format!("ID 카운터 형식 오류: {}", e)))?;

        Ok(counter.seq)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username_and_provider(
        &self,
        username: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(username_provider_filter(username, provider))
            .await
            .map_err(into_store_error)
    }

    async fn find_by_third_party_id(&self, third_party_id: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "third_party_id": third_party_id })
            .await
            .map_err(into_store_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "_id": id })
            .await
            .map_err(into_store_error)
    }

    async fn create(&self, mut user: User) -> Result<User, StoreError> {
        let id = self.next_id().await?;
        user.id = Some(id);

        self.users
            .insert_one(&user)
            .await
            .map_err(into_store_error)?;

        log::debug!("사용자 저장 완료: id={}, provider={}", id, user.provider.as_str());
        Ok(user)
    }
}

/// `(username, provider)` 조회 필터
///
/// 로컬 조회는 `provider` 필드가 없는 문서도 매칭합니다.
fn username_provider_filter(username: &str, provider: AuthProvider) -> Document {
    let tag = i32::from(provider.tag());

    match provider {
        AuthProvider::Local => doc! {
            "username": username,
            "provider": { "$in": [tag, Bson::Null] },
        },
        _ => doc! { "username": username, "provider": tag },
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn into_store_error(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Conflict(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}
