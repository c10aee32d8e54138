//! 사용자 저장소 모듈

pub mod user_store;
pub mod user_repo;
pub mod memory_user_repo;

pub use user_store::{StoreError, UserStore};
pub use user_repo::UserRepository;
pub use memory_user_repo::MemoryUserRepository;
