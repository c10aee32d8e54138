//! # Repository Layer
//!
//! 사용자 신원 저장소(IdentityStore)의 추상화와 구현체를 제공합니다.
//!
//! ```text
//! AuthenticationService
//!        │  Arc<dyn UserStore>
//!        ▼
//! ┌──────────────────┬────────────────────────┐
//! │ UserRepository   │ MemoryUserRepository   │
//! │ (MongoDB)        │ (프로세스 메모리)        │
//! └──────────────────┴────────────────────────┘
//! ```
//!
//! 서비스 계층은 trait에만 의존하므로, 테스트에서는 메모리 구현을,
//! 운영에서는 MongoDB 구현을 `ServiceRegistry`가 선택해 주입합니다.

pub mod users;
