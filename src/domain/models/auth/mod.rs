//! 인증 결과 모델

pub mod authenticated_user;
pub mod delegated_identity;

pub use authenticated_user::AuthenticatedUser;
pub use delegated_identity::DelegatedIdentity;
