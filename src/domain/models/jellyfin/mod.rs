//! Jellyfin 미디어 서버 통합 모델

pub mod authenticate_by_name;

pub use authenticate_by_name::{AuthenticateByNameRequest, AuthenticateByNameResponse, JellyfinUser};
