//! Jellyfin 위임 인증 클라이언트
//!
//! 사용자가 입력한 자격 증명을 Jellyfin 서버의 `AuthenticateByName` API로 전달하고,
//! 성공 시 Jellyfin 측 사용자 ID와 이름을 돌려받습니다.
//! 패스워드는 이 서비스에 저장되지 않으며 로그에도 남지 않습니다.
//!
//! ## 요청 형식
//!
//! ```text
//! POST {JELLYFIN_HOST}/Users/AuthenticateByName
//! X-Emby-Authorization: MediaBrowser Client="Watcharr", Device="HTTP", DeviceId="WatcharrFor<username>", Version="10.8.0"
//! Content-Type: application/json
//!
//! {"Username": "<username>", "Pw": "<password>"}
//! ```
//!
//! 모든 호출은 설정된 타임아웃으로 제한됩니다. 호출한 요청이 취소되면
//! 진행 중인 외부 요청도 future drop과 함께 취소됩니다.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use crate::config::{AuthProvider, JellyfinConfig};
use crate::domain::models::auth::DelegatedIdentity;
use crate::domain::models::jellyfin::{AuthenticateByNameRequest, AuthenticateByNameResponse};
use crate::errors::AppError;

const AUTH_HEADER: &str = "X-Emby-Authorization";
const CLIENT_NAME: &str = "Watcharr";
const CLIENT_VERSION: &str = "10.8.0";

/// 위임 인증 에러
#[derive(Debug, Error)]
pub enum DelegatedAuthError {
    /// 프로바이더가 2xx가 아닌 상태로 응답 (자격 증명 거부)
    #[error("provider rejected credentials with status {status}")]
    Rejected { status: u16 },

    /// 연결 실패 등 전송 계층 오류
    #[error("request to provider failed: {0}")]
    RequestFailed(String),

    /// 제한 시간 초과
    #[error("request to provider timed out")]
    Timeout,

    /// 응답 본문 해석 실패
    #[error("unexpected provider response: {0}")]
    ResponseProcessing(String),

    /// 성공 응답이지만 사용자 ID가 비어 있음
    #[error("provider returned an empty user id")]
    EmptyUserId,
}

/// 외부 인증 프로바이더 추상화
///
/// `AuthenticationService`는 이 trait만 알고 있으므로
/// 테스트에서는 가짜 구현을 주입할 수 있습니다.
#[async_trait]
pub trait DelegatedAuthClient: Send + Sync {
    /// 이 클라이언트가 대표하는 프로바이더
    fn provider(&self) -> AuthProvider;

    /// 자격 증명을 프로바이더에 전달해 신원을 확인합니다.
    async fn authenticate(&self, username: &str, password: &str) -> Result<DelegatedIdentity, DelegatedAuthError>;
}

/// Jellyfin HTTP 클라이언트
pub struct JellyfinAuthClient {
    http: Client,
    endpoint: String,
}

impl JellyfinAuthClient {
    /// 타임아웃이 적용된 HTTP 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - HTTP 클라이언트를 초기화할 수 없는 경우
    pub fn new(config: &JellyfinConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Jellyfin HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/Users/AuthenticateByName", config.host),
        })
    }

    fn authorization_header(username: &str) -> String {
        format!(
            "MediaBrowser Client=\"{}\", Device=\"HTTP\", DeviceId=\"{}For{}\", Version=\"{}\"",
            CLIENT_NAME, CLIENT_NAME, username, CLIENT_VERSION
        )
    }
}

fn transport_error(err: reqwest::Error) -> DelegatedAuthError {
    if err.is_timeout() {
        DelegatedAuthError::Timeout
    } else {
        DelegatedAuthError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl DelegatedAuthClient for JellyfinAuthClient {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Jellyfin
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<DelegatedIdentity, DelegatedAuthError> {
        let response = self.http
            .post(&self.endpoint)
            .header(AUTH_HEADER, Self::authorization_header(username))
            .json(&AuthenticateByNameRequest { username, pw: password })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            log::info!("Jellyfin 인증 거부: status={}", status.as_u16());
            return Err(DelegatedAuthError::Rejected { status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: AuthenticateByNameResponse = serde_json::from_slice(&body)
            .map_err(|e| DelegatedAuthError::ResponseProcessing(e.to_string()))?;

        let identity = DelegatedIdentity::from(parsed.user);
        if identity.external_user_id.is_empty() {
            return Err(DelegatedAuthError::EmptyUserId);
        }

        log::debug!("Jellyfin 인증 성공: external_id={}", identity.external_user_id);
        Ok(identity)
    }
}
