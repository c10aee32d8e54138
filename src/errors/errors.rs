//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! HTTP 경계에서 사용하는 통합 에러 타입입니다.
//! 각 컴포넌트(패스워드 해셔, 토큰 서비스, 인증 서비스)는 자신만의 정밀한 에러 타입을
//! 가지며, 핸들러로 올라오는 시점에 이 모듈의 [`AppError`]로 변환됩니다.
//!
//! ## 인증 에러 변환 정책
//!
//! 호출자에게 보이는 결과는 의도적으로 거칠게 나눕니다.
//! "존재하지 않는 사용자"와 "틀린 비밀번호"는 같은 응답으로 변환되어
//! 로그인 시도의 어느 단계가 실패했는지 외부에서 구분할 수 없습니다.
//!
//! | AuthError | HTTP Status | 메시지 |
//! |-----------|-------------|--------|
//! | `UserAlreadyExists` | 409 | `User already exists` |
//! | `UserNotFound`, `IncorrectCredentials` | 401 | `incorrect details` |
//! | `ProviderDisabled` | 403 | `jellyfin login not enabled` |
//! | `RequestFailed`, `ResponseProcessingFailed`, `ProviderReturnedEmptyId` | 502 | `request failed` |
//! | 그 외 | 500 | `unknown error` |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::AppError;
//!
//! async fn login(payload: AuthRequest) -> Result<HttpResponse, AppError> {
//!     let response = auth_service.login_local(&payload.username, &payload.password).await?;
//!     Ok(HttpResponse::Ok().json(response))
//! }
//! ```

use thiserror::Error;
use crate::services::auth::authentication_service::AuthError;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 또는 비활성화된 기능 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 설정 오류 (시작 시점에만 발생)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문에 담을 메시지만 반환합니다.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::ConfigError(msg)
            | AppError::InternalError(msg) => msg,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 내부 정보가 섞이지 않도록 변형 이름 없이 메시지만 내려보냅니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.message()
            }))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserAlreadyExists => {
                AppError::ConflictError("User already exists".to_string())
            }
            AuthError::UserNotFound | AuthError::IncorrectCredentials => {
                AppError::AuthenticationError("incorrect details".to_string())
            }
            AuthError::ProviderDisabled => {
                AppError::AuthorizationError("jellyfin login not enabled".to_string())
            }
            AuthError::RequestFailed(_)
            | AuthError::ResponseProcessingFailed(_)
            | AuthError::ProviderReturnedEmptyId => {
                AppError::ExternalServiceError("request failed".to_string())
            }
            AuthError::IdNotAssigned
            | AuthError::TokenIssuanceFailed(_)
            | AuthError::HashingFailed(_)
            | AuthError::LoginFailed(_)
            | AuthError::UserCreationFailed(_)
            | AuthError::Unknown(_) => AppError::InternalError("unknown error".to_string()),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
