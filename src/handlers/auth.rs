//! Authentication HTTP Handlers
//!
//! 사용자 인증과 관련된 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//! 로컬 인증과 Jellyfin 위임 인증을 모두 지원하며, JWT 토큰 기반의 상태 없는 인증을 구현합니다.
//!
//! # Auth Providers
//!
//! - **로컬 인증**: 사용자명/패스워드 방식 (`POST /api/auth`, `POST /api/auth/register`)
//! - **Jellyfin**: 위임 인증 (`POST /api/auth/jellyfin`)
//! - **주체 조회**: 토큰에서 복원한 사용자 정보 (`GET /api/auth/me`)
//!
//! 로그인 실패 응답은 "사용자 없음"과 "패스워드 불일치"를 구분하지 않습니다.
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;
use crate::domain::dto::users::request::AuthRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::AuthenticationService;

fn validate_payload(payload: &AuthRequest) -> Result<(), AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))
}

/// 로컬 로그인 핸들러
///
/// # Endpoint
/// `POST /api/auth`
///
/// # Request Body
/// ```json
/// { "username": "bob", "password": "correcthorse" }
/// ```
///
/// # Response
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiIs..." }
/// ```
#[post("")]
pub async fn local_login(
    auth_service: web::Data<AuthenticationService>,
    payload: web::Json<AuthRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&payload)?;

    log::info!("로컬 로그인 시도 - 사용자: {}", payload.username);

    let response = auth_service
        .login_local(&payload.username, &payload.password)
        .await
        .inspect_err(|e| log::warn!("로컬 로그인 실패 - 사용자: {}, 원인: {}", payload.username, e))?;

    Ok(HttpResponse::Ok().json(response))
}

/// Jellyfin 위임 로그인 핸들러
///
/// 자격 증명을 설정된 Jellyfin 서버로 전달해 확인합니다.
/// 처음 로그인하는 Jellyfin 사용자는 로컬 레코드가 자동으로 생성됩니다.
///
/// # Endpoint
/// `POST /api/auth/jellyfin`
///
/// # Errors
///
/// * 403 - Jellyfin 로그인이 비활성화됨
/// * 401 - Jellyfin이 자격 증명을 거부
/// * 502 - Jellyfin 서버에 연결할 수 없거나 응답이 이상함
#[post("/jellyfin")]
pub async fn jellyfin_login(
    auth_service: web::Data<AuthenticationService>,
    payload: web::Json<AuthRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&payload)?;

    log::info!("Jellyfin 로그인 시도 - 사용자: {}", payload.username);

    let response = auth_service
        .login_delegated(&payload.username, &payload.password)
        .await
        .inspect_err(|e| log::warn!("Jellyfin 로그인 실패 - 사용자: {}, 원인: {}", payload.username, e))?;

    Ok(HttpResponse::Ok().json(response))
}

/// 회원가입 핸들러
///
/// # Endpoint
/// `POST /api/auth/register`
#[post("/register")]
pub async fn register(
    auth_service: web::Data<AuthenticationService>,
    payload: web::Json<AuthRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&payload)?;

    let response = auth_service
        .register(&payload.username, &payload.password)
        .await
        .inspect_err(|e| log::warn!("회원가입 실패 - 사용자: {}, 원인: {}", payload.username, e))?;

    Ok(HttpResponse::Ok().json(response))
}

/// 사용 가능한 위임 로그인 프로바이더 목록
///
/// # Endpoint
/// `GET /api/auth/available`
///
/// # Response
/// ```json
/// ["jellyfin"]
/// ```
#[get("/available")]
pub async fn available_providers(
    auth_service: web::Data<AuthenticationService>,
) -> HttpResponse {
    HttpResponse::Ok().json(auth_service.available_providers())
}

/// 현재 인증된 사용자 정보
///
/// 저장소를 조회하지 않고 토큰에 담긴 주체를 그대로 돌려줍니다.
///
/// # Endpoint
/// `GET /api/auth/me` (Authorization 헤더 필요)
#[get("/me", wrap = "AuthMiddleware::new()")]
pub async fn current_user(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::config::{JellyfinConfig, JwtConfig};
    use crate::core::registry::ServiceRegistry;
    use crate::repositories::users::MemoryUserRepository;
    use crate::routes::configure_all_routes;
    use crate::services::auth::{Argon2Params, PasswordHasher};

    fn registry(jellyfin: Option<JellyfinConfig>) -> ServiceRegistry {
        let hasher = PasswordHasher::new(Argon2Params {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            key_length: 32,
        });

        ServiceRegistry::from_parts(
            Arc::new(MemoryUserRepository::new()),
            hasher,
            JwtConfig::new("handler-secret"),
            jellyfin.as_ref(),
        )
        .unwrap()
    }

    macro_rules! app {
        ($registry:expr) => {{
            let registry = $registry;
            test::init_service(
                App::new()
                    .configure(|cfg| registry.configure(cfg))
                    .configure(configure_all_routes),
            )
            .await
        }};
    }

    fn credentials(username: &str, password: &str) -> Value {
        json!({ "username": username, "password": password })
    }

    #[actix_web::test]
    async fn test_register_login_and_me() {
        let app = app!(registry(None));

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(credentials("bob", "correcthorse"))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        assert!(registered["token"].as_str().is_some_and(|t| !t.is_empty()));

        let req = test::TestRequest::post()
            .uri("/api/auth")
            .set_json(credentials("bob", "correcthorse"))
            .to_request();
        let login: Value = test::call_and_read_body_json(&app, req).await;
        let token = login["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me, json!({ "userId": 1, "username": "bob" }));
    }

    #[actix_web::test]
    async fn test_unknown_user_and_wrong_password_look_identical() {
        let app = app!(registry(None));

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(credentials("bob", "correcthorse"))
            .to_request();
        test::call_service(&app, req).await;

        let wrong = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/auth").set_json(credentials("bob", "wrongpass")).to_request(),
        )
        .await;
        let nobody = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/auth").set_json(credentials("nobody", "x")).to_request(),
        )
        .await;

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(nobody.status(), StatusCode::UNAUTHORIZED);

        let wrong_body: Value = test::read_body_json(wrong).await;
        let nobody_body: Value = test::read_body_json(nobody).await;
        assert_eq!(wrong_body, nobody_body);
        assert_eq!(wrong_body, json!({ "error": "incorrect details" }));
    }

    #[actix_web::test]
    async fn test_duplicate_registration_is_conflict() {
        let app = app!(registry(None));

        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(credentials("alice", "pw"))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_empty_credentials_are_bad_request() {
        let app = app!(registry(None));

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(credentials("", ""))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_jellyfin_disabled() {
        let app = app!(registry(None));

        let req = test::TestRequest::get().uri("/api/auth/available").to_request();
        let available: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(available, json!([]));

        let req = test::TestRequest::post()
            .uri("/api/auth/jellyfin")
            .set_json(credentials("bob", "pw"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "jellyfin login not enabled" }));
    }

    #[actix_web::test]
    async fn test_jellyfin_login_through_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Users/AuthenticateByName"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "User": { "Id": "jf-42", "Name": "Bob" }
            })))
            .mount(&server)
            .await;

        let app = app!(registry(Some(JellyfinConfig::new(server.uri(), Duration::from_secs(5)))));

        let req = test::TestRequest::get().uri("/api/auth/available").to_request();
        let available: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(available, json!(["jellyfin"]));

        let req = test::TestRequest::post()
            .uri("/api/auth/jellyfin")
            .set_json(credentials("bob", "pw"))
            .to_request();
        let login: Value = test::call_and_read_body_json(&app, req).await;
        let token = login["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", token))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["username"], "Bob");
    }

    #[actix_web::test]
    async fn test_jellyfin_unreachable_is_bad_gateway() {
        let config = JellyfinConfig::new("http://127.0.0.1:1", Duration::from_secs(2));
        let app = app!(registry(Some(config)));

        let req = test::TestRequest::post()
            .uri("/api/auth/jellyfin")
            .set_json(credentials("bob", "pw"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let app = app!(registry(None));

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
