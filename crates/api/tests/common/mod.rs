#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use glucotrack_api::auth::jwt::{generate_access_token, JwtConfig};
use glucotrack_api::config::{RateLimitConfig, ServerConfig};
use glucotrack_api::router::build_app_router;
use glucotrack_api::state::AppState;
use glucotrack_db::models::user::CreateUser;
use glucotrack_db::repositories::UserRepo;
use glucotrack_notify::{Dispatcher, SmsError, SmsReceipt, SmsSender, DEFAULT_SEND_TIMEOUT};

/// JWT settings shared by the test app and [`token_for`].
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
        issuer: "glucotrack".to_string(),
        audience: "glucotrack-users".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults and a generous rate limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        rate_limit: RateLimitConfig {
            max_requests: 10_000,
            window: Duration::from_secs(60),
            trusted_proxies: Vec::new(),
        },
    }
}

/// Build the full application router with no SMS provider configured.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Dispatcher::new(None, DEFAULT_SEND_TIMEOUT))
}

/// Build the full application router with an explicit config and dispatcher.
///
/// Uses [`build_app_router`] so tests exercise the production middleware
/// stack.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig, dispatcher: Dispatcher) -> Router {
    let state = AppState::new(pool, config.clone(), dispatcher);
    build_app_router(state, &config)
}

/// Build the app with a [`FakeSms`] provider and return both.
pub fn build_test_app_with_sms(pool: PgPool) -> (Router, Arc<FakeSms>) {
    build_test_app_with_fake(pool, test_config(), FakeSms::default())
}

/// Build the app around a prepared [`FakeSms`], e.g. a slow one.
pub fn build_test_app_with_fake(
    pool: PgPool,
    config: ServerConfig,
    fake: FakeSms,
) -> (Router, Arc<FakeSms>) {
    let fake = Arc::new(fake);
    let dispatcher = Dispatcher::new(Some(fake.clone()), DEFAULT_SEND_TIMEOUT);
    (build_test_app_with(pool, config, dispatcher), fake)
}

// ---------------------------------------------------------------------------
// Fake SMS provider
// ---------------------------------------------------------------------------

/// Records every send; numbers listed in `reject` fail with a provider error.
/// Each send first waits `delay`.
#[derive(Default)]
pub struct FakeSms {
    pub sent: Mutex<Vec<(String, String)>>,
    pub reject: Mutex<Vec<String>>,
    pub delay: Duration,
}

impl FakeSms {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(to, _)| to.clone())
            .collect()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn reject_number(&self, phone: &str) {
        self.reject.lock().unwrap().push(phone.to_string());
    }
}

#[async_trait]
impl SmsSender for FakeSms {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        if self.reject.lock().unwrap().iter().any(|n| n == to) {
            return Err(SmsError::Rejected {
                status: 400,
                message: "invalid 'To' number".to_string(),
            });
        }
        Ok(SmsReceipt {
            provider_message_id: Some(format!("SM-{to}")),
        })
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user with the given account status and return its id.
pub async fn seed_user_with_status(pool: &PgPool, email: &str, status: Option<&str>) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test Patient".to_string(),
            phone: None,
            account_status: status.map(str::to_string),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

/// Insert an active user and return `(user_id, access_token)`.
pub async fn seed_user(pool: &PgPool, email: &str) -> (i64, String) {
    let user_id = seed_user_with_status(pool, email, None).await;
    (user_id, token_for(user_id))
}

pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_jwt_config()).expect("token generation should succeed")
}

/// Add a caregiver through the API and return its JSON.
pub async fn add_caregiver(
    app: &Router,
    token: &str,
    name: &str,
    phone: &str,
    emergency_contact: bool,
    alerts_enabled: bool,
) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "relationship": "friend",
        "email": format!("{}@family.test", name.to_lowercase()),
        "phone": phone,
        "emergency_contact": emergency_contact,
        "alerts_enabled": alerts_enabled,
    });
    let response = post_json_auth(app.clone(), "/api/caregivers", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["caregiver"].clone()
}

/// Add a doctor through the API and return its JSON.
pub async fn add_doctor(
    app: &Router,
    token: &str,
    name: &str,
    phone: &str,
    verified: bool,
) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "specialty": "endocrinologist",
        "hospital": "City General",
        "email": format!("{}@clinic.test", name.to_lowercase()),
        "phone": phone,
        "verified": verified,
    });
    let response = post_json_auth(app.clone(), "/api/doctors", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["doctor"].clone()
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
