//! HTTP-level tests for request authentication.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_test_app, get, get_auth, seed_user, seed_user_with_status, send,
    test_jwt_config, token_for,
};
use glucotrack_api::auth::jwt::{generate_access_token, JwtConfig};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_returns_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/alerts").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Access token required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/alerts", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bearer_token_is_accepted(pool: PgPool) {
    let (_user_id, token) = seed_user(&pool, "bearer@test.local").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/alerts", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cookie_token_is_accepted(pool: PgPool) {
    let (_user_id, token) = seed_user(&pool, "cookie@test.local").await;
    let app = build_test_app(pool);

    let request = Request::builder()
        .uri("/api/alerts")
        .header("cookie", format!("theme=dark; token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_unknown_user_returns_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/alerts", &token_for(987_654)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_account_returns_401(pool: PgPool) {
    let user_id = seed_user_with_status(&pool, "suspended@test.local", Some("suspended")).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/alerts", &token_for(user_id)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Account is not active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_other_audience_returns_401(pool: PgPool) {
    let (user_id, _token) = seed_user(&pool, "aud@test.local").await;
    let app = build_test_app(pool);

    let foreign = JwtConfig {
        audience: "some-other-app".to_string(),
        ..test_jwt_config()
    };
    let token = generate_access_token(user_id, &foreign).unwrap();

    let response = get_auth(app, "/api/alerts", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_does_not_require_auth(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
