//! HTTP-level integration tests for login, the current-user endpoint,
//! and account lockout.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, get, get_auth, login, post_json, put_json_auth, TEST_PASSWORD,
};
use sqlx::PgPool;
use chambers_db::repositories::UserRepo;

const ADMIN: i64 = 2;
const LAWYER: i64 = 5;

/// Successful login returns 200 with an access token and the user profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_test_user(&pool, "Bola Lawyer", LAWYER).await;

    let body = serde_json::json!({ "email": user.email, "password": TEST_PASSWORD });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert!(json["expires_in"].is_number(), "response must contain expires_in");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], user.email.as_str());
    assert_eq!(json["user"]["role"], "lawyer");
    assert!(json["user"]["password_hash"].is_null(), "hash must never leak");
}

/// Wrong password and unknown email return the same 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_uniform(pool: PgPool) {
    let user = create_test_user(&pool, "Bola Lawyer", LAWYER).await;

    let body = serde_json::json!({ "email": user.email, "password": "not-the-password" });
    let wrong =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "email": "ghost@chambers.test", "password": "whatever" });
    let unknown =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

/// A deactivated account cannot log in even with the right password.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_inactive_account(pool: PgPool) {
    let user = create_test_user(&pool, "Bola Lawyer", LAWYER).await;
    UserRepo::deactivate(&pool, user.id)
        .await
        .expect("deactivation should succeed");

    let body = serde_json::json!({ "email": user.email, "password": TEST_PASSWORD });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Five wrong passwords lock the account; the right password then fails
/// until the lock expires.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_lockout(pool: PgPool) {
    let user = create_test_user(&pool, "Bola Lawyer", LAWYER).await;

    for _ in 0..5 {
        let body = serde_json::json!({ "email": user.email, "password": "bad-password" });
        let response =
            post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let body = serde_json::json!({ "email": user.email, "password": TEST_PASSWORD });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// `/auth/me` returns the caller's profile; anonymous requests get 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me(pool: PgPool) {
    let user = create_test_user(&pool, "Ngozi Admin", ADMIN).await;
    let token = login(&pool, &user).await;

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["role"], "admin");

    let response = get(common::build_test_app(pool.clone()), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Changing the password requires the current one; the old password stops
/// working afterwards.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password(pool: PgPool) {
    let user = create_test_user(&pool, "Bola Lawyer", LAWYER).await;
    let token = login(&pool, &user).await;

    // Wrong current password.
    let body = serde_json::json!({
        "current_password": "not-the-password",
        "new_password": "a-brand-new-password",
    });
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/password",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Too-short replacement.
    let body = serde_json::json!({
        "current_password": TEST_PASSWORD,
        "new_password": "short",
    });
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/password",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid change.
    let body = serde_json::json!({
        "current_password": TEST_PASSWORD,
        "new_password": "a-brand-new-password",
    });
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/password",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "email": user.email, "password": TEST_PASSWORD });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "old password revoked");

    let body = serde_json::json!({ "email": user.email, "password": "a-brand-new-password" });
    let response =
        post_json(common::build_test_app(pool.clone()), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A garbage bearer token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_token_rejected(pool: PgPool) {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/me",
        "not-a-real-token",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
