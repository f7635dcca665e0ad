//! HTTP-level integration tests for staff directory management.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, delete_auth, get_auth, login, post_json_auth};
use sqlx::PgPool;

const ADMIN: i64 = 2;
const MANAGER: i64 = 3;
const LAWYER: i64 = 5;

async fn create_user_req(
    pool: &PgPool,
    token: &str,
    email: &str,
    role: &str,
    password: &str,
) -> axum::http::Response<axum::body::Body> {
    let body = serde_json::json!({
        "full_name": "New Staffer",
        "email": email,
        "password": password,
        "role": role,
    });
    post_json_auth(common::build_test_app(pool.clone()), "/api/v1/users", body, token).await
}

/// Admin creates an account; the response carries the resolved role name
/// and never the password hash.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user(pool: PgPool) {
    let admin = create_test_user(&pool, "Ngozi Admin", ADMIN).await;
    let token = login(&pool, &admin).await;

    let response = create_user_req(
        &pool,
        &token,
        "New.Staffer@Chambers.Test",
        "paralegal",
        "a-long-enough-password",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "paralegal");
    // Email is normalised to lowercase.
    assert_eq!(json["data"]["email"], "new.staffer@chambers.test");
    assert!(json["data"]["password_hash"].is_null());
}

/// Unknown roles and weak passwords are rejected; duplicate emails conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_validation(pool: PgPool) {
    let admin = create_test_user(&pool, "Ngozi Admin", ADMIN).await;
    let token = login(&pool, &admin).await;

    let response =
        create_user_req(&pool, &token, "a@chambers.test", "wizard", "a-long-enough-password")
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_user_req(&pool, &token, "a@chambers.test", "lawyer", "short").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ok = create_user_req(&pool, &token, "a@chambers.test", "lawyer", "a-long-enough-password")
        .await;
    assert_eq!(ok.status(), StatusCode::CREATED);

    let dup = create_user_req(&pool, &token, "a@chambers.test", "lawyer", "a-long-enough-password")
        .await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
}

/// Directory listing needs an oversight role; fee earners only see
/// themselves and the manager directory.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_directory_scopes(pool: PgPool) {
    let admin = create_test_user(&pool, "Ngozi Admin", ADMIN).await;
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let lawyer = create_test_user(&pool, "Bola Lawyer", LAWYER).await;

    let admin_token = login(&pool, &admin).await;
    let lawyer_token = login(&pool, &lawyer).await;

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/users", &lawyer_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/users", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    // Any authenticated user can read the assignment targets.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/managers",
        &lawyer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let managers = json["data"].as_array().unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0]["id"], manager.id);

    // Own profile is readable; someone else's is not.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", lawyer.id),
        &lawyer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", admin.id),
        &lawyer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Deactivation is soft, blocks login, and cannot target yourself.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_deactivate_user(pool: PgPool) {
    let admin = create_test_user(&pool, "Ngozi Admin", ADMIN).await;
    let lawyer = create_test_user(&pool, "Bola Lawyer", LAWYER).await;
    let admin_token = login(&pool, &admin).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", admin.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "cannot deactivate self");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", lawyer.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "email": lawyer.email, "password": common::TEST_PASSWORD });
    let response = common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
