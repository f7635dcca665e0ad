//! HTTP-level integration tests for the approval PIN endpoints: creation,
//! verification, lockout, and superadmin reset.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, delete_auth, get_auth, login, post_json_auth};
use sqlx::PgPool;

const SUPERADMIN: i64 = 1;
const MANAGER: i64 = 3;
const LAWYER: i64 = 5;

async fn create_pin(
    pool: &PgPool,
    token: &str,
    email: &str,
    pin: &str,
    confirm: &str,
) -> StatusCode {
    let body = serde_json::json!({ "email": email, "pin": pin, "confirm_pin": confirm });
    post_json_auth(common::build_test_app(pool.clone()), "/api/v1/auth/pin", body, token)
        .await
        .status()
}

async fn verify_pin(
    pool: &PgPool,
    token: &str,
    pin: &str,
) -> axum::http::Response<axum::body::Body> {
    let body = serde_json::json!({ "pin": pin });
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/pin/verify",
        body,
        token,
    )
    .await
}

/// A manager can register a PIN once; the second attempt conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_pin_once(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let token = login(&pool, &manager).await;

    assert_eq!(create_pin(&pool, &token, &manager.email, "1234", "1234").await, StatusCode::CREATED);
    assert_eq!(create_pin(&pool, &token, &manager.email, "5678", "5678").await, StatusCode::CONFLICT);

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/pin", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["has_pin"], true);
}

/// Format and confirmation mismatches are rejected before hashing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_pin_validation(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let token = login(&pool, &manager).await;

    // Too short, too long, non-digit, mismatched confirmation.
    assert_eq!(create_pin(&pool, &token, &manager.email, "123", "123").await, StatusCode::BAD_REQUEST);
    assert_eq!(create_pin(&pool, &token, &manager.email, "1234567", "1234567").await, StatusCode::BAD_REQUEST);
    assert_eq!(create_pin(&pool, &token, &manager.email, "12a4", "12a4").await, StatusCode::BAD_REQUEST);
    assert_eq!(create_pin(&pool, &token, &manager.email, "1234", "4321").await, StatusCode::BAD_REQUEST);
}

/// Only managers hold approval PINs.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_pin_requires_manager(pool: PgPool) {
    let lawyer = create_test_user(&pool, "Bola Lawyer", LAWYER).await;
    let token = login(&pool, &lawyer).await;

    assert_eq!(create_pin(&pool, &token, &lawyer.email, "1234", "1234").await, StatusCode::FORBIDDEN);
}

/// The submitted email must belong to the calling manager's account.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_pin_rejects_foreign_email(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let token = login(&pool, &manager).await;

    assert_eq!(
        create_pin(&pool, &token, "someone.else@chambers.test", "1234", "1234").await,
        StatusCode::BAD_REQUEST
    );
    // Case differences are tolerated.
    let mixed = manager.email.to_uppercase();
    assert_eq!(create_pin(&pool, &token, &mixed, "1234", "1234").await, StatusCode::CREATED);
}

/// Verification succeeds with the right PIN and fails uniformly otherwise.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_verify_pin(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let token = login(&pool, &manager).await;
    create_pin(&pool, &token, &manager.email, "123456", "123456").await;

    let response = verify_pin(&pool, &token, "123456").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);

    let response = verify_pin(&pool, &token, "000000").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or missing approval PIN");
    assert_eq!(json["code"], "INVALID_PIN");
}

/// A manager with no PIN gets the same failure body as a wrong PIN, so the
/// response never reveals whether a PIN exists.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_pin_indistinguishable_from_wrong_pin(pool: PgPool) {
    let with_pin = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let without_pin = create_test_user(&pool, "Funke Manager", MANAGER).await;

    let with_token = login(&pool, &with_pin).await;
    let without_token = login(&pool, &without_pin).await;
    create_pin(&pool, &with_token, &with_pin.email, "1234", "1234").await;

    let wrong = verify_pin(&pool, &with_token, "9999").await;
    let missing = verify_pin(&pool, &without_token, "9999").await;

    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
    assert_eq!(missing.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(wrong).await, body_json(missing).await);
}

/// Repeated failures lock the PIN; the right PIN then fails too.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pin_lockout(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let token = login(&pool, &manager).await;
    create_pin(&pool, &token, &manager.email, "1234", "1234").await;

    for _ in 0..5 {
        let response = verify_pin(&pool, &token, "0000").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // Locked out now, even with the correct PIN.
    let response = verify_pin(&pool, &token, "1234").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PIN");
}

/// Superadmin can reset a manager's PIN so they can register a new one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_superadmin_reset(pool: PgPool) {
    let superadmin = create_test_user(&pool, "Root Admin", SUPERADMIN).await;
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;

    let manager_token = login(&pool, &manager).await;
    let super_token = login(&pool, &superadmin).await;
    create_pin(&pool, &manager_token, &manager.email, "1234", "1234").await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/auth/pin/{}", manager.id),
        &super_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/pin",
        &manager_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["has_pin"], false);

    // And a new PIN can be registered.
    assert_eq!(
        create_pin(&pool, &manager_token, &manager.email, "9876", "9876").await,
        StatusCode::CREATED
    );
}

/// Reset is refused for users who are not managers and for managers
/// without a stored PIN.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_target_validation(pool: PgPool) {
    let superadmin = create_test_user(&pool, "Root Admin", SUPERADMIN).await;
    let lawyer = create_test_user(&pool, "Bola Lawyer", LAWYER).await;
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let super_token = login(&pool, &superadmin).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/auth/pin/{}", lawyer.id),
        &super_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Manager with no PIN on file.
    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/auth/pin/{}", manager.id),
        &super_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Managers cannot reset each other's PINs.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_requires_superadmin(pool: PgPool) {
    let manager = create_test_user(&pool, "Tunde Manager", MANAGER).await;
    let other = create_test_user(&pool, "Funke Manager", MANAGER).await;

    let manager_token = login(&pool, &manager).await;
    let other_token = login(&pool, &other).await;
    create_pin(&pool, &manager_token, &manager.email, "1234", "1234").await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/auth/pin/{}", manager.id),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
