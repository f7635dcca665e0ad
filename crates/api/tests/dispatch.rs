//! Integration tests for notification dispatch: best-effort delivery
//! must never surface an error to the calling workflow.

use assert_matches::assert_matches;
use sqlx::PgPool;

use chambers_api::error::AppError;
use chambers_api::notifications::{
    notify_role_group_best_effort, notify_user, notify_user_best_effort,
};
use chambers_core::error::CoreError;
use chambers_core::notification::NotificationType;
use chambers_core::roles::Role;

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_recipient_is_an_error_for_strict_delivery(pool: PgPool) {
    let result = notify_user(
        &pool,
        999_999,
        NotificationType::General,
        "nobody home",
        None,
    )
    .await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::UnknownRecipient(999_999)))
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn best_effort_delivery_swallows_failures(pool: PgPool) {
    // Unknown recipient: logged, not returned.
    notify_user_best_effort(
        &pool,
        999_999,
        NotificationType::General,
        "nobody home",
        None,
    )
    .await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no row written for a missing recipient");

    // A dead pool makes every insert fail; the wrappers still return.
    pool.close().await;
    notify_user_best_effort(&pool, 1, NotificationType::General, "too late", None).await;
    notify_role_group_best_effort(
        &pool,
        Role::Admin,
        NotificationType::General,
        "too late",
        None,
    )
    .await;
}
