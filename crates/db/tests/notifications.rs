//! Integration tests for the notification repository: read tracking,
//! the 50-row list cap, unread calendar dates, and overdue dedup.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use chambers_core::notification::{EntityType, NotificationType};
use chambers_core::roles::Role;
use chambers_db::models::notification::CreateNotification;
use chambers_db::models::user::CreateUser;
use chambers_db::repositories::{NotificationRepo, UserRepo};

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Ada Obi".to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            role_id: Role::Lawyer.id(),
        },
    )
    .await
    .unwrap()
    .id
}

fn general(user_id: i64, message: &str) -> CreateNotification {
    CreateNotification {
        user_id,
        notification_type: NotificationType::General.as_str().to_string(),
        message: message.to_string(),
        entity_type: None,
        entity_id: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_list_and_mark_read(pool: PgPool) {
    let user = seed_user(&pool, "ada@chambers.test").await;
    let other = seed_user(&pool, "dan@chambers.test").await;

    let id = NotificationRepo::create(&pool, &general(user, "hello")).await.unwrap();
    NotificationRepo::create(&pool, &general(user, "world")).await.unwrap();

    let list = NotificationRepo::list_for_user(&pool, user, None, 50).await.unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|n| !n.is_read));

    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 2);

    // The recipient lookup distinguishes missing rows from foreign rows.
    assert_eq!(NotificationRepo::find_recipient(&pool, id).await.unwrap(), Some(user));
    assert_ne!(NotificationRepo::find_recipient(&pool, id).await.unwrap(), Some(other));
    assert_eq!(NotificationRepo::find_recipient(&pool, 999_999).await.unwrap(), None);

    NotificationRepo::mark_read(&pool, id).await.unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 1);

    // Marking twice keeps the original read_at.
    let read_at = NotificationRepo::list_for_user(&pool, user, None, 50)
        .await
        .unwrap()
        .into_iter()
        .find(|n| n.id == id)
        .and_then(|n| n.read_at);
    assert!(read_at.is_some());
    NotificationRepo::mark_read(&pool, id).await.unwrap();
    let read_at_again = NotificationRepo::list_for_user(&pool, user, None, 50)
        .await
        .unwrap()
        .into_iter()
        .find(|n| n.id == id)
        .and_then(|n| n.read_at);
    assert_eq!(read_at, read_at_again);

    assert_eq!(NotificationRepo::mark_all_read(&pool, user).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_caps_at_limit_and_honors_since(pool: PgPool) {
    let user = seed_user(&pool, "ada@chambers.test").await;

    for i in 0..60 {
        NotificationRepo::create(&pool, &general(user, &format!("n{i}"))).await.unwrap();
    }
    let list = NotificationRepo::list_for_user(&pool, user, None, 50).await.unwrap();
    assert_eq!(list.len(), 50);

    // Backdate everything, then only rows after the cutoff remain.
    sqlx::query("UPDATE notifications SET created_at = NOW() - INTERVAL '2 days' WHERE user_id = $1")
        .bind(user)
        .execute(&pool)
        .await
        .unwrap();
    NotificationRepo::create(&pool, &general(user, "fresh")).await.unwrap();

    let since = Utc::now() - Duration::days(1);
    let recent = NotificationRepo::list_for_user(&pool, user, Some(since), 50).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].message, "fresh");
}

#[sqlx::test(migrations = "./migrations")]
async fn unread_dates_are_distinct_utc_days(pool: PgPool) {
    let user = seed_user(&pool, "ada@chambers.test").await;

    for _ in 0..3 {
        NotificationRepo::create(&pool, &general(user, "same day")).await.unwrap();
    }
    let old = NotificationRepo::create(&pool, &general(user, "older")).await.unwrap();
    sqlx::query("UPDATE notifications SET created_at = created_at - INTERVAL '3 days' WHERE id = $1")
        .bind(old)
        .execute(&pool)
        .await
        .unwrap();
    // Read rows do not contribute a date.
    let read = NotificationRepo::create(&pool, &general(user, "read")).await.unwrap();
    sqlx::query("UPDATE notifications SET created_at = created_at - INTERVAL '10 days' WHERE id = $1")
        .bind(read)
        .execute(&pool)
        .await
        .unwrap();
    NotificationRepo::mark_read(&pool, read).await.unwrap();

    let dates = NotificationRepo::unread_dates(&pool, user).await.unwrap();
    assert_eq!(dates.len(), 2, "three same-day rows collapse to one date");
    // Newest first, YYYY-MM-DD shape.
    assert!(dates[0] > dates[1]);
    assert_eq!(dates[0].len(), 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn overdue_dedup_window(pool: PgPool) {
    let user = seed_user(&pool, "ada@chambers.test").await;
    let entity = EntityType::FundRequisition.as_str();
    let kind = NotificationType::FundOverdue.as_str();

    let cutoff = Utc::now() - Duration::hours(24);
    assert!(!NotificationRepo::exists_recent_for_entity(&pool, entity, 42, kind, cutoff)
        .await
        .unwrap());

    NotificationRepo::create(
        &pool,
        &CreateNotification {
            user_id: user,
            notification_type: kind.to_string(),
            message: "overdue".to_string(),
            entity_type: Some(entity.to_string()),
            entity_id: Some(42),
        },
    )
    .await
    .unwrap();

    assert!(NotificationRepo::exists_recent_for_entity(&pool, entity, 42, kind, cutoff)
        .await
        .unwrap());
    // A different requisition is unaffected.
    assert!(!NotificationRepo::exists_recent_for_entity(&pool, entity, 43, kind, cutoff)
        .await
        .unwrap());

    // Age the alert past the window.
    sqlx::query("UPDATE notifications SET created_at = NOW() - INTERVAL '25 hours' WHERE entity_id = 42")
        .execute(&pool)
        .await
        .unwrap();
    assert!(!NotificationRepo::exists_recent_for_entity(&pool, entity, 42, kind, cutoff)
        .await
        .unwrap());
}
