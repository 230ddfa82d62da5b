//! Integration tests for the PostgreSQL download ledger.
//!
//! Each test gets a fresh database with the workspace migrations applied.

use chrono::Utc;
use download::PgDownloadRepository;
use download::domain::entities::DownloadLogEntry;
use download::domain::repository::EntitlementRepository;
use kernel::id::{OrderId, ProductId, UserId};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// user-1 owns a completed order-1 for prod-1 with the given download limit.
async fn seed_purchase(pool: &PgPool, limit: i32) {
    sqlx::query("INSERT INTO users (user_id, email) VALUES ('user-1', 'one@example.com')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        r#"
        INSERT INTO products (product_id, name, file_name, file_location, download_limit)
        VALUES ('prod-1', 'Product One', 'prod-1.zip', 's3://bucket/prod-1.zip', $1)
        "#,
    )
    .bind(limit)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO orders (order_id, user_id, order_status) VALUES ('order-1', 'user-1', 'completed')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO order_items (order_id, product_id) VALUES ('order-1', 'prod-1')")
        .execute(pool)
        .await
        .unwrap();
}

fn entry() -> DownloadLogEntry {
    DownloadLogEntry::new(
        UserId::new("user-1"),
        ProductId::new("prod-1"),
        OrderId::new("order-1"),
        Some("203.0.113.9".parse().unwrap()),
        Some("integration-test".to_string()),
        Utc::now(),
    )
}

async fn log_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM download_logs")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Ledger tests
// ---------------------------------------------------------------------------

/// Twelve racing redemptions against a limit of three leave exactly three rows.
#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_concurrent_appends_respect_limit(pool: PgPool) {
    seed_purchase(&pool, 3).await;
    let repo = PgDownloadRepository::new(pool.clone());

    let mut handles = Vec::new();
    for _ in 0..12 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.append_download_within_limit(&entry()).await
        }));
    }

    let mut appended = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            appended += 1;
        }
    }

    assert_eq!(appended, 3);
    assert_eq!(log_rows(&pool).await, 3);
}

/// Sequential appends stop at the limit and the entitlement reports the count.
#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_append_stops_at_limit(pool: PgPool) {
    seed_purchase(&pool, 2).await;
    let repo = PgDownloadRepository::new(pool.clone());

    assert!(repo.append_download_within_limit(&entry()).await.unwrap());
    assert!(repo.append_download_within_limit(&entry()).await.unwrap());
    assert!(!repo.append_download_within_limit(&entry()).await.unwrap());

    let entitlement = repo
        .find_entitlement(&UserId::new("user-1"), &ProductId::new("prod-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entitlement.order_id, OrderId::new("order-1"));
    assert_eq!(entitlement.download_count, 2);
    assert_eq!(entitlement.download_limit, 2);
}

/// A product row that does not exist never gets a log row.
#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_append_for_unknown_product_is_refused(pool: PgPool) {
    let repo = PgDownloadRepository::new(pool.clone());

    let mut orphan = entry();
    orphan.product_id = ProductId::new("prod-missing");
    assert!(!repo.append_download_within_limit(&orphan).await.unwrap());
    assert_eq!(log_rows(&pool).await, 0);
}
