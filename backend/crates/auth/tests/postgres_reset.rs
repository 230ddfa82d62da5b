//! Integration tests for the PostgreSQL reset token and session repositories.
//!
//! Each test gets a fresh database with the workspace migrations applied.

use auth::domain::entity::password_reset_token::PasswordResetToken;
use auth::domain::repository::{ResetTokenRepository, SessionRepository};
use auth::{PgResetRepository, PgSessionRepository};
use chrono::{Duration, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, user_id: &str) {
    sqlx::query("INSERT INTO users (user_id, email) VALUES ($1, $1 || '@example.com')")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Stores a fresh token for user-1 that expires after `ttl`.
async fn seed_token(repo: &PgResetRepository, token: &str, ttl: Duration) -> PasswordResetToken {
    let now = Utc::now();
    let record = PasswordResetToken {
        id: Uuid::new_v4(),
        user_id: UserId::new("user-1"),
        token: token.to_string(),
        expires_at: now + ttl,
        used: false,
        created_at: now,
        used_at: None,
    };
    repo.insert(&record).await.unwrap();
    record
}

// ---------------------------------------------------------------------------
// Reset token tests
// ---------------------------------------------------------------------------

/// Of many concurrent consumers exactly one flips the token.
#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_concurrent_mark_used_single_winner(pool: PgPool) {
    seed_user(&pool, "user-1").await;
    let repo = PgResetRepository::new(pool.clone());
    seed_token(&repo, "race-token", Duration::hours(1)).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.mark_used("race-token", Utc::now()).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    let stored = repo.find_by_token("race-token").await.unwrap().unwrap();
    assert!(stored.used);
    assert!(stored.used_at.is_some());
}

/// A token past its expiry cannot be consumed even if never used.
#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_mark_used_after_expiry_fails(pool: PgPool) {
    seed_user(&pool, "user-1").await;
    let repo = PgResetRepository::new(pool.clone());
    let record = seed_token(&repo, "late-token", Duration::hours(1)).await;

    let late = record.expires_at + Duration::seconds(1);
    assert!(!repo.mark_used("late-token", late).await.unwrap());
    assert!(!repo.find_by_token("late-token").await.unwrap().unwrap().used);

    let in_time = record.expires_at - Duration::seconds(1);
    assert!(repo.mark_used("late-token", in_time).await.unwrap());
}

// ---------------------------------------------------------------------------
// Session tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../../database/migrations")]
async fn test_find_session_skips_deleted_users(pool: PgPool) {
    seed_user(&pool, "user-1").await;
    seed_user(&pool, "user-gone").await;
    sqlx::query("UPDATE users SET deleted_at = NOW() WHERE user_id = 'user-gone'")
        .execute(&pool)
        .await
        .unwrap();

    let live = Uuid::new_v4();
    let orphaned = Uuid::new_v4();
    for (session_id, user_id) in [(live, "user-1"), (orphaned, "user-gone")] {
        sqlx::query(
            "INSERT INTO auth_sessions (session_id, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(Utc::now() + Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();
    }

    let repo = PgSessionRepository::new(pool);
    let session = repo.find_session(live).await.unwrap().unwrap();
    assert_eq!(session.user_id, UserId::new("user-1"));
    assert!(repo.find_session(orphaned).await.unwrap().is_none());
    assert!(repo.find_session(Uuid::new_v4()).await.unwrap().is_none());
}
