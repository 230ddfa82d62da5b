//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, password_reset_token::PasswordResetToken, user::User,
};
use crate::domain::repository::{ResetTokenRepository, SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::ResetResult;

/// PostgreSQL-backed account and reset token repository
#[derive(Clone)]
pub struct PgResetRepository {
    pool: PgPool,
}

impl PgResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgResetRepository {
    async fn find_active_by_email(&self, email: &Email) -> ResetResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, deleted_at
            FROM users
            WHERE LOWER(email) = $1
              AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn update_password_hash(
        &self,
        user_id: &UserId,
        hash: &HashedPassword,
    ) -> ResetResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE user_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_str())
        .bind(hash.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Reset Token Repository Implementation
// ============================================================================

impl ResetTokenRepository for PgResetRepository {
    async fn insert(&self, token: &PasswordResetToken) -> ResetResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (
                password_reset_token_id,
                user_id,
                token,
                expires_at,
                used,
                created_at,
                used_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(token.id)
        .bind(token.user_id.as_str())
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .bind(token.used_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> ResetResult<Option<PasswordResetToken>> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            r#"
            SELECT
                password_reset_token_id,
                user_id,
                token,
                expires_at,
                used,
                created_at,
                used_at
            FROM password_reset_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResetTokenRow::into_token))
    }

    async fn mark_used(&self, token: &str, used_at: DateTime<Utc>) -> ResetResult<bool> {
        let flipped = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used = TRUE, used_at = $2
            WHERE token = $1 AND used = FALSE AND expires_at >= $2
            "#,
        )
        .bind(token)
        .bind(used_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(flipped == 1)
    }

    async fn mark_all_used(&self, user_id: &UserId, used_at: DateTime<Utc>) -> ResetResult<u64> {
        let count = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used = TRUE, used_at = $2
            WHERE user_id = $1 AND used = FALSE
            "#,
        )
        .bind(user_id.as_str())
        .bind(used_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(count)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> ResetResult<u64> {
        let deleted = sqlx::query("DELETE FROM password_reset_tokens WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn exists_for_email_since(
        &self,
        email: &Email,
        since: DateTime<Utc>,
    ) -> ResetResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM password_reset_tokens t
                JOIN users u ON u.user_id = t.user_id
                WHERE LOWER(u.email) = $1
                  AND t.created_at > $2
            )
            "#,
        )
        .bind(email.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

/// PostgreSQL-backed session lookup
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for PgSessionRepository {
    async fn find_session(&self, session_id: Uuid) -> ResetResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.session_id, s.user_id, s.expires_at
            FROM auth_sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.session_id = $1
              AND u.deleted_at IS NULL
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: String,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            user_id: UserId::new(self.user_id),
            expires_at: self.expires_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    email: String,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::new(self.user_id),
            email: Email::from_db(self.email),
            deleted_at: self.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResetTokenRow {
    password_reset_token_id: Uuid,
    user_id: String,
    token: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

impl ResetTokenRow {
    fn into_token(self) -> PasswordResetToken {
        PasswordResetToken {
            id: self.password_reset_token_id,
            user_id: UserId::new(self.user_id),
            token: self.token,
            expires_at: self.expires_at,
            used: self.used,
            created_at: self.created_at,
            used_at: self.used_at,
        }
    }
}
