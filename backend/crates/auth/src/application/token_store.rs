//! Reset Token Store
//!
//! Creates, verifies, consumes and garbage-collects password reset tokens.
//! One-time use is only reachable through [`ResetTokenStore::consume`].

use chrono::{DateTime, Utc};
use kernel::clock::Clock;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::ResetConfig;
use crate::domain::entity::{password_reset_token::PasswordResetToken, user::User};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{ResetError, ResetResult};

/// Token handed to the notifier. Never logged.
#[derive(Clone)]
pub struct IssuedResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
}

impl std::fmt::Debug for IssuedResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedResetToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user_id", &self.user_id)
            .finish()
    }
}

pub struct ResetTokenStore<U, T>
where
    U: UserRepository,
    T: ResetTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    config: Arc<ResetConfig>,
    clock: Arc<dyn Clock>,
}

impl<U, T> ResetTokenStore<U, T>
where
    U: UserRepository,
    T: ResetTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        config: Arc<ResetConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            config,
            clock,
        }
    }

    /// Active account for the address; malformed addresses match nothing.
    pub async fn find_user(&self, email: &str) -> ResetResult<Option<User>> {
        let Ok(email) = Email::new(email) else {
            return Ok(None);
        };
        let user = self.user_repo.find_active_by_email(&email).await?;
        Ok(user.filter(User::is_active))
    }

    /// Look up the account and issue a token, or `None` if there is no
    /// active account for the address.
    pub async fn create(&self, email: &str) -> ResetResult<Option<IssuedResetToken>> {
        match self.find_user(email).await? {
            Some(user) => self.create_for(&user).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn create_for(&self, user: &User) -> ResetResult<IssuedResetToken> {
        let token = platform::crypto::random_token(self.config.token_bytes);
        let record = PasswordResetToken::new(
            user.user_id.clone(),
            token.clone(),
            self.clock.now(),
            self.config.token_ttl_chrono(),
        );
        self.token_repo.insert(&record).await?;

        tracing::info!(
            user_id = %user.user_id,
            expires_at = %record.expires_at,
            "Password reset token created"
        );

        Ok(IssuedResetToken {
            token,
            expires_at: record.expires_at,
            user_id: record.user_id,
        })
    }

    /// Read-only check; returns the owner when the token is redeemable.
    pub async fn verify(&self, token: &str) -> ResetResult<UserId> {
        let record = self
            .token_repo
            .find_by_token(token)
            .await?
            .ok_or(ResetError::TokenInvalid)?;

        record.check_redeemable(self.clock.now())?;
        Ok(record.user_id)
    }

    /// Flip `used`; exactly one concurrent caller sees `true`.
    pub async fn consume(&self, token: &str) -> ResetResult<bool> {
        self.token_repo.mark_used(token, self.clock.now()).await
    }

    pub async fn invalidate_all(&self, user_id: &UserId) -> ResetResult<u64> {
        let count = self
            .token_repo
            .mark_all_used(user_id, self.clock.now())
            .await?;
        if count > 0 {
            tracing::info!(user_id = %user_id, count, "Outstanding reset tokens invalidated");
        }
        Ok(count)
    }

    /// Delete tokens older than the retention window, used or not.
    pub async fn sweep_expired(&self) -> ResetResult<u64> {
        let cutoff = self.clock.now() - self.config.retention_chrono();
        let deleted = self.token_repo.delete_created_before(cutoff).await?;
        tracing::info!(deleted, "Swept old password reset tokens");
        Ok(deleted)
    }

    /// Whether a token was issued for the address within `window`.
    ///
    /// Fails open: a ledger error answers `false`.
    pub async fn has_recent_request(&self, email: &str, window: chrono::Duration) -> bool {
        let Ok(email) = Email::new(email) else {
            return false;
        };
        let since = self.clock.now() - window;

        match self.token_repo.exists_for_email_since(&email, since).await {
            Ok(recent) => recent,
            Err(e) => {
                tracing::warn!(error = %e, "Reset throttle check failed, allowing request");
                false
            }
        }
    }

    pub fn config(&self) -> &ResetConfig {
        &self.config
    }
}
