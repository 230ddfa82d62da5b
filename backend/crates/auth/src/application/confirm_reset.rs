//! Confirm Reset Use Case
//!
//! verify -> password policy -> consume -> hash -> store -> invalidate rest.
//! The token is consumed before the password changes, so of two racing
//! confirmations only the winner writes a hash.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::token_store::ResetTokenStore;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::error::{ResetError, ResetResult};

pub struct ConfirmResetInput {
    pub token: String,
    pub new_password: String,
}

pub struct ConfirmResetUseCase<U, T>
where
    U: UserRepository,
    T: ResetTokenRepository,
{
    store: ResetTokenStore<U, T>,
    user_repo: Arc<U>,
}

impl<U, T> ConfirmResetUseCase<U, T>
where
    U: UserRepository,
    T: ResetTokenRepository,
{
    pub fn new(store: ResetTokenStore<U, T>, user_repo: Arc<U>) -> Self {
        Self { store, user_repo }
    }

    pub async fn execute(&self, input: ConfirmResetInput) -> ResetResult<()> {
        let user_id = self.store.verify(&input.token).await?;

        let password = ClearTextPassword::new(input.new_password)?;

        if !self.store.consume(&input.token).await? {
            tracing::warn!(user_id = %user_id, "Reset token consumed concurrently");
            return Err(ResetError::TokenAlreadyUsed);
        }

        let hash = self
            .store
            .config()
            .password_hashing
            .hash(&password)
            .map_err(|e| ResetError::Internal(e.to_string()))?;

        if !self.user_repo.update_password_hash(&user_id, &hash).await? {
            return Err(ResetError::UserNotFound);
        }

        self.store.invalidate_all(&user_id).await?;

        tracing::info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }
}
