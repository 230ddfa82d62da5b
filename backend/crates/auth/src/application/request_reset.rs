//! Request Reset Use Case
//!
//! The caller learns nothing about whether the address has an account:
//! unknown, throttled and successful requests all end the same way.

use std::sync::Arc;

use crate::application::notifier::ResetNotifier;
use crate::application::token_store::ResetTokenStore;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::error::ResetResult;

pub struct RequestResetUseCase<U, T, N>
where
    U: UserRepository,
    T: ResetTokenRepository,
    N: ResetNotifier,
{
    store: ResetTokenStore<U, T>,
    notifier: Arc<N>,
}

impl<U, T, N> RequestResetUseCase<U, T, N>
where
    U: UserRepository,
    T: ResetTokenRepository,
    N: ResetNotifier,
{
    pub fn new(store: ResetTokenStore<U, T>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub async fn execute(&self, email: &str) -> ResetResult<()> {
        let window = self.store.config().request_window_chrono();
        if self.store.has_recent_request(email, window).await {
            tracing::debug!("Reset request inside throttle window ignored");
            return Ok(());
        }

        let Some(user) = self.store.find_user(email).await? else {
            tracing::debug!("Reset requested for unknown address");
            return Ok(());
        };

        // At most one live token per account
        self.store.invalidate_all(&user.user_id).await?;
        let issued = self.store.create_for(&user).await?;

        if let Err(e) = self.notifier.send_reset(&user, &issued).await {
            tracing::error!(user_id = %user.user_id, error = %e, "Reset notification failed");
        }

        Ok(())
    }
}
