//! Background sweep of old reset tokens

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::application::token_store::ResetTokenStore;
use crate::domain::repository::{ResetTokenRepository, UserRepository};

/// Run `sweep_expired` every `every`; failures are logged and the loop goes on.
pub fn spawn_reset_sweeper<U, T>(store: Arc<ResetTokenStore<U, T>>, every: Duration) -> JoinHandle<()>
where
    U: UserRepository + Send + Sync + 'static,
    T: ResetTokenRepository + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already swept
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = store.sweep_expired().await {
                tracing::warn!(error = %e, "Reset token sweep failed");
            }
        }
    })
}
