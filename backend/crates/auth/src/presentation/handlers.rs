//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::clock::Clock;
use std::sync::Arc;

use crate::application::config::ResetConfig;
use crate::application::{
    ConfirmResetInput, ConfirmResetUseCase, RequestResetUseCase, ResetNotifier, ResetTokenStore,
};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::error::ResetResult;
use crate::presentation::dto::{ConfirmResetRequest, ConfirmResetResponse, RequestResetRequest};

/// Shared state for password reset handlers
pub struct ResetAppState<R, N>
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<ResetConfig>,
    pub clock: Arc<dyn Clock>,
}

impl<R, N> Clone for ResetAppState<R, N>
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<R, N> ResetAppState<R, N>
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    pub fn store(&self) -> ResetTokenStore<R, R> {
        ResetTokenStore::new(
            self.repo.clone(),
            self.repo.clone(),
            self.config.clone(),
            self.clock.clone(),
        )
    }
}

/// POST /api/password-reset/request
///
/// Always 202. Unknown addresses, throttled requests and ledger faults are
/// indistinguishable to the caller.
pub async fn request_reset<R, N>(
    State(state): State<ResetAppState<R, N>>,
    Json(req): Json<RequestResetRequest>,
) -> StatusCode
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    let use_case = RequestResetUseCase::new(state.store(), state.notifier.clone());

    if let Err(e) = use_case.execute(&req.email).await {
        tracing::error!(error = %e, "Password reset request failed");
    }

    StatusCode::ACCEPTED
}

/// POST /api/password-reset/confirm
pub async fn confirm_reset<R, N>(
    State(state): State<ResetAppState<R, N>>,
    Json(req): Json<ConfirmResetRequest>,
) -> ResetResult<Json<ConfirmResetResponse>>
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    let use_case = ConfirmResetUseCase::new(state.store(), state.repo.clone());

    use_case
        .execute(ConfirmResetInput {
            token: req.token,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(ConfirmResetResponse { success: true }))
}
