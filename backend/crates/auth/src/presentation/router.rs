//! Password Reset Router

use axum::{Router, middleware, routing::post};
use kernel::clock::{Clock, SystemClock};
use std::sync::Arc;

use crate::application::config::ResetConfig;
use crate::application::notifier::{ResetNotifier, TracingResetNotifier};
use crate::application::session::SessionResolver;
use crate::domain::repository::{ResetTokenRepository, SessionRepository, UserRepository};
use crate::infra::postgres::PgResetRepository;
use crate::presentation::handlers::{self, ResetAppState};
use crate::presentation::middleware::resolve_principal;

/// Create the password reset router with PostgreSQL repository
pub fn password_reset_router(repo: PgResetRepository, config: ResetConfig) -> Router {
    password_reset_router_generic(
        repo,
        TracingResetNotifier,
        config,
        Arc::new(SystemClock),
    )
}

/// Create a generic password reset router for any repository implementation
pub fn password_reset_router_generic<R, N>(
    repo: R,
    notifier: N,
    config: ResetConfig,
    clock: Arc<dyn Clock>,
) -> Router
where
    R: UserRepository + ResetTokenRepository + Clone + Send + Sync + 'static,
    N: ResetNotifier + Send + Sync + 'static,
{
    let state = ResetAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
        config: Arc::new(config),
        clock,
    };

    Router::new()
        .route(
            "/password-reset/request",
            post(handlers::request_reset::<R, N>),
        )
        .route(
            "/password-reset/confirm",
            post(handlers::confirm_reset::<R, N>),
        )
        .with_state(state)
}

/// Wrap `router` so its handlers see the session's [`kernel::principal::AuthenticatedUser`]
pub fn with_session_principal<S>(router: Router, resolver: SessionResolver<S>) -> Router
where
    S: SessionRepository + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(
        resolver,
        resolve_principal::<S>,
    ))
}
