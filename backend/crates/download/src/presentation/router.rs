//! Download Router

use crate::application::config::DownloadConfig;
use crate::domain::repository::{EntitlementRepository, ProductFileRepository};
use crate::infra::postgres::PgDownloadRepository;
use crate::presentation::handlers::{self, DownloadAppState};
use axum::{
    Router,
    routing::{get, post},
};
use kernel::clock::{Clock, SystemClock};
use std::sync::Arc;

/// Create the download router with PostgreSQL repository
pub fn download_router(repo: PgDownloadRepository, config: DownloadConfig) -> Router {
    download_router_generic(repo, config, Arc::new(SystemClock))
}

/// Create a generic download router for any repository implementation
pub fn download_router_generic<R>(repo: R, config: DownloadConfig, clock: Arc<dyn Clock>) -> Router
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    routes(DownloadAppState::new(repo, config, clock))
}

/// Routes over an already built state (shares its codec and denylist)
pub fn routes<R>(state: DownloadAppState<R>) -> Router
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/products/{product_id}/download-link",
            post(handlers::grant_download_link::<R>),
        )
        .route(
            "/products/{product_id}/download-link/revoke",
            post(handlers::revoke_download_link::<R>),
        )
        .route(
            "/products/{product_id}/entitlement",
            get(handlers::entitlement_status::<R>),
        )
        .route(
            "/products/download/{product_id}",
            get(handlers::redeem_download::<R>),
        )
        .with_state(state)
}
