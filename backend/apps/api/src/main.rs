//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod settings;

use auth::{
    PgResetRepository, PgSessionRepository, ResetTokenStore, SessionResolver,
    password_reset_router, spawn_reset_sweeper, with_session_principal,
};
use axum::{
    Extension, Router, http,
    http::{Method, header},
};
use download::{PgDownloadRepository, download_router};
use kernel::clock::SystemClock;
use platform::config::EnvReader;
use settings::Settings;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,download=info,auth=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing or short secrets stop the process here
    let settings = Settings::from_env(&EnvReader::process())?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let reset_repo = Arc::new(PgResetRepository::new(pool.clone()));
    let reset_store = Arc::new(ResetTokenStore::new(
        reset_repo.clone(),
        reset_repo,
        Arc::new(settings.reset.clone()),
        Arc::new(SystemClock),
    ));

    // Startup cleanup; errors here should not prevent server startup
    match reset_store.sweep_expired().await {
        Ok(deleted) => {
            tracing::info!(tokens_deleted = deleted, "Reset token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reset token cleanup failed, continuing anyway");
        }
    }
    let _sweeper = spawn_reset_sweeper(reset_store, settings.reset.sweep_interval);

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Download routes see the signed-in user through the session layer
    let sessions = SessionResolver::new(
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(settings.session),
        Arc::new(SystemClock),
    );
    let downloads = with_session_principal(
        download_router(PgDownloadRepository::new(pool.clone()), settings.download),
        sessions,
    );

    // Build router
    let api = Router::new()
        .merge(downloads)
        .merge(password_reset_router(
            PgResetRepository::new(pool),
            settings.reset,
        ));

    if settings.trusted_proxies.is_empty() {
        tracing::info!("No trusted proxies configured; client IPs come from the socket peer");
    }

    let app = Router::new()
        .nest("/api", api)
        .layer(Extension(settings.trusted_proxies))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
