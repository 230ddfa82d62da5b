//! Session Middleware
//!
//! Resolves the caller's session credential to an [`AuthenticatedUser`]
//! in the request extensions. Requests without a valid session pass
//! through untouched; routes that need a principal reject them.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::credentials::{extract_bearer, extract_cookie};

use crate::application::session::SessionResolver;
use crate::domain::repository::SessionRepository;

/// Bearer token first, then the session cookie
pub async fn resolve_principal<S>(
    State(resolver): State<SessionResolver<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    S: SessionRepository + Send + Sync + 'static,
{
    let headers = req.headers();
    let token =
        extract_bearer(headers).or_else(|| extract_cookie(headers, resolver.cookie_name()));

    if let Some(token) = token {
        match resolver.resolve(&token).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => {
                tracing::debug!("Session credential rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, continuing unauthenticated");
            }
        }
    }

    next.run(req).await
}
