//! Request extractors

use crate::error::DownloadError;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use kernel::id::UserId;
use kernel::principal::AuthenticatedUser;
use platform::client::{ClientInfo, TrustedProxies, extract_client_info};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Principal placed in the request extensions by the auth layer.
///
/// Rejects with 401 when no principal is present.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = DownloadError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|user| CurrentUser(user.user_id.clone()))
            .ok_or(DownloadError::Unauthenticated)
    }
}

/// Client IP and User-Agent for the download log.
///
/// Forwarding headers are believed only for peers listed in a
/// [`TrustedProxies`] extension. Never rejects; fields are absent when unknown.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        let proxies = parts
            .extensions
            .get::<TrustedProxies>()
            .cloned()
            .unwrap_or_default();

        Ok(ClientMeta(extract_client_info(
            &parts.headers,
            direct_ip,
            &proxies,
        )))
    }
}
