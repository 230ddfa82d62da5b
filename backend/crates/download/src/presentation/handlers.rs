//! HTTP Handlers

use crate::application::config::DownloadConfig;
use crate::application::{
    EntitlementChecker, EntitlementStatusUseCase, GrantDownloadLinkUseCase, RedeemDownloadInput,
    RedeemDownloadUseCase, RevokeDownloadLinkUseCase,
};
use crate::domain::entities::DownloadCapability;
use crate::domain::repository::{EntitlementRepository, ProductFileRepository};
use crate::domain::revocation::RevocationList;
use crate::domain::services::TokenCodec;
use crate::error::{DownloadError, DownloadResult};
use crate::presentation::dto::{
    DownloadLinkResponse, EntitlementResponse, RedeemQuery, RevokeLinkRequest,
};
use crate::presentation::extract::{ClientMeta, CurrentUser};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use kernel::clock::Clock;
use kernel::id::{OrderId, ProductId, UserId};
use std::sync::Arc;

/// Shared state for download handlers
#[derive(Clone)]
pub struct DownloadAppState<R>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<DownloadConfig>,
    pub codec: Arc<TokenCodec>,
    pub revocations: Arc<RevocationList>,
    pub clock: Arc<dyn Clock>,
}

impl<R> DownloadAppState<R>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: DownloadConfig, clock: Arc<dyn Clock>) -> Self {
        let codec = TokenCodec::new(
            config.signing_secret.clone(),
            config.public_base_url.clone(),
            clock.clone(),
        );
        let revocations = RevocationList::new(config.revocation_capacity);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            codec: Arc::new(codec),
            revocations: Arc::new(revocations),
            clock,
        }
    }

    fn checker(&self) -> EntitlementChecker<R> {
        EntitlementChecker::new(self.repo.clone(), self.clock.clone())
    }
}

/// POST /api/products/{productId}/download-link
pub async fn grant_download_link<R>(
    State(state): State<DownloadAppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
) -> DownloadResult<Json<DownloadLinkResponse>>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    let use_case = GrantDownloadLinkUseCase::new(
        state.checker(),
        state.codec.clone(),
        state.config.clone(),
    );

    let link = use_case
        .execute(&user_id, &ProductId::new(product_id))
        .await?;

    Ok(Json(DownloadLinkResponse {
        url: link.url,
        token: link.token,
        expires: link.expires_at_ms,
    }))
}

/// GET /api/products/download/{productId}?token=..&order=..&expires=..
///
/// The link carries no user id; the signature only verifies for the
/// principal it was issued to.
pub async fn redeem_download<R>(
    State(state): State<DownloadAppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
    Query(query): Query<RedeemQuery>,
    ClientMeta(client): ClientMeta,
) -> DownloadResult<impl IntoResponse>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    let capability = capability_from_query(ProductId::new(product_id), user_id, query)?;

    let use_case = RedeemDownloadUseCase::new(
        state.repo.clone(),
        state.codec.clone(),
        state.revocations.clone(),
        state.clock.clone(),
    );

    let file = use_case
        .execute(RedeemDownloadInput { capability, client })
        .await?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, file.location),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
    ))
}

/// GET /api/products/{productId}/entitlement
pub async fn entitlement_status<R>(
    State(state): State<DownloadAppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
) -> DownloadResult<Json<EntitlementResponse>>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    let use_case = EntitlementStatusUseCase::new(state.checker());
    let entitlement = use_case
        .execute(&user_id, &ProductId::new(product_id))
        .await?;

    Ok(Json(EntitlementResponse {
        order_id: entitlement.order_id.to_string(),
        download_count: entitlement.download_count,
        download_limit: entitlement.download_limit,
        remaining: entitlement.remaining(),
    }))
}

/// POST /api/products/{productId}/download-link/revoke
pub async fn revoke_download_link<R>(
    State(state): State<DownloadAppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
    Json(req): Json<RevokeLinkRequest>,
) -> DownloadResult<StatusCode>
where
    R: EntitlementRepository + ProductFileRepository + Clone + Send + Sync + 'static,
{
    let capability = DownloadCapability {
        product_id: ProductId::new(product_id),
        order_id: OrderId::new(req.order),
        user_id: user_id.clone(),
        expires_at_ms: req.expires,
        signature: req.token,
    };

    let use_case = RevokeDownloadLinkUseCase::new(
        state.codec.clone(),
        state.revocations.clone(),
        state.clock.clone(),
    );
    use_case.execute(&user_id, &capability)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Missing or malformed link parts are an invalid token.
fn capability_from_query(
    product_id: ProductId,
    user_id: UserId,
    query: RedeemQuery,
) -> DownloadResult<DownloadCapability> {
    let token = query.token.filter(|t| !t.is_empty());
    let order = query.order.filter(|o| !o.is_empty());
    let expires = query.expires.and_then(|e| e.trim().parse::<i64>().ok());

    let (Some(signature), Some(order), Some(expires_at_ms)) = (token, order, expires) else {
        return Err(DownloadError::TokenInvalid);
    };

    Ok(DownloadCapability {
        product_id,
        order_id: OrderId::new(order),
        user_id,
        expires_at_ms,
        signature,
    })
}
