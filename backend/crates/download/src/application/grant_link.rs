//! Grant Download Link Use Case

use crate::application::config::DownloadConfig;
use crate::application::entitlement::EntitlementChecker;
use crate::domain::entities::DownloadLink;
use crate::domain::repository::EntitlementRepository;
use crate::domain::services::TokenCodec;
use crate::error::{DownloadError, DownloadResult};
use kernel::id::{ProductId, UserId};
use std::sync::Arc;

pub struct GrantDownloadLinkUseCase<R>
where
    R: EntitlementRepository,
{
    checker: EntitlementChecker<R>,
    codec: Arc<TokenCodec>,
    config: Arc<DownloadConfig>,
}

impl<R> GrantDownloadLinkUseCase<R>
where
    R: EntitlementRepository,
{
    pub fn new(
        checker: EntitlementChecker<R>,
        codec: Arc<TokenCodec>,
        config: Arc<DownloadConfig>,
    ) -> Self {
        Self {
            checker,
            codec,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> DownloadResult<DownloadLink> {
        let entitlement = self
            .checker
            .get_entitlement(user_id, product_id)
            .await?
            .ok_or(DownloadError::NotPurchased)?;

        if !entitlement.can_download() {
            tracing::info!(
                user_id = %user_id,
                product_id = %product_id,
                order_id = %entitlement.order_id,
                download_count = entitlement.download_count,
                download_limit = entitlement.download_limit,
                "Download link refused: limit reached"
            );
            return Err(DownloadError::LimitExceeded);
        }

        let link = self
            .codec
            .issue(product_id, &entitlement.order_id, user_id, self.config.link_ttl)
            .map_err(|_| {
                DownloadError::Internal(format!(
                    "order {} cannot be signed for user {}",
                    entitlement.order_id, user_id
                ))
            })?;

        tracing::info!(
            user_id = %user_id,
            product_id = %product_id,
            order_id = %entitlement.order_id,
            expires_at_ms = link.expires_at_ms,
            "Download link issued"
        );

        Ok(link)
    }
}
