//! Redeem Download Use Case

use crate::application::entitlement::EntitlementChecker;
use crate::domain::entities::{DownloadCapability, FileRef};
use crate::domain::repository::{EntitlementRepository, ProductFileRepository};
use crate::domain::revocation::RevocationList;
use crate::domain::services::{TokenCodec, TokenRejection};
use crate::error::{DownloadError, DownloadResult};
use kernel::clock::Clock;
use platform::client::ClientInfo;
use std::sync::Arc;

/// Input DTO for redemption
#[derive(Debug, Clone)]
pub struct RedeemDownloadInput {
    pub capability: DownloadCapability,
    pub client: ClientInfo,
}

pub struct RedeemDownloadUseCase<R>
where
    R: EntitlementRepository + ProductFileRepository,
{
    repo: Arc<R>,
    checker: EntitlementChecker<R>,
    codec: Arc<TokenCodec>,
    revocations: Arc<RevocationList>,
    clock: Arc<dyn Clock>,
}

impl<R> RedeemDownloadUseCase<R>
where
    R: EntitlementRepository + ProductFileRepository,
{
    pub fn new(
        repo: Arc<R>,
        codec: Arc<TokenCodec>,
        revocations: Arc<RevocationList>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            checker: EntitlementChecker::new(repo.clone(), clock.clone()),
            repo,
            codec,
            revocations,
            clock,
        }
    }

    /// Verify, then record within the limit, then hand back the file.
    pub async fn execute(&self, input: RedeemDownloadInput) -> DownloadResult<FileRef> {
        let cap = &input.capability;

        self.codec.check(cap).map_err(|rejection| match rejection {
            TokenRejection::Expired => DownloadError::TokenExpired,
            TokenRejection::Invalid => DownloadError::TokenInvalid,
        })?;

        if self.revocations.is_revoked(&cap.signature, self.clock.now_ms()) {
            tracing::warn!(
                product_id = %cap.product_id,
                order_id = %cap.order_id,
                "Revoked download link presented"
            );
            return Err(DownloadError::TokenInvalid);
        }

        // Resolve the file before counting so a missing file costs no quota
        let file = self
            .repo
            .find_file(&cap.product_id)
            .await?
            .ok_or(DownloadError::FileNotFound)?;

        let recorded = self
            .checker
            .record_download_within_limit(&cap.user_id, &cap.product_id, &cap.order_id, &input.client)
            .await?;

        if !recorded {
            tracing::info!(
                user_id = %cap.user_id,
                product_id = %cap.product_id,
                order_id = %cap.order_id,
                "Download refused: limit reached"
            );
            return Err(DownloadError::LimitExceeded);
        }

        tracing::info!(
            user_id = %cap.user_id,
            product_id = %cap.product_id,
            order_id = %cap.order_id,
            "Download recorded"
        );

        Ok(file)
    }
}
