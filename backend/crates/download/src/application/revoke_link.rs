//! Revoke Download Link Use Case
//!
//! Lets the purchaser kill a leaked link before it expires. Only links that
//! verify are listed, so the denylist cannot be filled with garbage.

use crate::domain::entities::DownloadCapability;
use crate::domain::revocation::RevocationList;
use crate::domain::services::{TokenCodec, TokenRejection};
use crate::error::{DownloadError, DownloadResult};
use kernel::clock::Clock;
use kernel::id::UserId;
use std::sync::Arc;

pub struct RevokeDownloadLinkUseCase {
    codec: Arc<TokenCodec>,
    revocations: Arc<RevocationList>,
    clock: Arc<dyn Clock>,
}

impl RevokeDownloadLinkUseCase {
    pub fn new(
        codec: Arc<TokenCodec>,
        revocations: Arc<RevocationList>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            revocations,
            clock,
        }
    }

    pub fn execute(&self, user_id: &UserId, capability: &DownloadCapability) -> DownloadResult<()> {
        if &capability.user_id != user_id {
            return Err(DownloadError::TokenInvalid);
        }

        match self.codec.check(capability) {
            Ok(()) => {}
            // Nothing left to revoke
            Err(TokenRejection::Expired) => return Ok(()),
            Err(TokenRejection::Invalid) => return Err(DownloadError::TokenInvalid),
        }

        self.revocations.revoke(
            &capability.signature,
            capability.expires_at_ms,
            self.clock.now_ms(),
        );

        tracing::info!(
            user_id = %user_id,
            product_id = %capability.product_id,
            order_id = %capability.order_id,
            "Download link revoked"
        );

        Ok(())
    }
}
