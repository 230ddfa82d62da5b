//! Entitlement Status Use Case

use crate::application::entitlement::EntitlementChecker;
use crate::domain::entities::Entitlement;
use crate::domain::repository::EntitlementRepository;
use crate::error::{DownloadError, DownloadResult};
use kernel::id::{ProductId, UserId};

pub struct EntitlementStatusUseCase<R>
where
    R: EntitlementRepository,
{
    checker: EntitlementChecker<R>,
}

impl<R> EntitlementStatusUseCase<R>
where
    R: EntitlementRepository,
{
    pub fn new(checker: EntitlementChecker<R>) -> Self {
        Self { checker }
    }

    /// Read-only; never touches the download log.
    pub async fn execute(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> DownloadResult<Entitlement> {
        self.checker
            .get_entitlement(user_id, product_id)
            .await?
            .ok_or(DownloadError::NotPurchased)
    }
}
