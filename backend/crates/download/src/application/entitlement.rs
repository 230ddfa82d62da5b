//! Entitlement Checker
//!
//! Answers "has this user bought the product, and how many downloads are
//! left" from the purchase ledger, and appends download log rows.

use crate::domain::entities::{DownloadLogEntry, Entitlement};
use crate::domain::repository::EntitlementRepository;
use crate::error::DownloadResult;
use kernel::clock::Clock;
use kernel::id::{OrderId, ProductId, UserId};
use platform::client::ClientInfo;
use std::sync::Arc;

pub struct EntitlementChecker<R>
where
    R: EntitlementRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> EntitlementChecker<R>
where
    R: EntitlementRepository,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Most recent completed order containing the product, if any
    pub async fn get_entitlement(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> DownloadResult<Option<Entitlement>> {
        self.repo.find_entitlement(user_id, product_id).await
    }

    /// Limit is read at call time; an unknown product counts as exhausted.
    pub async fn has_exceeded_limit(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
    ) -> DownloadResult<bool> {
        let Some(limit) = self.repo.download_limit(product_id).await? else {
            return Ok(true);
        };
        let count = self
            .repo
            .count_downloads(user_id, product_id, order_id)
            .await?;
        Ok(count >= limit)
    }

    /// Append one log row. Not idempotent.
    pub async fn record_download(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
        client: &ClientInfo,
    ) -> DownloadResult<DownloadLogEntry> {
        let entry = self.entry(user_id, product_id, order_id, client);
        self.repo.append_download(&entry).await?;
        Ok(entry)
    }

    /// Check-and-append as one ledger operation; true if a row was appended.
    pub async fn record_download_within_limit(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
        client: &ClientInfo,
    ) -> DownloadResult<bool> {
        let entry = self.entry(user_id, product_id, order_id, client);
        self.repo.append_download_within_limit(&entry).await
    }

    fn entry(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
        client: &ClientInfo,
    ) -> DownloadLogEntry {
        DownloadLogEntry::new(
            user_id.clone(),
            product_id.clone(),
            order_id.clone(),
            client.ip,
            client.user_agent.clone(),
            self.clock.now(),
        )
    }
}
