//! Repository Traits
//!
//! Interfaces for the purchase ledger. Implementation is in infrastructure layer.

use crate::domain::entities::{DownloadLogEntry, Entitlement, FileRef};
use crate::error::DownloadResult;
use kernel::id::{OrderId, ProductId, UserId};

/// Purchase ledger: orders, product limits and the download log
#[trait_variant::make(EntitlementRepository: Send)]
pub trait LocalEntitlementRepository {
    /// Most recent completed order containing the product, with its count
    async fn find_entitlement(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> DownloadResult<Option<Entitlement>>;

    /// Log rows for the exact (user, product, order) triple
    async fn count_downloads(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
    ) -> DownloadResult<i64>;

    /// Product's current download limit, `None` if the product is unknown
    async fn download_limit(&self, product_id: &ProductId) -> DownloadResult<Option<i64>>;

    /// Append unconditionally
    async fn append_download(&self, entry: &DownloadLogEntry) -> DownloadResult<()>;

    /// Append iff the triple's count is below the product's current limit.
    ///
    /// Check and append form one serialized ledger operation; returns
    /// whether a row was appended.
    async fn append_download_within_limit(&self, entry: &DownloadLogEntry)
    -> DownloadResult<bool>;
}

/// Product file lookup
#[trait_variant::make(ProductFileRepository: Send)]
pub trait LocalProductFileRepository {
    async fn find_file(&self, product_id: &ProductId) -> DownloadResult<Option<FileRef>>;
}
