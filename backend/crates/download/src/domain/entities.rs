//! Domain Entities
//!
//! Core business entities for the download domain.

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, UserId};
use std::net::IpAddr;
use uuid::Uuid;

/// Stateless capability: "user may fetch product under order until expiry".
///
/// Never stored. Valid iff the signature verifies over the exact presented
/// fields with the current secret and the expiry has not passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCapability {
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub expires_at_ms: i64,
    /// Base64url (no padding) HMAC-SHA256 over the canonical payload
    pub signature: String,
}

/// Issued link handed back to the purchaser
#[derive(Debug, Clone)]
pub struct DownloadLink {
    pub url: String,
    pub token: String,
    pub order_id: OrderId,
    pub expires_at_ms: i64,
}

/// Derived view over orders, order items and the download log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Most recent completed order containing the product
    pub order_id: OrderId,
    pub purchased_at: DateTime<Utc>,
    pub download_count: i64,
    /// Read from the product at query time
    pub download_limit: i64,
}

impl Entitlement {
    pub fn can_download(&self) -> bool {
        self.download_count < self.download_limit
    }

    pub fn remaining(&self) -> i64 {
        (self.download_limit - self.download_count).max(0)
    }
}

/// Append-only audit row, one per authorized download
#[derive(Debug, Clone)]
pub struct DownloadLogEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub ip_address: Option<IpAddr>,
    pub user_agent: Option<String>,
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadLogEntry {
    pub fn new(
        user_id: UserId,
        product_id: ProductId,
        order_id: OrderId,
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
        downloaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            order_id,
            ip_address,
            user_agent,
            downloaded_at,
        }
    }
}

/// Reference to a product's stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub product_id: ProductId,
    pub file_name: String,
    pub location: String,
}
