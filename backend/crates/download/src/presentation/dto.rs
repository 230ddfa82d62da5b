//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// Response for POST /api/products/{productId}/download-link
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLinkResponse {
    pub url: String,
    pub token: String,
    /// Unix epoch milliseconds
    pub expires: i64,
}

/// Query for GET /api/products/download/{productId}
///
/// Every field is optional so a mangled link is answered as an invalid
/// token rather than a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RedeemQuery {
    pub token: Option<String>,
    pub order: Option<String>,
    pub expires: Option<String>,
}

/// Request for POST /api/products/{productId}/download-link/revoke
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeLinkRequest {
    pub token: String,
    pub order: String,
    pub expires: i64,
}

/// Response for GET /api/products/{productId}/entitlement
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    pub order_id: String,
    pub download_count: i64,
    pub download_limit: i64,
    pub remaining: i64,
}
