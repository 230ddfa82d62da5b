//! Domain Services
//!
//! Token codec for stateless download capabilities.

use crate::domain::entities::{DownloadCapability, DownloadLink};
use kernel::clock::Clock;
use kernel::id::{OrderId, ProductId, UserId};
use platform::config::SigningSecret;
use platform::crypto::{constant_time_eq, hmac_sha256, to_base64url};
use std::sync::Arc;
use std::time::Duration;

/// Joins the signed fields; ids containing it are never signed or accepted.
pub const FIELD_SEPARATOR: char = ':';

/// Why a presented capability was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Signature does not match the presented fields, or a field is unsignable
    Invalid,
    /// Signature matches but the expiry has passed
    Expired,
}

/// Signs and verifies download capabilities.
///
/// Pure apart from the injected clock: output depends only on the inputs,
/// the current time and the secret held at construction.
pub struct TokenCodec {
    secret: SigningSecret,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: SigningSecret, base_url: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            secret,
            base_url,
            clock,
        }
    }

    /// `productId:orderId:userId:expiresAtMillis`
    pub fn canonical_payload(
        product_id: &ProductId,
        order_id: &OrderId,
        user_id: &UserId,
        expires_at_ms: i64,
    ) -> String {
        format!("{}:{}:{}:{}", product_id, order_id, user_id, expires_at_ms)
    }

    fn sign(&self, payload: &str) -> String {
        to_base64url(&hmac_sha256(self.secret.as_bytes(), payload.as_bytes()))
    }

    /// Whether every id can sit in the payload without shifting field boundaries
    pub fn is_signable(product_id: &ProductId, order_id: &OrderId, user_id: &UserId) -> bool {
        [product_id.as_str(), order_id.as_str(), user_id.as_str()]
            .iter()
            .all(|id| !id.contains(FIELD_SEPARATOR))
    }

    /// Issue a link valid for `ttl` from now.
    ///
    /// Refuses ids containing [`FIELD_SEPARATOR`].
    pub fn issue(
        &self,
        product_id: &ProductId,
        order_id: &OrderId,
        user_id: &UserId,
        ttl: Duration,
    ) -> Result<DownloadLink, TokenRejection> {
        if !Self::is_signable(product_id, order_id, user_id) {
            return Err(TokenRejection::Invalid);
        }

        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at_ms = self.clock.now_ms().saturating_add(ttl_ms);
        let token = self.sign(&Self::canonical_payload(
            product_id,
            order_id,
            user_id,
            expires_at_ms,
        ));

        Ok(DownloadLink {
            url: self.download_url(product_id, order_id, &token, expires_at_ms),
            token,
            order_id: order_id.clone(),
            expires_at_ms,
        })
    }

    /// Signature first, then expiry, so a forged expiry reads as invalid.
    pub fn check(&self, capability: &DownloadCapability) -> Result<(), TokenRejection> {
        if !Self::is_signable(
            &capability.product_id,
            &capability.order_id,
            &capability.user_id,
        ) {
            return Err(TokenRejection::Invalid);
        }

        let expected = self.sign(&Self::canonical_payload(
            &capability.product_id,
            &capability.order_id,
            &capability.user_id,
            capability.expires_at_ms,
        ));

        if !constant_time_eq(expected.as_bytes(), capability.signature.as_bytes()) {
            return Err(TokenRejection::Invalid);
        }

        if self.clock.now_ms() > capability.expires_at_ms {
            return Err(TokenRejection::Expired);
        }

        Ok(())
    }

    pub fn verify(&self, capability: &DownloadCapability) -> bool {
        self.check(capability).is_ok()
    }

    /// `{base}/products/download/{productId}?token=..&order=..&expires=..`
    pub fn download_url(
        &self,
        product_id: &ProductId,
        order_id: &OrderId,
        token: &str,
        expires_at_ms: i64,
    ) -> String {
        format!(
            "{}/products/download/{}?token={}&order={}&expires={}",
            self.base_url,
            urlencoding::encode(product_id.as_str()),
            urlencoding::encode(token),
            urlencoding::encode(order_id.as_str()),
            expires_at_ms
        )
    }
}
