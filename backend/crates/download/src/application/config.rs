//! Application Configuration
//!
//! Configuration for the download application layer.

use platform::config::SigningSecret;
use std::time::Duration;

/// Download application configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// HMAC key for download capabilities, fixed for the process lifetime
    pub signing_secret: SigningSecret,
    /// Public API base that download URLs are built on
    pub public_base_url: String,
    /// Lifetime of an issued link
    pub link_ttl: Duration,
    /// Maximum entries held by the revocation denylist
    pub revocation_capacity: usize,
}

impl DownloadConfig {
    pub const DEFAULT_LINK_TTL: Duration = Duration::from_secs(15 * 60);
    pub const DEFAULT_REVOCATION_CAPACITY: usize = 10_000;

    pub fn new(signing_secret: SigningSecret, public_base_url: impl Into<String>) -> Self {
        Self {
            signing_secret,
            public_base_url: public_base_url.into(),
            link_ttl: Self::DEFAULT_LINK_TTL,
            revocation_capacity: Self::DEFAULT_REVOCATION_CAPACITY,
        }
    }

    /// Create config for development (random secret, localhost URLs)
    pub fn development() -> Self {
        Self::new(SigningSecret::random(), "http://localhost:31113/api")
    }

    pub fn with_link_ttl(mut self, ttl: Duration) -> Self {
        self.link_ttl = ttl;
        self
    }
}
