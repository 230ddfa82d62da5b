//! Application Configuration
//!
//! Configuration for the password reset and session layers.

use platform::config::SigningSecret;
use platform::password::PasswordHashing;
use std::time::Duration;

/// Password reset configuration
#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// Lifetime of a reset token
    pub token_ttl: Duration,
    /// Rows older than this are swept regardless of state
    pub retention: Duration,
    /// Second request for the same email inside this window is ignored
    pub request_window: Duration,
    /// Random bytes per token before base64url encoding
    pub token_bytes: usize,
    /// Interval of the background sweep
    pub sweep_interval: Duration,
    /// Argon2id parameters and pepper for the new password
    pub password_hashing: PasswordHashing,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(3600),
            retention: Duration::from_secs(24 * 3600),
            request_window: Duration::from_secs(5 * 60),
            token_bytes: 32,
            sweep_interval: Duration::from_secs(3600),
            password_hashing: PasswordHashing::default(),
        }
    }
}

impl ResetConfig {
    pub fn with_pepper(mut self, pepper: Option<String>) -> Self {
        if let Some(pepper) = pepper {
            self.password_hashing = self.password_hashing.with_pepper(pepper.into_bytes());
        }
        self
    }

    pub fn token_ttl_chrono(&self) -> chrono::Duration {
        to_chrono(self.token_ttl)
    }

    pub fn retention_chrono(&self) -> chrono::Duration {
        to_chrono(self.retention)
    }

    pub fn request_window_chrono(&self) -> chrono::Duration {
        to_chrono(self.request_window)
    }
}

/// Session cookie name used when none is configured
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Session resolution configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key over the session id in `{session_id}.{signature}`
    pub session_secret: SigningSecret,
    pub cookie_name: String,
}

impl SessionConfig {
    pub fn new(session_secret: SigningSecret) -> Self {
        Self {
            session_secret,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::MAX)
}
