//! Startup Configuration
//!
//! Environment-backed configuration primitives. Every value is read once at
//! process start and passed by reference into the components that need it;
//! no component reads the environment at call time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use zeroize::Zeroizing;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{key} must be at least {min} bytes (got {actual})")]
    SecretTooShort {
        key: &'static str,
        min: usize,
        actual: usize,
    },
}

/// Server-held HMAC key
///
/// Immutable once built; the bytes are zeroized on drop and never printed.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key material, enforcing [`MIN_SECRET_LEN`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        Self::checked("signing secret", bytes.into())
    }

    fn checked(key: &'static str, bytes: Vec<u8>) -> Result<Self, ConfigError> {
        if bytes.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort {
                key,
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    /// Random secret for development and tests
    pub fn random() -> Self {
        Self(Zeroizing::new(crate::crypto::random_bytes(MIN_SECRET_LEN)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"[REDACTED]").finish()
    }
}

/// Typed reader over an environment-like key/value source.
pub struct EnvReader<F> {
    lookup: F,
}

impl EnvReader<fn(&str) -> Option<String>> {
    /// Reader over the process environment
    pub fn process() -> Self {
        Self {
            lookup: |key: &str| std::env::var(key).ok(),
        }
    }
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Reader over an arbitrary source (tests)
    pub fn from_fn(lookup: F) -> Self {
        Self { lookup }
    }

    /// Non-empty value, or `None`
    pub fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    pub fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    pub fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// Required signing secret; absence fails startup, never defaults.
    pub fn signing_secret(&self, key: &'static str) -> Result<SigningSecret, ConfigError> {
        let raw = self.required(key)?;
        SigningSecret::checked(key, raw.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reader(pairs: &[(&str, &str)]) -> EnvReader<impl Fn(&str) -> Option<String> + use<>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvReader::from_fn(move |key: &str| map.get(key).cloned())
    }

    #[test]
    fn test_missing_secret_fails() {
        let env = reader(&[]);
        assert_eq!(
            env.signing_secret("DOWNLOAD_TOKEN_SECRET").unwrap_err(),
            ConfigError::Missing("DOWNLOAD_TOKEN_SECRET")
        );
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let env = reader(&[("DOWNLOAD_TOKEN_SECRET", "   ")]);
        assert!(matches!(
            env.signing_secret("DOWNLOAD_TOKEN_SECRET"),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_short_secret_fails() {
        let env = reader(&[("DOWNLOAD_TOKEN_SECRET", "too-short")]);
        assert!(matches!(
            env.signing_secret("DOWNLOAD_TOKEN_SECRET"),
            Err(ConfigError::SecretTooShort { actual: 9, .. })
        ));
    }

    #[test]
    fn test_valid_secret() {
        let value = "k".repeat(48);
        let env = reader(&[("DOWNLOAD_TOKEN_SECRET", value.as_str())]);
        let secret = env.signing_secret("DOWNLOAD_TOKEN_SECRET").unwrap();
        assert_eq!(secret.as_bytes().len(), 48);
        assert!(!format!("{:?}", secret).contains("kkkk"));
    }

    #[test]
    fn test_parse_or() {
        let env = reader(&[("DOWNLOAD_LINK_TTL_SECS", "60"), ("BROKEN", "abc")]);
        assert_eq!(env.parse_or("DOWNLOAD_LINK_TTL_SECS", 900u64).unwrap(), 60);
        assert_eq!(env.parse_or("UNSET", 900u64).unwrap(), 900);
        assert!(matches!(
            env.parse_or("BROKEN", 1u64),
            Err(ConfigError::Invalid { key: "BROKEN", .. })
        ));
    }

    #[test]
    fn test_random_secrets_differ() {
        assert_ne!(
            SigningSecret::random().as_bytes(),
            SigningSecret::random().as_bytes()
        );
    }
}
