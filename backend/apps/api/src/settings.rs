//! Process Settings
//!
//! Everything the binary reads from the environment, resolved once before
//! the server starts.

use auth::{ResetConfig, SessionConfig};
use download::DownloadConfig;
use platform::client::TrustedProxies;
use platform::config::{ConfigError, EnvReader};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:31113/api";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Peers whose X-Forwarded-For / X-Real-IP headers are believed
    pub trusted_proxies: TrustedProxies,
    pub download: DownloadConfig,
    pub reset: ResetConfig,
    pub session: SessionConfig,
}

impl Settings {
    pub fn from_env<F>(env: &EnvReader<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = env.required("DATABASE_URL")?;
        let bind_addr = env.parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?;

        let frontend_origins = env
            .optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let trusted_proxies = TrustedProxies::parse(
            &env.optional("TRUSTED_PROXIES").unwrap_or_default(),
        )
        .map_err(|e| ConfigError::Invalid {
            key: "TRUSTED_PROXIES",
            reason: e.to_string(),
        })?;

        let signing_secret = env.signing_secret("DOWNLOAD_TOKEN_SECRET")?;
        let public_base_url = env
            .optional("PUBLIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());
        let link_ttl_secs = env.parse_or("DOWNLOAD_LINK_TTL_SECS", 900u64)?;
        if link_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "DOWNLOAD_LINK_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }
        let download = DownloadConfig::new(signing_secret, public_base_url)
            .with_link_ttl(Duration::from_secs(link_ttl_secs));

        let sweep_secs = env.parse_or("RESET_SWEEP_INTERVAL_SECS", 3600u64)?;
        let reset = ResetConfig {
            sweep_interval: Duration::from_secs(sweep_secs.max(1)),
            ..ResetConfig::default()
        }
        .with_pepper(env.optional("PASSWORD_PEPPER"));

        let mut session = SessionConfig::new(env.signing_secret("SESSION_TOKEN_SECRET")?);
        if let Some(name) = env.optional("SESSION_COOKIE_NAME") {
            session = session.with_cookie_name(name);
        }

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            trusted_proxies,
            download,
            reset,
            session,
        })
    }
}
