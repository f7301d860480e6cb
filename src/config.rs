//! Startup configuration parsed from environment variables.
//!
//! A `.env` file is loaded first (see `main`), so every key below may come
//! from either source. Missing backend settings are not fatal: the service
//! starts with logins disabled.

use std::path::PathBuf;
use std::time::Duration;

use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_PURGE_INTERVAL_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

/// Location and public key of the managed backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    /// Load from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    /// Returns `None` if either is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = env_non_empty("SUPABASE_URL")?;
        let anon_key = env_non_empty("SUPABASE_ANON_KEY")?;
        Some(Self { url: url.trim_end_matches('/').to_owned(), anon_key })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub backend: Option<BackendConfig>,
    /// Cookie signing secret. `None` means a random per-process secret.
    pub session_secret: Option<String>,
    pub cookie_secure: bool,
    pub template_dir: Option<PathBuf>,
    pub purge_interval: Duration,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SUPABASE_URL` / `SUPABASE_ANON_KEY`: both required to enable logins
    /// - `SESSION_SECRET`: cookie signing secret
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: default false
    /// - `TEMPLATE_DIR`: directory of template overrides
    /// - `SESSION_PURGE_INTERVAL_SECS`: default 300
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env_non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            backend: BackendConfig::from_env(),
            session_secret: env_non_empty("SESSION_SECRET"),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            template_dir: env_non_empty("TEMPLATE_DIR").map(PathBuf::from),
            purge_interval: Duration::from_secs(
                env_parse("SESSION_PURGE_INTERVAL_SECS", DEFAULT_SESSION_PURGE_INTERVAL_SECS).max(1),
            ),
        })
    }
}

/// Derive the 64-byte cookie signing key from an arbitrary-length secret.
#[must_use]
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
