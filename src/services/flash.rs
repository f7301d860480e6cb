//! One-shot flash messages carried across a redirect.
//!
//! Pending messages ride in a signed cookie so anonymous visitors (who have
//! no server-side session yet) can still be told why they were bounced to
//! the login page. The payload is hex-encoded JSON to keep the cookie value
//! free of separators.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use time::Duration;

use super::session::{bytes_to_hex, hex_to_bytes};

pub const FLASH_COOKIE: &str = "flash";

/// Upper bound on queued messages; older ones are dropped first.
const MAX_PENDING: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Level::Danger, message)
    }
}

#[must_use]
pub fn encode(flashes: &[Flash]) -> String {
    let json = serde_json::to_vec(flashes).unwrap_or_default();
    bytes_to_hex(&json)
}

/// Decode a cookie payload. Anything malformed decodes to no messages.
#[must_use]
pub fn decode(raw: &str) -> Vec<Flash> {
    hex_to_bytes(raw)
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn pending(jar: &SignedCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

fn flash_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Queue a message for the next rendered page. Identical pending messages
/// are not duplicated.
#[must_use]
pub fn push(jar: SignedCookieJar, flash: Flash, secure: bool) -> SignedCookieJar {
    let mut queued = pending(&jar);
    if queued.contains(&flash) {
        return jar;
    }
    queued.push(flash);
    if queued.len() > MAX_PENDING {
        queued.drain(..queued.len() - MAX_PENDING);
    }
    jar.add(flash_cookie(encode(&queued), secure))
}

/// Drain pending messages, expiring the cookie if there were any.
#[must_use]
pub fn take(jar: SignedCookieJar, secure: bool) -> (SignedCookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let queued = pending(&jar);
    let mut expired = flash_cookie(String::new(), secure);
    expired.set_max_age(Duration::ZERO);
    (jar.add(expired), queued)
}

#[cfg(test)]
#[path = "flash_test.rs"]
mod tests;
