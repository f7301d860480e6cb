//! Session tokens and the server-side session store.
//!
//! ARCHITECTURE
//! ============
//! The browser only ever holds an opaque random token inside a signed cookie.
//! The record it points at lives behind the `SessionStore` trait, which is
//! injected through `AppState` so handlers never reach for process globals.
//!
//! EXPIRY
//! ======
//! Login-created records are "permanent": they carry a one-day lifetime that
//! slides forward on every successful lookup. Expired entries are never
//! returned; they are dropped on access and by the periodic purge task.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Lifetime of a permanent session, refreshed on each authenticated request.
pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Inverse of [`bytes_to_hex`]. Returns `None` on odd length or non-hex input.
pub(crate) fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Proof of authentication for one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// Opaque user identifier issued by the identity service.
    pub id: String,
    pub email: String,
    pub role: String,
    /// Fixed lifetime of [`SESSION_LIFETIME`], refreshed on use.
    pub permanent: bool,
}

/// A record plus the identity-service token needed to revoke it on logout.
#[derive(Clone)]
pub struct StoredSession {
    pub record: SessionRecord,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("record", &self.record)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Token-keyed session storage.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a live record, extending its expiry. Expired records are removed.
    async fn get(&self, token: &str) -> Option<SessionRecord>;

    /// Insert or replace the session stored under `token`.
    async fn set(&self, token: &str, session: StoredSession);

    /// Remove the session under `token`, returning it if it was still live.
    async fn clear(&self, token: &str) -> Option<StoredSession>;

    /// Drop every expired entry, returning how many were removed.
    async fn purge_expired(&self) -> usize;
}

struct Entry {
    session: StoredSession,
    expires_at: Instant,
}

/// In-process session store. Each token is independent, so a single map lock
/// is the only synchronization needed.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    lifetime: Duration,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_lifetime(SESSION_LIFETIME)
    }

    #[must_use]
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self { entries: RwLock::new(HashMap::new()), lifetime }
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub(crate) async fn get_at(&self, token: &str, now: Instant) -> Option<SessionRecord> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(token)?;
        if entry.expires_at <= now {
            entries.remove(token);
            debug!("expired session dropped on access");
            return None;
        }
        if entry.session.record.permanent {
            entry.expires_at = now + self.lifetime;
        }
        Some(entry.session.record.clone())
    }

    pub(crate) async fn set_at(&self, token: &str, session: StoredSession, now: Instant) {
        let entry = Entry { session, expires_at: now + self.lifetime };
        self.entries.write().await.insert(token.to_owned(), entry);
    }

    pub(crate) async fn clear_at(&self, token: &str, now: Instant) -> Option<StoredSession> {
        let entry = self.entries.write().await.remove(token)?;
        (entry.expires_at > now).then_some(entry.session)
    }

    pub(crate) async fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Option<SessionRecord> {
        self.get_at(token, Instant::now()).await
    }

    async fn set(&self, token: &str, session: StoredSession) {
        self.set_at(token, session, Instant::now()).await;
    }

    async fn clear(&self, token: &str) -> Option<StoredSession> {
        self.clear_at(token, Instant::now()).await
    }

    async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now()).await
    }
}

/// Spawn the background task that evicts expired sessions every `interval`.
pub fn spawn_purge_task(store: Arc<dyn SessionStore>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "session purge configured");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = store.purge_expired().await;
            if removed > 0 {
                debug!(removed, "purged expired sessions");
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
