//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and middleware via the `State`
//! extractor. Every collaborator sits behind a trait object so tests can
//! swap the identity service, session store, or renderer without touching
//! handler code. There is no other process-wide mutable state.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::render::PageRenderer;
use crate::services::identity::IdentityProvider;
use crate::services::session::SessionStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped or cheap.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    /// `None` when the backend is not configured; every login is then rejected.
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub renderer: Arc<dyn PageRenderer>,
    pub cookie_key: Key,
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        identity: Option<Arc<dyn IdentityProvider>>,
        renderer: Arc<dyn PageRenderer>,
        cookie_key: Key,
        cookie_secure: bool,
    ) -> Self {
        Self { sessions, identity, renderer, cookie_key, cookie_secure }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
