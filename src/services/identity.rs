//! External identity/profile service contract.
//!
//! DESIGN
//! ======
//! Login only depends on this trait, never on the backend's wire protocol.
//! `SupabaseClient` is the production implementation; tests plug in stubs.

use serde::Deserialize;

/// Email + password pair posted by the login form. Never stored.
#[derive(Clone, Default, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credential {
    /// True when either field is blank after trimming the email.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Verified user returned by a successful sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    /// Bearer token for follow-up calls (profile lookup, sign-out).
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service rejected the email/password pair.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// No backend URL/key configured; every login is rejected.
    #[error("authentication service is not configured")]
    NotConfigured,

    /// Transport-level failure talking to the service.
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a status or body we do not understand.
    #[error("unexpected response from authentication service (status {status})")]
    UnexpectedResponse { status: u16, body: String },

    /// The profile table could not be read. Callers fall back to the default role.
    #[error("profile lookup failed: {0}")]
    ProfileLookup(String),
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials, returning the user identity or a failure.
    async fn sign_in_with_password(&self, credential: &Credential) -> Result<Identity, AuthError>;

    /// Fetch the role stored in the profile table for `user_id`.
    /// `Ok(None)` means the lookup succeeded but found no row.
    async fn fetch_role(&self, user_id: &str, access_token: Option<&str>) -> Result<Option<String>, AuthError>;

    /// Revoke the access token on the service side.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
