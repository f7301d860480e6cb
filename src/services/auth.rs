//! Auth bridge: credential check plus role enrichment.
//!
//! A successful sign-in is followed by a profile lookup for the user's role.
//! That lookup can never fail a login; any error or empty result resolves to
//! [`DEFAULT_ROLE`].

use tracing::{debug, warn};

use super::identity::{AuthError, Credential, Identity, IdentityProvider};
use super::session::{SessionRecord, StoredSession};

pub const DEFAULT_ROLE: &str = "user";

/// Resolve the role for a verified identity, absorbing lookup failures.
pub async fn resolve_role(provider: &dyn IdentityProvider, identity: &Identity) -> String {
    match provider
        .fetch_role(&identity.id, identity.access_token.as_deref())
        .await
    {
        Ok(Some(role)) if !role.trim().is_empty() => role.trim().to_owned(),
        Ok(_) => {
            debug!(user_id = %identity.id, "no profile role; using default");
            DEFAULT_ROLE.to_owned()
        }
        Err(e) => {
            warn!(user_id = %identity.id, error = %e, "profile lookup failed; using default role");
            DEFAULT_ROLE.to_owned()
        }
    }
}

/// Verify `credential` and build the session to store for it.
///
/// # Errors
///
/// Returns the provider's [`AuthError`] when the credential check fails.
pub async fn authenticate(provider: &dyn IdentityProvider, credential: &Credential) -> Result<StoredSession, AuthError> {
    let identity = provider.sign_in_with_password(credential).await?;
    let role = resolve_role(provider, &identity).await;

    Ok(StoredSession {
        record: SessionRecord { id: identity.id, email: identity.email, role, permanent: true },
        access_token: identity.access_token,
    })
}

/// User-facing message for a failed login.
#[must_use]
pub fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials => "Invalid email or password".to_owned(),
        other => format!("Login error: {other}"),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
