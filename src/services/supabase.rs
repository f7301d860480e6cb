//! Supabase-style backend client: GoTrue password grant, PostgREST profile
//! lookup, and token revocation.
//!
//! Thin HTTP wrapper; response parsing lives in pure functions for
//! testability. No retries and no timeouts: a slow backend stalls only the
//! request that is waiting on it.

use reqwest::StatusCode;
use serde::Deserialize;

use super::identity::{AuthError, Credential, Identity, IdentityProvider};
use crate::config::BackendConfig;

const PROFILE_TABLE: &str = "profiles";

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/auth/v1/token?grant_type=password", self.base_url)
    }

    fn logout_url(&self) -> String {
        format!("{}/auth/v1/logout", self.base_url)
    }

    fn profile_url(&self, user_id: &str) -> Result<reqwest::Url, AuthError> {
        let base = format!("{}/rest/v1/{PROFILE_TABLE}", self.base_url);
        let filter = format!("eq.{user_id}");
        reqwest::Url::parse_with_params(&base, &[("select", "role"), ("id", filter.as_str())])
            .map_err(|e| AuthError::ProfileLookup(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in_with_password(&self, credential: &Credential) -> Result<Identity, AuthError> {
        let response = self
            .http
            .post(self.token_url())
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": credential.email.trim(),
                "password": credential.password,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        if status.is_success() {
            return parse_token_response(&body, credential.email.trim());
        }
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) && is_invalid_credentials(&body) {
            return Err(AuthError::InvalidCredentials);
        }
        Err(AuthError::UnexpectedResponse { status: status.as_u16(), body })
    }

    async fn fetch_role(&self, user_id: &str, access_token: Option<&str>) -> Result<Option<String>, AuthError> {
        let bearer = access_token.unwrap_or(&self.anon_key);
        let response = self
            .http
            .get(self.profile_url(user_id)?)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AuthError::ProfileLookup(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ProfileLookup(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::ProfileLookup(format!("{status}: {body}")));
        }
        parse_profile_rows(&body)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.logout_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::UnexpectedResponse { status: status.as_u16(), body })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorPayload {
    error_code: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a successful password-grant body. `fallback_email` is used when the
/// service omits the user's email.
fn parse_token_response(body: &str, fallback_email: &str) -> Result<Identity, AuthError> {
    let token: TokenResponse = serde_json::from_str(body).map_err(|e| AuthError::UnexpectedResponse {
        status: 200,
        body: format!("unparseable token response: {e}"),
    })?;

    let email = token
        .user
        .email
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback_email.to_owned());

    Ok(Identity { id: token.user.id, email, access_token: Some(token.access_token) })
}

/// Whether an error body means "wrong email or password" as opposed to any
/// other rejection (rate limit, unconfirmed email, ...).
fn is_invalid_credentials(body: &str) -> bool {
    let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
    if payload.error_code.as_deref() == Some("invalid_credentials") {
        return true;
    }
    [payload.error_description, payload.msg, payload.message]
        .into_iter()
        .flatten()
        .any(|text| text.contains("Invalid login credentials"))
}

/// First row's role, or `None` when there are no rows or the role is null.
fn parse_profile_rows(body: &str) -> Result<Option<String>, AuthError> {
    let rows: Vec<ProfileRow> =
        serde_json::from_str(body).map_err(|e| AuthError::ProfileLookup(format!("unparseable profile rows: {e}")))?;
    Ok(rows.into_iter().next().and_then(|row| row.role))
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
