//! Session guard and session-cookie plumbing.
//!
//! SYSTEM CONTEXT
//! ==============
//! `require_session` is composed into the protected router as a route layer.
//! Anonymous requests never reach the wrapped handler: they are redirected
//! to the login page with a warning flash. Authenticated requests get the
//! `SessionRecord` in their extensions and a refreshed cookie expiry.
//!
//! Unguarded handlers that merely want to know whether someone is logged in
//! use the `MaybeSession` extractor instead.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use time::Duration;

use crate::pages::LOGIN_PATH;
use crate::services::flash::{self, Flash};
use crate::services::session::{SESSION_LIFETIME, SessionRecord};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

fn cookie_max_age() -> Duration {
    Duration::try_from(SESSION_LIFETIME).unwrap_or(Duration::DAY)
}

/// Persistent session cookie carrying `token`.
pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie_max_age())
        .build()
}

/// Cookie that makes the browser drop its session cookie.
pub(crate) fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn session_token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

/// Resolve the live session behind the request's cookie, if any.
pub(crate) async fn current_session(state: &AppState, jar: &SignedCookieJar) -> Option<(String, SessionRecord)> {
    let token = session_token(jar)?;
    let record = state.sessions.get(&token).await?;
    Some((token, record))
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Optional session for handlers outside the guard.
pub struct MaybeSession(pub Option<SessionRecord>);

impl<S> FromRequestParts<S> for MaybeSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = SignedCookieJar::from_headers(&parts.headers, app_state.cookie_key.clone());
        let record = current_session(&app_state, &jar)
            .await
            .map(|(_, record)| record);
        Ok(Self(record))
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Gate a route behind an authenticated session.
pub async fn require_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((token, record)) = current_session(&state, &jar).await else {
        tracing::debug!(path = %request.uri().path(), "no session; redirecting to login");
        let jar = flash::push(jar, Flash::warning("Please log in first"), state.cookie_secure);
        return (jar, Redirect::to(LOGIN_PATH)).into_response();
    };

    request.extensions_mut().insert(record);
    let jar = jar.add(session_cookie(token, state.cookie_secure));
    let response = next.run(request).await;
    (jar, response).into_response()
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
