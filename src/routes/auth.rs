//! Auth routes: root redirect, login form and submission, logout, role probe.

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::Extension;
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, warn};

use super::guard::{self, MaybeSession};
use crate::error::AppError;
use crate::pages::{LANDING_PATH, LOGIN_PATH, LOGIN_TEMPLATE};
use crate::render::RenderContext;
use crate::services::auth as auth_svc;
use crate::services::flash::{self, Flash};
use crate::services::identity::{AuthError, Credential};
use crate::services::session::{self, SessionRecord};
use crate::state::AppState;

/// Render the login page with pending flashes plus an optional new one.
fn render_login(state: &AppState, jar: SignedCookieJar, extra: Option<Flash>) -> Result<Response, AppError> {
    let (jar, mut flashes) = flash::take(jar, state.cookie_secure);
    flashes.extend(extra);
    let html = state
        .renderer
        .render(LOGIN_TEMPLATE, &RenderContext::anonymous("Login", &flashes))?;
    Ok((jar, Html(html)).into_response())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /`: landing page when logged in, login page otherwise.
pub async fn index(MaybeSession(current): MaybeSession) -> Redirect {
    if current.is_some() { Redirect::to(LANDING_PATH) } else { Redirect::to(LOGIN_PATH) }
}

/// `GET /login`: show the form unless already logged in.
pub async fn login_form(
    State(state): State<AppState>,
    MaybeSession(current): MaybeSession,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    if current.is_some() {
        return Ok(Redirect::to(LANDING_PATH).into_response());
    }
    render_login(&state, jar, None)
}

/// `POST /login`: verify credentials, store the session, set the cookie.
pub async fn login_submit(
    State(state): State<AppState>,
    MaybeSession(current): MaybeSession,
    jar: SignedCookieJar,
    Form(credential): Form<Credential>,
) -> Result<Response, AppError> {
    if current.is_some() {
        return Ok(Redirect::to(LANDING_PATH).into_response());
    }

    if credential.is_incomplete() {
        return render_login(&state, jar, Some(Flash::danger("Please enter both email and password")));
    }

    let Some(identity) = state.identity.clone() else {
        warn!("login attempted but the identity service is not configured");
        let message = auth_svc::login_error_message(&AuthError::NotConfigured);
        return render_login(&state, jar, Some(Flash::danger(message)));
    };

    let stored = match auth_svc::authenticate(identity.as_ref(), &credential).await {
        Ok(stored) => stored,
        Err(e) => {
            let email = credential.email.trim();
            match &e {
                AuthError::InvalidCredentials => info!(%email, "login rejected"),
                AuthError::UnexpectedResponse { status, body } => {
                    warn!(%email, status, %body, "login failed: unexpected response");
                }
                _ => warn!(%email, error = %e, "login failed"),
            }
            return render_login(&state, jar, Some(Flash::danger(auth_svc::login_error_message(&e))));
        }
    };

    let token = session::generate_token();
    let email = stored.record.email.clone();
    info!(email = %email, role = %stored.record.role, "login succeeded");
    state.sessions.set(&token, stored).await;

    let jar = jar.add(guard::session_cookie(token, state.cookie_secure));
    let jar = flash::push(jar, Flash::success(format!("Welcome back, {email}!")), state.cookie_secure);
    Ok((jar, Redirect::to(LANDING_PATH)).into_response())
}

/// `GET /logout`: revoke upstream (best effort), clear the session, go to login.
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    if let Some(token) = guard::session_token(&jar) {
        let ended = state.sessions.clear(&token).await;
        let access_token = ended.and_then(|stored| stored.access_token);
        if let (Some(identity), Some(access_token)) = (&state.identity, access_token) {
            if let Err(e) = identity.sign_out(&access_token).await {
                warn!(error = %e, "upstream sign-out failed; local session cleared anyway");
            }
        }
    }

    let jar = jar.add(guard::expired_session_cookie(state.cookie_secure));
    let jar = flash::push(jar, Flash::info("You have been logged out"), state.cookie_secure);
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

/// `GET /my-role`: debug view of the current session's identity and role.
pub async fn my_role(Extension(record): Extension<SessionRecord>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": record.id,
        "email": record.email,
        "role": record.role,
    }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
