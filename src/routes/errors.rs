//! Error mapper.
//!
//! Outer middleware that turns 404 and 500 responses into a redirect plus a
//! warning flash: back to the landing page for a logged-in user, to the login
//! page otherwise. The browser never sees a bare error page, except when the
//! redirect target is the very path that failed, where a plain status with
//! the message is returned to avoid a redirect loop.

use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::warn;

use super::guard;
use crate::error::AppError;
use crate::pages::{LANDING_PATH, LOGIN_PATH};
use crate::services::flash::{self, Flash};
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Page not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Router fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}

pub async fn map_errors(State(state): State<AppState>, jar: SignedCookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    let status = response.status();
    let message = match status {
        StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_ERROR_MESSAGE,
        _ => return response,
    };

    let authenticated = guard::current_session(&state, &jar).await.is_some();
    let target = if authenticated { LANDING_PATH } else { LOGIN_PATH };
    if target == path {
        warn!(%path, %status, "error on redirect target; not redirecting");
        return (status, message).into_response();
    }

    warn!(%path, %status, target, "mapping error to redirect");
    let jar = flash::push(jar, Flash::warning(message), state.cookie_secure);
    (jar, Redirect::to(target)).into_response()
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod tests;
