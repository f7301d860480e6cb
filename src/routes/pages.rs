//! Dashboard page dispatch.
//!
//! Every page in `crate::pages::PAGES` is served by the one handler below;
//! the matched route path selects the table entry.

use axum::extract::{MatchedPath, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Extension;
use axum_extra::extract::cookie::SignedCookieJar;

use crate::error::AppError;
use crate::pages;
use crate::render::RenderContext;
use crate::services::flash;
use crate::services::session::SessionRecord;
use crate::state::AppState;

/// `GET <page path>`: render the page's template for the session user.
pub async fn show_page(
    State(state): State<AppState>,
    Extension(record): Extension<SessionRecord>,
    matched: MatchedPath,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let page = pages::find(matched.as_str()).ok_or_else(|| AppError::NotFound(matched.as_str().to_owned()))?;
    let (jar, flashes) = flash::take(jar, state.cookie_secure);
    let html = state
        .renderer
        .render(page.template, &RenderContext::for_page(page, &record, &flashes))?;
    Ok((jar, Html(html)).into_response())
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
