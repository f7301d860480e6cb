//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public routes (`/`, `/login`, `/logout`) and the guarded dashboard pages
//! share one Axum router. Layer order, innermost first:
//!
//! 1. `require_session` as a route layer on the protected routes only.
//! 2. `CatchPanicLayer` turns handler panics into 500s.
//! 3. `map_errors` turns 404/500 into a redirect with a flash.
//! 4. `/healthz` is added after the error mapper so it is never redirected.
//! 5. `TraceLayer` logs every request, probes included.

pub mod auth;
pub mod errors;
pub mod guard;
pub mod pages;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Dashboard pages plus the role probe, all behind the session guard.
fn protected_routes(state: &AppState) -> Router<AppState> {
    crate::pages::PAGES
        .iter()
        .fold(Router::new(), |router, page| router.route(page.path, get(pages::show_page)))
        .route("/my-role", get(auth::my_role))
        .route_layer(from_fn_with_state(state.clone(), guard::require_session))
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .merge(protected_routes(&state))
        .fallback(errors::not_found)
        .layer(CatchPanicLayer::new())
        .layer(from_fn_with_state(state.clone(), errors::map_errors))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_http {
    use std::collections::BTreeMap;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
    use tower::ServiceExt;

    use super::guard;
    use crate::services::session::{SessionRecord, StoredSession, generate_token};
    use crate::state::AppState;

    /// Minimal cookie-keeping client over a router.
    pub struct Browser {
        app: Router,
        cookies: BTreeMap<String, String>,
    }

    pub struct Reply {
        pub status: StatusCode,
        pub location: Option<String>,
        pub body: String,
    }

    impl Browser {
        pub fn new(app: Router) -> Self {
            Self { app, cookies: BTreeMap::new() }
        }

        pub fn has_cookie(&self, name: &str) -> bool {
            self.cookies.contains_key(name)
        }

        pub fn set_raw_cookie(&mut self, name: &str, value: &str) {
            self.cookies.insert(name.to_owned(), value.to_owned());
        }

        pub async fn get(&mut self, path: &str) -> Reply {
            let request = self.request("GET", path).body(Body::empty()).expect("request");
            self.send(request).await
        }

        pub async fn post_form(&mut self, path: &str, form: &str) -> Reply {
            let request = self
                .request("POST", path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_owned()))
                .expect("request");
            self.send(request).await
        }

        fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
            let mut builder = Request::builder().method(method).uri(path);
            if !self.cookies.is_empty() {
                let cookie = self
                    .cookies
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                builder = builder.header(header::COOKIE, cookie);
            }
            builder
        }

        async fn send(&mut self, request: Request<Body>) -> Reply {
            let response = self.app.clone().oneshot(request).await.expect("router is infallible");
            self.absorb_cookies(&response);
            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = body_text(response).await;
            Reply { status, location, body }
        }

        fn absorb_cookies(&mut self, response: &Response<Body>) {
            for value in response.headers().get_all(header::SET_COOKIE) {
                let Ok(raw) = value.to_str() else { continue };
                let mut parts = raw.split(';');
                let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
                    continue;
                };
                let expired = parts.any(|attr| attr.trim().eq_ignore_ascii_case("max-age=0"));
                if expired || value.is_empty() {
                    self.cookies.remove(name.trim());
                } else {
                    self.cookies.insert(name.trim().to_owned(), value.trim().to_owned());
                }
            }
        }
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Signed wire value for `name=value` under `key`.
    pub fn signed_cookie_value(key: &Key, name: &str, value: &str) -> String {
        let jar = SignedCookieJar::new(key.clone()).add(Cookie::new(name.to_owned(), value.to_owned()));
        let response = (jar, ()).into_response();
        let raw = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("set-cookie")
            .to_owned();
        let pair = raw.split(';').next().expect("pair");
        pair.split_once('=').expect("name=value").1.to_owned()
    }

    /// Store a live session for `record` and hand its cookie to `browser`.
    pub async fn seed_session(state: &AppState, browser: &mut Browser, record: SessionRecord) -> String {
        let token = generate_token();
        state.sessions.set(&token, StoredSession { record, access_token: Some("seeded-access".into()) }).await;
        let signed = signed_cookie_value(&state.cookie_key, guard::SESSION_COOKIE, &token);
        browser.set_raw_cookie(guard::SESSION_COOKIE, &signed);
        token
    }

    pub fn record(id: &str, email: &str, role: &str) -> SessionRecord {
        SessionRecord { id: id.into(), email: email.into(), role: role.into(), permanent: true }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
