use super::*;
use crate::routes::app;
use crate::routes::test_http::{Browser, record, seed_session};
use crate::state::test_helpers::test_app_state;
use axum::http::StatusCode;

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_is_persistent_for_one_day() {
    let cookie = session_cookie("tok".into(), false);
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(Duration::DAY));
}

#[test]
fn session_cookie_secure_flag_follows_config() {
    assert_eq!(session_cookie("tok".into(), true).secure(), Some(true));
    assert_eq!(session_cookie("tok".into(), false).secure(), Some(false));
}

#[test]
fn expired_session_cookie_has_zero_max_age() {
    let cookie = expired_session_cookie(false);
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

// =============================================================================
// require_session
// =============================================================================

#[tokio::test]
async fn anonymous_request_is_redirected_to_login() {
    let mut browser = Browser::new(app(test_app_state()));
    let reply = browser.get("/dashboard").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some(LOGIN_PATH));
    assert!(!reply.body.contains("Dashboard"));

    let login = browser.get(LOGIN_PATH).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("Please log in first"));
}

#[tokio::test]
async fn every_page_is_guarded() {
    let mut browser = Browser::new(app(test_app_state()));
    for page in crate::pages::PAGES {
        let reply = browser.get(page.path).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{} reachable anonymously", page.path);
        assert_eq!(reply.location.as_deref(), Some(LOGIN_PATH));
    }
    let reply = browser.get("/my-role").await;
    assert_eq!(reply.location.as_deref(), Some(LOGIN_PATH));
}

#[tokio::test]
async fn unsigned_cookie_is_treated_as_anonymous() {
    let state = test_app_state();
    let token = crate::services::session::generate_token();
    state
        .sessions
        .set(
            &token,
            crate::services::session::StoredSession { record: record("u-1", "ops@grid.test", "admin"), access_token: None },
        )
        .await;

    let mut browser = Browser::new(app(state));
    browser.set_raw_cookie(SESSION_COOKIE, &token);
    let reply = browser.get("/dashboard").await;
    assert_eq!(reply.location.as_deref(), Some(LOGIN_PATH));
}

#[tokio::test]
async fn cookie_for_cleared_session_is_rejected() {
    let state = test_app_state();
    let mut browser = Browser::new(app(state.clone()));
    let token = seed_session(&state, &mut browser, record("u-1", "ops@grid.test", "admin")).await;
    state.sessions.clear(&token).await;

    let reply = browser.get("/dashboard").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some(LOGIN_PATH));
}

#[tokio::test]
async fn authenticated_request_reaches_handler_and_refreshes_cookie() {
    let state = test_app_state();
    let mut browser = Browser::new(app(state.clone()));
    seed_session(&state, &mut browser, record("u-1", "ops@grid.test", "admin")).await;

    let reply = browser.get("/dashboard").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("ops@grid.test"));
    assert!(browser.has_cookie(SESSION_COOKIE));
}

#[tokio::test]
async fn maybe_session_sees_live_session() {
    let state = test_app_state();
    let mut browser = Browser::new(app(state.clone()));
    assert_eq!(browser.get("/").await.location.as_deref(), Some(LOGIN_PATH));

    seed_session(&state, &mut browser, record("u-1", "ops@grid.test", "user")).await;
    assert_eq!(browser.get("/").await.location.as_deref(), Some(crate::pages::LANDING_PATH));
}
