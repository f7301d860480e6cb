use super::*;
use crate::state::test_helpers::{RoleReply, StubIdentity};

fn credential(email: &str, password: &str) -> Credential {
    Credential { email: email.into(), password: password.into() }
}

fn identity() -> Identity {
    Identity { id: "u-1".into(), email: "ops@grid.test".into(), access_token: Some("tok".into()) }
}

// =============================================================================
// resolve_role
// =============================================================================

#[tokio::test]
async fn resolve_role_uses_profile_role() {
    let stub = StubIdentity::new().with_role(RoleReply::Role("admin".into()));
    assert_eq!(resolve_role(&stub, &identity()).await, "admin");
}

#[tokio::test]
async fn resolve_role_trims_profile_role() {
    let stub = StubIdentity::new().with_role(RoleReply::Role("  engineer \n".into()));
    assert_eq!(resolve_role(&stub, &identity()).await, "engineer");
}

#[tokio::test]
async fn resolve_role_defaults_when_no_rows() {
    let stub = StubIdentity::new().with_role(RoleReply::NoRows);
    assert_eq!(resolve_role(&stub, &identity()).await, DEFAULT_ROLE);
}

#[tokio::test]
async fn resolve_role_defaults_on_blank_role() {
    let stub = StubIdentity::new().with_role(RoleReply::Role("   ".into()));
    assert_eq!(resolve_role(&stub, &identity()).await, DEFAULT_ROLE);
}

#[tokio::test]
async fn resolve_role_defaults_on_lookup_failure() {
    let stub = StubIdentity::new().with_role(RoleReply::Fail);
    assert_eq!(resolve_role(&stub, &identity()).await, DEFAULT_ROLE);
}

// =============================================================================
// authenticate
// =============================================================================

#[tokio::test]
async fn authenticate_builds_permanent_record() {
    let stub = StubIdentity::new()
        .with_user("ops@grid.test", "pw", "u-1")
        .with_role(RoleReply::Role("engineer".into()));

    let session = authenticate(&stub, &credential("ops@grid.test", "pw"))
        .await
        .unwrap();
    assert_eq!(
        session.record,
        SessionRecord { id: "u-1".into(), email: "ops@grid.test".into(), role: "engineer".into(), permanent: true }
    );
    assert_eq!(session.access_token.as_deref(), Some("access-u-1"));
}

#[tokio::test]
async fn authenticate_rejects_wrong_password() {
    let stub = StubIdentity::new().with_user("ops@grid.test", "pw", "u-1");
    let err = authenticate(&stub, &credential("ops@grid.test", "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn authenticate_survives_profile_failure() {
    let stub = StubIdentity::new()
        .with_user("ops@grid.test", "pw", "u-1")
        .with_role(RoleReply::Fail);
    let session = authenticate(&stub, &credential("ops@grid.test", "pw"))
        .await
        .unwrap();
    assert_eq!(session.record.role, DEFAULT_ROLE);
}

#[tokio::test]
async fn authenticate_propagates_unavailable() {
    let stub = StubIdentity::new().unavailable();
    let err = authenticate(&stub, &credential("ops@grid.test", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unavailable(_)));
}

// =============================================================================
// login_error_message
// =============================================================================

#[test]
fn invalid_credentials_message() {
    assert_eq!(login_error_message(&AuthError::InvalidCredentials), "Invalid email or password");
}

#[test]
fn other_errors_are_prefixed() {
    let msg = login_error_message(&AuthError::NotConfigured);
    assert_eq!(msg, "Login error: authentication service is not configured");
    let msg = login_error_message(&AuthError::Unavailable("connection refused".into()));
    assert!(msg.starts_with("Login error: "));
    assert!(msg.contains("connection refused"));
}

#[test]
fn credential_debug_redacts_password() {
    let debug = format!("{:?}", credential("ops@grid.test", "hunter2"));
    assert!(debug.contains("ops@grid.test"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn credential_incomplete_detection() {
    assert!(credential("", "pw").is_incomplete());
    assert!(credential("   ", "pw").is_incomplete());
    assert!(credential("ops@grid.test", "").is_incomplete());
    assert!(!credential("ops@grid.test", "pw").is_incomplete());
}
