//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session state, the identity-service contract, and the
//! login bridge so route handlers can stay focused on HTTP translation.

pub mod auth;
pub mod flash;
pub mod identity;
pub mod session;
pub mod supabase;
