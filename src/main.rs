mod config;
mod error;
mod pages;
mod render;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::render::{HtmlRenderer, PageRenderer};
use crate::services::identity::IdentityProvider;
use crate::services::session::{self, MemorySessionStore, SessionStore};
use crate::services::supabase::SupabaseClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let identity: Option<Arc<dyn IdentityProvider>> = match &config.backend {
        Some(backend) => {
            let client = SupabaseClient::new(backend).expect("identity client init failed");
            tracing::info!(url = %backend.url, "identity service configured");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; every login will be rejected");
            None
        }
    };

    let secret = config.session_secret.clone().unwrap_or_else(|| {
        tracing::warn!("SESSION_SECRET not set; using a random secret, sessions will not survive a restart");
        session::generate_token()
    });

    let renderer: Arc<dyn PageRenderer> = match &config.template_dir {
        Some(dir) => Arc::new(HtmlRenderer::with_overrides(dir)),
        None => Arc::new(HtmlRenderer::new()),
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let _purge = session::spawn_purge_task(sessions.clone(), config.purge_interval);

    let state = state::AppState::new(
        sessions,
        identity,
        renderer,
        config::signing_key(&secret),
        config.cookie_secure,
    );

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "gridboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
