use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use api::auth::{OAuthConfig, OAuthProvider};
use api::store::{MemoryAccountStore, PgAccountStore};
use api::{Authenticator, Settings};
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;
use web::AppState;

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("failed to load settings")?;

    let provider = match OAuthConfig::from_settings(&settings).map_err(anyhow::Error::msg)? {
        Some(config) => Some(OAuthProvider::new(config)?),
        None => {
            tracing::warn!("CLIENT_ID/CLIENT_SECRET not set, external login disabled");
            None
        }
    };

    let router = match settings.database_url.as_deref() {
        Some(url) => {
            let pool = api::db::connect(url)
                .await
                .context("failed to connect to database")?;

            let session_store = PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .context("failed to migrate session store")?;
            web::spawn_expired_session_cleanup(session_store.clone(), SESSION_SWEEP_PERIOD);

            let auth = Authenticator::new(Arc::new(PgAccountStore::new(pool)), provider);
            web::app(AppState::new(auth), session_store, &settings)?
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, accounts and sessions live in memory; \
                 for development only, expired sessions are never reclaimed"
            );
            let auth = Authenticator::new(Arc::new(MemoryAccountStore::new()), provider);
            web::app(AppState::new(auth), MemoryStore::default(), &settings)?
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
