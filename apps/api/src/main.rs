mod catalog;
mod config;
mod db;
mod errors;
mod feeds;
mod injector;
mod models;
mod prompts;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::registry::SessionRegistry;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::feeds::HttpFeedClient;
use crate::injector::RelayInserter;
use crate::prompts::favorites::FavoritesStore;
use crate::prompts::preferences::Preferences;
use crate::prompts::repository::PromptRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::postgres::PgKvStore;
use crate::storage::redis_store::RedisKvStore;
use crate::storage::KvStore;

const SESSION_SWEEP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prompt Catalog v{}", env!("CARGO_PKG_VERSION"));

    // Local partition: PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    let local: Arc<dyn KvStore> = Arc::new(PgKvStore::new(db));

    // Sync partition: Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sync: Arc<dyn KvStore> = Arc::new(RedisKvStore::new(redis));
    info!("Redis client initialized");

    let feeds = HttpFeedClient::new(config.daily_feed_url.clone(), config.core_feed_url.clone())?;
    info!(
        "Prompt feeds: daily={} core={}",
        config.daily_feed_url, config.core_feed_url
    );

    let inserter = RelayInserter::new(config.insert_relay_url.clone())?;
    match &config.insert_relay_url {
        Some(url) => info!("Insert relay: {url}"),
        None => info!("No insert relay configured; insert requests will report no target"),
    }

    let sessions = SessionRegistry::default();
    sessions.spawn_sweeper(
        Duration::from_secs(config.session_idle_secs),
        Duration::from_secs(SESSION_SWEEP_SECS),
    );

    let state = AppState {
        repository: PromptRepository::new(local.clone(), Arc::new(feeds)),
        favorites: FavoritesStore::new(sync),
        preferences: Preferences::new(local),
        sessions,
        inserter: Arc::new(inserter),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
