mod config;
mod db;
mod errors;
mod llm_client;
mod recommendation;
mod routes;
mod schema;
mod state;
mod storage;
mod wizard;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::ChatClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{MemStorage, PgStorage, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Matcher API v{}", env!("CARGO_PKG_VERSION"));

    if config.openai_api_key.trim().is_empty() {
        // Deliberately not fatal: /health stays up, recommendation requests
        // fail fast with a 500.
        warn!("OPENAI_API_KEY is not set — recommendation requests will fail");
    }

    // User store: relational when DATABASE_URL is set, in-memory otherwise.
    // Unrelated to the career flow; selected once at process start.
    let users: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            info!("User store: PostgreSQL");
            Arc::new(PgStorage::new(pool))
        }
        None => {
            info!("User store: in-memory");
            Arc::new(MemStorage::new())
        }
    };

    let llm = ChatClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        llm,
        config: config.clone(),
        users,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
