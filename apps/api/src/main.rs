mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::compatibility::WeightedProfileScorer;
use crate::matching::enrichment::ContentGenerator;
use crate::matching::orchestrator::MatchOrchestrator;
use crate::matching::store::{PgMatchStore, PgProfileStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CoNekt API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let profiles = Arc::new(PgProfileStore::new(db.clone()));
    let matches = Arc::new(PgMatchStore::new(db));

    // Initialize text-generation client (injected, never global)
    let llm = LlmClient::new(config.openai_api_key.clone())
        .context("Failed to build text-generation HTTP client")?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("OPENAI_API_KEY not set; matches will use rule-based activities and questions");
    }

    // Initialize match orchestrator
    let orchestrator = MatchOrchestrator::new(
        profiles.clone(),
        matches.clone(),
        Arc::new(WeightedProfileScorer),
        ContentGenerator::new(Arc::new(llm)),
        config.enrichment_timeout,
    );
    info!(
        "Match orchestrator ready (enrichment timeout {:?}, default limit {})",
        config.enrichment_timeout, config.default_match_limit
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        profiles,
        matches,
        orchestrator: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to the web client when `FRONTEND_URL` is set; permissive otherwise (local dev).
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = &config.frontend_url else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("FRONTEND_URL is not a valid origin: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
