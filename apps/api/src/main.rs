mod actor;
mod config;
mod db;
mod errors;
mod llm_client;
mod marketplace;
mod matching;
mod profiles;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ScorerBackend};
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::marketplace::store::PgStore;
use crate::matching::engine::{LlmMatchScorer, MatchScorer};
use crate::matching::heuristic::HeuristicMatchScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobway API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize the completion client. A missing key is reported per call, not here.
    let gemini = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_base_url.clone(),
        config.gemini_max_attempts,
    )?);
    if gemini.is_configured() {
        info!(
            "Gemini client initialized (match: {}, resume: {}, attempts: {})",
            config.match_model, config.resume_model, config.gemini_max_attempts
        );
    } else {
        warn!("GEMINI_API_KEY is not set; AI endpoints will answer AI_NOT_CONFIGURED");
    }

    // Initialize match scorer (LlmMatchScorer by default; swap via MATCH_SCORER)
    let scorer: Arc<dyn MatchScorer> = match config.match_scorer {
        ScorerBackend::Llm => Arc::new(LlmMatchScorer::new(
            gemini.clone(),
            config.match_model.clone(),
        )),
        ScorerBackend::Heuristic => Arc::new(HeuristicMatchScorer),
    };
    info!("Match scorer: {}", scorer.backend());

    // Build app state
    let state = AppState {
        store,
        scorer,
        completion: gemini,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
