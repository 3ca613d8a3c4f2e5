mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod payments;
mod premium;
mod routes;
mod scrape;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::payments::stripe::StripeClient;
use crate::premium::analysis::{AnalysisGenerator, LlmAnalysisGenerator};
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

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Shared scrape client: browser-like UA, bounded request time
    let http = build_scrape_client()?;
    info!("Scrape client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize Stripe client
    let stripe = StripeClient::new(config.stripe_secret_key.clone());
    info!("Stripe client initialized");

    // Premium analysis generator — trait object so tests can swap in doubles
    let analysis: Arc<dyn AnalysisGenerator> = Arc::new(LlmAnalysisGenerator::new(llm.clone()));

    // Build app state
    let state = AppState {
        db,
        http,
        llm,
        stripe,
        analysis,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS once the web origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_scrape_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(scrape::BROWSER_UA)
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}
