use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::payments::stripe::StripeClient;
use crate::premium::analysis::AnalysisGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every outbound client lives here, constructed once in `main` — no process
/// globals, so tests can assemble a state with fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Plain HTTP client for job-board and GitHub scraping.
    pub http: reqwest::Client,
    pub llm: LlmClient,
    pub stripe: StripeClient,
    /// Premium analysis backend. Default: `LlmAnalysisGenerator`.
    pub analysis: Arc<dyn AnalysisGenerator>,
    pub config: Config,
}
