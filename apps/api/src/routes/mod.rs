pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::payments::handlers as payments;
use crate::premium::handlers as premium;
use crate::scrape::handlers as scrape;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation pipeline
        .route("/api/generate/resume", post(generation::handle_generate_resume))
        .route("/api/generate-summary", post(generation::handle_generate_summary))
        .route("/api/resumes/:id", get(generation::handle_get_resume))
        // Standalone scrape endpoints
        .route("/api/scrape/job", post(scrape::handle_scrape_job))
        .route("/api/scrape/github", post(scrape::handle_scrape_github))
        .route("/api/scrape/linkedin", post(scrape::handle_scrape_linkedin))
        // Premium pipelines (session-gated)
        .route(
            "/api/premium/generate-ats-score",
            post(premium::handle_ats_score),
        )
        .route(
            "/api/premium/generate-interview-tips",
            post(premium::handle_interview_tips),
        )
        // Payment flow
        .route(
            "/api/stripe/create-checkout",
            post(payments::handle_create_checkout),
        )
        .route("/api/stripe/webhook", post(payments::handle_webhook))
        .with_state(state)
}
