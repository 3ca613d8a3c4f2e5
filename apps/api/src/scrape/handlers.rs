//! Axum route handlers for the standalone scrape endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scrape::github::{self, RepoSummary};
use crate::scrape::job::{self, JobPosting};
use crate::scrape::linkedin::{self, LinkedInProfile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJobRequest {
    pub job_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeGithubRequest {
    pub github_username: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeGithubResponse {
    pub repositories: Vec<RepoSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeLinkedInRequest {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/scrape/job
pub async fn handle_scrape_job(
    State(state): State<AppState>,
    Json(request): Json<ScrapeJobRequest>,
) -> Result<Json<JobPosting>, AppError> {
    if request.job_url.trim().is_empty() {
        return Err(AppError::Validation("jobUrl cannot be empty".to_string()));
    }

    let posting = job::fetch_job(&state.http, &request.job_url).await?;
    Ok(Json(posting))
}

/// POST /api/scrape/github
pub async fn handle_scrape_github(
    State(state): State<AppState>,
    Json(request): Json<ScrapeGithubRequest>,
) -> Result<Json<ScrapeGithubResponse>, AppError> {
    if request.github_username.trim().is_empty() {
        return Err(AppError::Validation(
            "githubUsername cannot be empty".to_string(),
        ));
    }

    let repositories = github::fetch_repositories(
        &state.http,
        request.github_username.trim(),
        state.config.github_token.as_deref(),
    )
    .await?;

    Ok(Json(ScrapeGithubResponse { repositories }))
}

/// POST /api/scrape/linkedin
pub async fn handle_scrape_linkedin(
    Json(request): Json<ScrapeLinkedInRequest>,
) -> Result<Json<LinkedInProfile>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    Ok(Json(linkedin::placeholder_profile()))
}
