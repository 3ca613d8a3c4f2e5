//! Axum route handlers for the Generation API.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures::channel::mpsc::unbounded;
use futures::StreamExt;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::assembly::{self, UserData};
use crate::generation::summary;
use crate::models::resume::{summary_status, ResumeRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeRequest {
    pub job_url: String,
    pub user_id: String,
    pub user_data: UserData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub job_url: String,
    /// When present, the finished summary is written back to this resume
    /// and its `summary_status` tracks the outcome.
    #[serde(default)]
    pub resume_id: Option<Uuid>,
    /// `false` opts into the buffered variant: one JSON response instead of
    /// a chunked body.
    #[serde(default = "default_true")]
    pub stream: bool,
}

fn default_true() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate/resume
///
/// Full generation pipeline: job scrape + GitHub fetch → skill synthesis →
/// merge → persist. Returns the persisted record including its id.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    if request.job_url.trim().is_empty() {
        return Err(AppError::Validation("jobUrl cannot be empty".to_string()));
    }
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId cannot be empty".to_string()));
    }

    let record =
        assembly::generate_resume(&state, &request.job_url, &request.user_id, request.user_data)
            .await?;

    Ok(Json(record))
}

/// POST /api/generate-summary
///
/// Streams the generated summary as plain-text chunks. Setup failures (page
/// fetch, resume lookup, LLM handshake) surface as JSON errors before any
/// byte is streamed; mid-stream failures end the body and mark the resume
/// `failed` when a resume id was given.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> Result<Response, AppError> {
    if request.job_url.trim().is_empty() {
        return Err(AppError::Validation("jobUrl cannot be empty".to_string()));
    }

    if let Some(resume_id) = request.resume_id {
        let touched =
            summary::set_summary_status(&state.db, resume_id, summary_status::PENDING).await?;
        if touched == 0 {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
    }

    if !request.stream {
        return generate_summary_buffered(&state, &request).await;
    }

    let mut stream =
        match summary::open_summary_stream(&state.http, &state.llm, &request.job_url).await {
            Ok(stream) => stream,
            Err(e) => {
                // Don't leave the resume stuck in `pending` when setup fails
                if let Some(resume_id) = request.resume_id {
                    if let Err(db_err) =
                        summary::set_summary_status(&state.db, resume_id, summary_status::FAILED)
                            .await
                    {
                        error!("Failed to mark summary failed for resume {resume_id}: {db_err}");
                    }
                }
                return Err(e);
            }
        };

    let (tx, rx) = unbounded::<Bytes>();
    let db = state.db.clone();
    let resume_id = request.resume_id;

    tokio::spawn(async move {
        let mut full = String::new();
        let mut failed = false;

        while let Some(chunk) = stream.next_text().await {
            match chunk {
                Ok(text) => {
                    full.push_str(&text);
                    if tx.unbounded_send(Bytes::from(text)).is_err() {
                        // Client went away; keep collecting so the record still completes
                        continue;
                    }
                }
                Err(e) => {
                    error!("Summary stream failed: {e}");
                    failed = true;
                    break;
                }
            }
        }
        drop(tx);

        if let Some(resume_id) = resume_id {
            let result = if failed {
                summary::set_summary_status(&db, resume_id, summary_status::FAILED).await
            } else {
                summary::store_summary(&db, resume_id, &full).await
            };
            if let Err(e) = result {
                error!("Failed to persist summary for resume {resume_id}: {e}");
            }
        }
    });

    let body = Body::from_stream(rx.map(Ok::<_, Infallible>));
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Buffered variant: the whole summary in one JSON response. Failures here
/// propagate like any other request error, after the status is marked.
async fn generate_summary_buffered(
    state: &AppState,
    request: &GenerateSummaryRequest,
) -> Result<Response, AppError> {
    let result = summary::generate_summary(&state.http, &state.llm, &request.job_url).await;

    if let Some(resume_id) = request.resume_id {
        let persisted = match &result {
            Ok(text) => summary::store_summary(&state.db, resume_id, text).await,
            Err(_) => {
                summary::set_summary_status(&state.db, resume_id, summary_status::FAILED).await
            }
        };
        if let Err(e) = persisted {
            error!("Failed to persist summary for resume {resume_id}: {e}");
        }
    }

    let text = result?;
    Ok(Json(serde_json::json!({ "summary": text })).into_response())
}

/// GET /api/resumes/:id
///
/// Builder/preview re-read of the persisted record.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(resume))
}
