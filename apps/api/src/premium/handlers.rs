//! Axum route handlers for the premium analysis endpoints.
//!
//! Both endpoints share one shape: session → field validation → entitlement
//! lookup → gated generation → upsert result → return it.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::premium::FeatureType;
use crate::premium::analysis::{AtsAnalysis, InterviewTips};
use crate::premium::{pipeline, store};
use crate::state::AppState;

/// Fields are optional at the serde layer so missing ones produce a 400
/// with a useful message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumAnalysisRequest {
    pub resume_id: Option<Uuid>,
    pub resume_content: Option<String>,
    pub job_description: Option<String>,
}

fn validate(request: PremiumAnalysisRequest) -> Result<(Uuid, String, String), AppError> {
    let resume_id = request
        .resume_id
        .ok_or_else(|| AppError::Validation("resumeId is required".to_string()))?;
    let resume_content = request
        .resume_content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::Validation("resumeContent is required".to_string()))?;
    let job_description = request
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))?;
    Ok((resume_id, resume_content, job_description))
}

/// POST /api/premium/generate-ats-score
pub async fn handle_ats_score(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PremiumAnalysisRequest>,
) -> Result<Json<AtsAnalysis>, AppError> {
    let (resume_id, resume_content, job_description) = validate(request)?;

    let entitlement = store::find_active_entitlement(
        &state.db,
        &session.user_id,
        resume_id,
        FeatureType::AtsScore,
    )
    .await?;

    let analysis = pipeline::run_ats_pipeline(
        entitlement.as_ref(),
        state.analysis.as_ref(),
        &resume_content,
        &job_description,
    )
    .await?;

    store::upsert_ats_score(&state.db, resume_id, &analysis).await?;

    Ok(Json(analysis))
}

/// POST /api/premium/generate-interview-tips
pub async fn handle_interview_tips(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PremiumAnalysisRequest>,
) -> Result<Json<InterviewTips>, AppError> {
    let (resume_id, resume_content, job_description) = validate(request)?;

    let entitlement = store::find_active_entitlement(
        &state.db,
        &session.user_id,
        resume_id,
        FeatureType::InterviewTips,
    )
    .await?;

    let tips = pipeline::run_interview_pipeline(
        entitlement.as_ref(),
        state.analysis.as_ref(),
        &resume_content,
        &job_description,
    )
    .await?;

    store::upsert_interview_tips(&state.db, resume_id, &tips).await?;

    Ok(Json(tips))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        resume_id: Option<Uuid>,
        content: Option<&str>,
        jd: Option<&str>,
    ) -> PremiumAnalysisRequest {
        PremiumAnalysisRequest {
            resume_id,
            resume_content: content.map(str::to_string),
            job_description: jd.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let id = Uuid::new_v4();
        let (resume_id, content, jd) =
            validate(request(Some(id), Some("resume"), Some("jd"))).unwrap();
        assert_eq!(resume_id, id);
        assert_eq!(content, "resume");
        assert_eq!(jd, "jd");
    }

    #[test]
    fn test_validate_rejects_missing_resume_id() {
        let result = validate(request(None, Some("resume"), Some("jd")));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_blank_resume_content() {
        let result = validate(request(Some(Uuid::new_v4()), Some("   "), Some("jd")));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_missing_job_description() {
        let result = validate(request(Some(Uuid::new_v4()), Some("resume"), None));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
