//! The shared premium pipeline shape: check the entitlement, then (and only
//! then) call the analysis backend. Kept free of I/O besides the generator
//! call so the gating property is unit-testable.

use chrono::Utc;

use crate::errors::AppError;
use crate::models::premium::PremiumFeatureRow;
use crate::premium::analysis::{AnalysisGenerator, AtsAnalysis, InterviewTips};

/// Rejects unless an active, unexpired entitlement row is present.
pub fn ensure_entitled(entitlement: Option<&PremiumFeatureRow>) -> Result<(), AppError> {
    match entitlement {
        Some(row) if row.is_active && !is_expired(row) => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

fn is_expired(row: &PremiumFeatureRow) -> bool {
    row.expires_at.is_some_and(|expires_at| expires_at <= Utc::now())
}

/// Entitlement-gated ATS scoring. The generator is never called for an
/// unentitled request.
pub async fn run_ats_pipeline(
    entitlement: Option<&PremiumFeatureRow>,
    generator: &dyn AnalysisGenerator,
    resume_content: &str,
    job_description: &str,
) -> Result<AtsAnalysis, AppError> {
    ensure_entitled(entitlement)?;
    generator.ats_score(resume_content, job_description).await
}

/// Entitlement-gated interview tips generation.
pub async fn run_interview_pipeline(
    entitlement: Option<&PremiumFeatureRow>,
    generator: &dyn AnalysisGenerator,
    resume_content: &str,
    job_description: &str,
) -> Result<InterviewTips, AppError> {
    ensure_entitled(entitlement)?;
    generator
        .interview_tips(resume_content, job_description)
        .await
}
