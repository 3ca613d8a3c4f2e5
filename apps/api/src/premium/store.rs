//! Datastore access for entitlements and premium analysis results.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::premium::{FeatureType, PremiumFeatureRow};
use crate::premium::analysis::{AtsAnalysis, InterviewTips};

/// Finds an active, unexpired entitlement covering the feature: either the
/// feature's own type or the umbrella `premium` grant from checkout.
pub async fn find_active_entitlement(
    pool: &PgPool,
    user_id: &str,
    resume_id: Uuid,
    feature: FeatureType,
) -> Result<Option<PremiumFeatureRow>, sqlx::Error> {
    sqlx::query_as::<_, PremiumFeatureRow>(
        r#"
        SELECT * FROM premium_features
        WHERE user_id = $1
          AND resume_id = $2
          AND (feature_type = $3 OR feature_type = 'premium')
          AND is_active = TRUE
          AND (expires_at IS NULL OR expires_at > NOW())
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(resume_id)
    .bind(feature.as_str())
    .fetch_optional(pool)
    .await
}

/// Grants (or re-activates) an entitlement. Idempotent: the unique
/// constraint on `(user_id, resume_id, feature_type)` collapses duplicate
/// webhook deliveries into one row.
pub async fn grant_entitlement(
    pool: &PgPool,
    user_id: &str,
    resume_id: Uuid,
    feature: FeatureType,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO premium_features (id, user_id, resume_id, feature_type, is_active)
        VALUES ($1, $2, $3, $4, TRUE)
        ON CONFLICT (user_id, resume_id, feature_type)
        DO UPDATE SET is_active = TRUE
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(resume_id)
    .bind(feature.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Stores an ATS analysis, silently replacing any prior result for the resume.
pub async fn upsert_ats_score(
    pool: &PgPool,
    resume_id: Uuid,
    analysis: &AtsAnalysis,
) -> Result<(), AppError> {
    let value = serde_json::to_value(analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO ats_scores (resume_id, analysis)
        VALUES ($1, $2)
        ON CONFLICT (resume_id)
        DO UPDATE SET analysis = EXCLUDED.analysis, updated_at = NOW()
        "#,
    )
    .bind(resume_id)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Stores interview tips, silently replacing any prior result for the resume.
pub async fn upsert_interview_tips(
    pool: &PgPool,
    resume_id: Uuid,
    tips: &InterviewTips,
) -> Result<(), AppError> {
    let value = serde_json::to_value(tips)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize tips: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO interview_tips (resume_id, tips)
        VALUES ($1, $2)
        ON CONFLICT (resume_id)
        DO UPDATE SET tips = EXCLUDED.tips, updated_at = NOW()
        "#,
    )
    .bind(resume_id)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
