use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Premium feature kinds. Checkout grants the umbrella `Premium`; the
/// analysis pipelines accept either their own kind or the umbrella.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureType {
    AtsScore,
    InterviewTips,
    Premium,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::AtsScore => "ats_score",
            FeatureType::InterviewTips => "interview_tips",
            FeatureType::Premium => "premium",
        }
    }
}

/// An entitlement row: proof that a user paid for a feature on a resume.
/// Unique per `(user_id, resume_id, feature_type)` at the datastore level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PremiumFeatureRow {
    pub id: Uuid,
    pub user_id: String,
    pub resume_id: Uuid,
    pub feature_type: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
