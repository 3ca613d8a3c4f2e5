//! Premium analysis backends — trait-based so handlers and the gating
//! pipeline never care whether results come from the LLM or a test double.
//!
//! The LLM's JSON output is deserialized straight into the typed shapes
//! below; a response that does not match the schema fails the request
//! instead of being trusted blind.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{CallParams, LlmClient};
use crate::premium::prompts::{ANALYSIS_SYSTEM, ATS_PROMPT_TEMPLATE, INTERVIEW_PROMPT_TEMPLATE};

const ANALYSIS_PARAMS: CallParams = CallParams {
    max_tokens: 1500,
    temperature: 0.3,
};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub summary: u32,
    pub skills: u32,
    pub experience: u32,
    pub keywords: u32,
}

/// ATS compatibility analysis: overall 0-100 score, per-dimension sub-scores,
/// and concrete suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsAnalysis {
    pub score: u32,
    pub breakdown: AtsBreakdown,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCulture {
    pub values: Vec<String>,
    pub mission: String,
    pub talking_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleKeywords {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub examples: HashMap<String, String>,
}

/// Interview coaching notes for a (resume, job) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewTips {
    pub company_culture: CompanyCulture,
    pub role_keywords: RoleKeywords,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The analysis backend. Carried in `AppState` as `Arc<dyn AnalysisGenerator>`
/// so tests can count calls with a double.
#[async_trait]
pub trait AnalysisGenerator: Send + Sync {
    async fn ats_score(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<AtsAnalysis, AppError>;

    async fn interview_tips(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<InterviewTips, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAnalysisGenerator {
    llm: LlmClient,
}

impl LlmAnalysisGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnalysisGenerator for LlmAnalysisGenerator {
    async fn ats_score(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<AtsAnalysis, AppError> {
        let prompt = ATS_PROMPT_TEMPLATE
            .replace("{resume}", resume_content)
            .replace("{job_description}", job_description);

        self.llm
            .call_json::<AtsAnalysis>(&prompt, ANALYSIS_SYSTEM, ANALYSIS_PARAMS)
            .await
            .map_err(|e| AppError::Llm(format!("ATS scoring failed: {e}")))
    }

    async fn interview_tips(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<InterviewTips, AppError> {
        let prompt = INTERVIEW_PROMPT_TEMPLATE
            .replace("{resume}", resume_content)
            .replace("{job_description}", job_description);

        self.llm
            .call_json::<InterviewTips>(&prompt, ANALYSIS_SYSTEM, ANALYSIS_PARAMS)
            .await
            .map_err(|e| AppError::Llm(format!("Interview tips generation failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ats_analysis_deserializes_from_expected_shape() {
        let json = r#"{
            "score": 78,
            "breakdown": {"summary": 80, "skills": 75, "experience": 82, "keywords": 70},
            "suggestions": ["Add more keywords"]
        }"#;
        let analysis: AtsAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.score, 78);
        assert_eq!(analysis.breakdown.keywords, 70);
        assert_eq!(analysis.suggestions.len(), 1);
    }

    #[test]
    fn test_ats_analysis_rejects_missing_breakdown() {
        let json = r#"{"score": 78, "suggestions": []}"#;
        assert!(serde_json::from_str::<AtsAnalysis>(json).is_err());
    }

    #[test]
    fn test_ats_analysis_rejects_non_numeric_score() {
        let json = r#"{
            "score": "high",
            "breakdown": {"summary": 80, "skills": 75, "experience": 82, "keywords": 70},
            "suggestions": []
        }"#;
        assert!(serde_json::from_str::<AtsAnalysis>(json).is_err());
    }

    #[test]
    fn test_interview_tips_deserialize_from_expected_shape() {
        let json = r#"{
            "company_culture": {
                "values": ["ownership"],
                "mission": "Build tools developers love",
                "talking_points": ["Ask about on-call"]
            },
            "role_keywords": {
                "technical": ["Rust"],
                "soft": ["communication"],
                "examples": {"Rust": "Describe the service you shipped"}
            }
        }"#;
        let tips: InterviewTips = serde_json::from_str(json).unwrap();
        assert_eq!(tips.company_culture.values, vec!["ownership".to_string()]);
        assert_eq!(tips.role_keywords.examples["Rust"], "Describe the service you shipped");
    }

    #[test]
    fn test_interview_tips_reject_missing_role_keywords() {
        let json = r#"{
            "company_culture": {
                "values": [],
                "mission": "m",
                "talking_points": []
            }
        }"#;
        assert!(serde_json::from_str::<InterviewTips>(json).is_err());
    }
}
