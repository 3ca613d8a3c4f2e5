use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of the asynchronously generated summary field.
/// A resume is created `pending`, and the summary endpoint moves it to
/// `ready` or `failed` once the client-triggered generation completes.
pub mod summary_status {
    pub const PENDING: &str = "pending";
    pub const READY: &str = "ready";
    pub const FAILED: &str = "failed";
}

/// The central persisted entity: one row per generated resume.
/// Written once at creation; only `summary`/`summary_status` have an
/// update path in this service (the editor mutates rows downstream).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub summary: String,
    pub summary_status: String,
    pub work: Value,
    pub education: Value,
    pub skills: Vec<String>,
    pub projects: Value,
    pub job_data: Option<Value>,
    pub github_data: Option<Value>,
    /// Always null — LinkedIn scraping is an unimplemented placeholder.
    pub linkedin_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// A resume project entry, mapped 1:1 from a GitHub repository at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub url: Option<String>,
    pub highlights: Vec<String>,
    pub keywords: Vec<String>,
}
