//! Resume Assembly — orchestrates the full generation pipeline.
//!
//! Flow: fetch job posting + GitHub repos (concurrently) → synthesize skills
//! over the job data → map repos into projects → single INSERT → return row.
//!
//! Failure policy: a job fetch or insert failure aborts with no row written;
//! skill synthesis and the GitHub fetch are best-effort and degrade to empty.

use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::content;
use crate::models::resume::{summary_status, Project, ResumeRow};
use crate::scrape::github::{self, RepoSummary};
use crate::scrape::job::{self, JobPosting};
use crate::state::AppState;

/// User-submitted identity bundle for resume creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// The fully merged record, ready to persist.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub summary: String,
    pub summary_status: &'static str,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub job_data: Value,
    pub github_data: Option<Value>,
}

/// Runs the generation pipeline and persists the result.
pub async fn generate_resume(
    state: &AppState,
    job_url: &str,
    user_id: &str,
    user_data: UserData,
) -> Result<ResumeRow, AppError> {
    info!("Generating resume for user {user_id} from {job_url}");

    let github_username = user_data
        .github_username
        .clone()
        .filter(|username| !username.trim().is_empty());

    // The two upstream fetches are independent; issue them together.
    let (job_result, repos) = tokio::join!(
        job::fetch_job(&state.http, job_url),
        fetch_repositories_best_effort(
            &state.http,
            github_username.as_deref(),
            state.config.github_token.as_deref(),
        ),
    );

    // No resume row exists if the job fetch failed
    let job = job_result?;

    let skills = content::synthesize_skills(&state.llm, &job).await;

    let new_resume = assemble(user_id, &user_data, &job, skills, &repos)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume data: {e}")))?;

    let record = insert_resume(&state.db, &new_resume).await?;

    info!(
        "Created resume {} for user {user_id} ({} skills, {} projects)",
        record.id,
        record.skills.len(),
        new_resume.projects.len()
    );

    Ok(record)
}

/// GitHub data is always optional: a bad username or API failure logs a
/// warning and the resume is generated without projects.
async fn fetch_repositories_best_effort(
    client: &reqwest::Client,
    username: Option<&str>,
    token: Option<&str>,
) -> Vec<RepoSummary> {
    let Some(username) = username else {
        return Vec::new();
    };

    match github::fetch_repositories(client, username, token).await {
        Ok(repos) => repos,
        Err(e) => {
            warn!("GitHub fetch for {username} failed, continuing without projects: {e}");
            Vec::new()
        }
    }
}

/// Merges all fetched and user-submitted pieces into one record.
/// Pure: no I/O, fully unit-testable.
pub fn assemble(
    user_id: &str,
    user_data: &UserData,
    job: &JobPosting,
    skills: Vec<String>,
    repos: &[RepoSummary],
) -> Result<NewResume, serde_json::Error> {
    let summary = user_data.summary.clone().unwrap_or_default();
    let status = if summary.is_empty() {
        summary_status::PENDING
    } else {
        summary_status::READY
    };

    let github_data = if repos.is_empty() {
        None
    } else {
        Some(json!({ "repositories": repos }))
    };

    Ok(NewResume {
        user_id: user_id.to_string(),
        name: user_data.name.clone(),
        email: user_data.email.clone(),
        phone: user_data.phone.clone(),
        location: user_data.location.clone(),
        url: user_data.url.clone(),
        summary,
        summary_status: status,
        skills,
        projects: repos_to_projects(repos),
        job_data: serde_json::to_value(job)?,
        github_data,
    })
}

/// One project per repository. The highlight is the repo description, or a
/// fallback naming the detected language.
pub fn repos_to_projects(repos: &[RepoSummary]) -> Vec<Project> {
    repos
        .iter()
        .map(|repo| {
            let highlight = repo.description.clone().unwrap_or_else(|| match &repo.language {
                Some(language) => format!("A {language} project"),
                None => "An open-source project".to_string(),
            });

            let mut keywords = repo.topics.clone();
            if let Some(language) = &repo.language {
                if !keywords.contains(language) {
                    keywords.push(language.clone());
                }
            }

            Project {
                name: repo.name.clone(),
                url: Some(repo.url.clone()),
                highlights: vec![highlight],
                keywords,
            }
        })
        .collect()
}

async fn insert_resume(pool: &PgPool, new_resume: &NewResume) -> Result<ResumeRow, AppError> {
    let projects = serde_json::to_value(&new_resume.projects)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize projects: {e}")))?;

    let record = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, name, email, phone, location, url, summary, summary_status,
             work, education, skills, projects, job_data, github_data, linkedin_data)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9,
             '[]'::jsonb, '[]'::jsonb, $10, $11, $12, $13, NULL)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_resume.user_id)
    .bind(&new_resume.name)
    .bind(&new_resume.email)
    .bind(&new_resume.phone)
    .bind(&new_resume.location)
    .bind(&new_resume.url)
    .bind(&new_resume.summary)
    .bind(new_resume.summary_status)
    .bind(&new_resume.skills)
    .bind(projects)
    .bind(&new_resume.job_data)
    .bind(&new_resume.github_data)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::content::clean_skill_list;

    fn user_data(github_username: &str) -> UserData {
        UserData {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            github_username: Some(github_username.to_string()),
            phone: None,
            location: None,
            url: None,
            summary: None,
        }
    }

    fn repo(name: &str, description: Option<&str>, language: Option<&str>) -> RepoSummary {
        RepoSummary {
            name: name.to_string(),
            description: description.map(str::to_string),
            language: language.map(str::to_string),
            stars: 0,
            url: format!("https://github.com/u/{name}"),
            topics: vec![],
            updated_at: None,
        }
    }

    #[test]
    fn test_project_highlight_prefers_description() {
        let projects = repos_to_projects(&[repo("a", Some("Does a thing"), Some("Rust"))]);
        assert_eq!(projects[0].highlights, vec!["Does a thing".to_string()]);
    }

    #[test]
    fn test_project_highlight_falls_back_to_language() {
        let projects = repos_to_projects(&[repo("a", None, Some("Rust"))]);
        assert_eq!(projects[0].highlights, vec!["A Rust project".to_string()]);
    }

    #[test]
    fn test_project_highlight_without_description_or_language() {
        let projects = repos_to_projects(&[repo("a", None, None)]);
        assert_eq!(
            projects[0].highlights,
            vec!["An open-source project".to_string()]
        );
    }

    #[test]
    fn test_project_keywords_merge_topics_and_language() {
        let mut r = repo("a", None, Some("Rust"));
        r.topics = vec!["cli".to_string(), "Rust".to_string()];
        let projects = repos_to_projects(&[r]);
        assert_eq!(
            projects[0].keywords,
            vec!["cli".to_string(), "Rust".to_string()]
        );
    }

    /// End-to-end merge over stubbed upstream data: a Lever posting and a
    /// stubbed skill-synthesis response, no GitHub username.
    #[test]
    fn test_assemble_with_stubbed_job_and_skills() {
        let job = JobPosting {
            title: "Engineer".to_string(),
            description: "Looking for SQL and Python skills".to_string(),
            requirements: vec![],
            skills: vec!["sql".to_string(), "python".to_string()],
        };
        let skills = clean_skill_list("SQL, Python");

        let new_resume = assemble("u1", &user_data(""), &job, skills, &[]).unwrap();

        assert_eq!(new_resume.user_id, "u1");
        assert_eq!(new_resume.name, "A");
        assert_eq!(new_resume.email, "a@x.com");
        assert_eq!(
            new_resume.skills,
            vec!["SQL".to_string(), "Python".to_string()]
        );
        assert!(new_resume.projects.is_empty());
        assert_eq!(new_resume.summary, "");
        assert_eq!(new_resume.summary_status, summary_status::PENDING);
        assert!(new_resume.github_data.is_none());
        assert_eq!(new_resume.job_data["title"], "Engineer");
    }

    #[test]
    fn test_assemble_with_prior_summary_is_ready() {
        let job = JobPosting {
            title: "Engineer".to_string(),
            description: String::new(),
            requirements: vec![],
            skills: vec![],
        };
        let mut data = user_data("");
        data.summary = Some("Seasoned engineer.".to_string());

        let new_resume = assemble("u1", &data, &job, vec![], &[]).unwrap();
        assert_eq!(new_resume.summary, "Seasoned engineer.");
        assert_eq!(new_resume.summary_status, summary_status::READY);
    }

    #[test]
    fn test_assemble_embeds_github_data_when_repos_present() {
        let job = JobPosting {
            title: "Engineer".to_string(),
            description: String::new(),
            requirements: vec![],
            skills: vec![],
        };
        let repos = vec![repo("a", Some("Does a thing"), Some("Rust"))];

        let new_resume = assemble("u1", &user_data("someone"), &job, vec![], &repos).unwrap();
        let github_data = new_resume.github_data.unwrap();
        assert_eq!(github_data["repositories"][0]["name"], "a");
        assert_eq!(new_resume.projects.len(), 1);
    }
}
