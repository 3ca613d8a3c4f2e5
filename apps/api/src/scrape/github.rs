//! GitHub profile scraper: public repositories only, first page, projected
//! into the simplified shape the resume pipeline embeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scrape::{ScrapeError, BROWSER_UA};

const GITHUB_API_URL: &str = "https://api.github.com";
const MAX_REPOS: usize = 10;

/// Raw repository shape returned by the GitHub REST API (fields we keep).
#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: u32,
    html_url: String,
    #[serde(default)]
    topics: Vec<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Simplified repository projection embedded into `github_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u32,
    pub url: String,
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lists a user's public repositories, best ten by star count.
/// A user with zero repositories yields an empty list, not an error.
/// No pagination, no caching — every generation re-fetches.
pub async fn fetch_repositories(
    client: &reqwest::Client,
    username: &str,
    token: Option<&str>,
) -> Result<Vec<RepoSummary>, ScrapeError> {
    let url = format!("{GITHUB_API_URL}/users/{username}/repos?per_page=100&sort=pushed");

    let mut request = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json");
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ScrapeError::GitHubApi {
            status: status.as_u16(),
            message,
        });
    }

    let repos: Vec<ApiRepo> = response.json().await?;
    Ok(project_repositories(repos))
}

fn project_repositories(mut repos: Vec<ApiRepo>) -> Vec<RepoSummary> {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos.truncate(MAX_REPOS);
    repos
        .into_iter()
        .map(|repo| RepoSummary {
            name: repo.name,
            description: repo.description.filter(|d| !d.is_empty()),
            language: repo.language,
            stars: repo.stargazers_count,
            url: repo.html_url,
            topics: repo.topics,
            updated_at: repo.updated_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_repo(name: &str, stars: u32) -> ApiRepo {
        ApiRepo {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            language: Some("Rust".to_string()),
            stargazers_count: stars,
            html_url: format!("https://github.com/u/{name}"),
            topics: vec![],
            updated_at: None,
        }
    }

    #[test]
    fn test_projection_sorts_by_stars_descending() {
        let projected = project_repositories(vec![
            api_repo("low", 1),
            api_repo("high", 50),
            api_repo("mid", 10),
        ]);
        let names: Vec<&str> = projected.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_projection_caps_at_ten_repositories() {
        let repos: Vec<ApiRepo> = (0u32..25).map(|i| api_repo(&format!("r{i}"), i)).collect();
        let projected = project_repositories(repos);
        assert_eq!(projected.len(), 10);
        // The ten most-starred survive the cap
        assert!(projected.iter().all(|r| r.stars >= 15));
    }

    #[test]
    fn test_projection_of_empty_list_is_empty() {
        assert!(project_repositories(vec![]).is_empty());
    }

    #[test]
    fn test_empty_description_becomes_none() {
        let mut repo = api_repo("x", 0);
        repo.description = Some(String::new());
        let projected = project_repositories(vec![repo]);
        assert!(projected[0].description.is_none());
    }

    #[test]
    fn test_api_repo_deserializes_from_github_shape() {
        let json = r#"{
            "name": "tailor",
            "description": "Resume tailoring service",
            "language": "Rust",
            "stargazers_count": 42,
            "html_url": "https://github.com/u/tailor",
            "topics": ["resume", "axum"],
            "updated_at": "2025-11-03T12:00:00Z",
            "fork": false,
            "size": 123
        }"#;
        let repo: ApiRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "tailor");
        assert_eq!(repo.stargazers_count, 42);
        assert_eq!(repo.topics.len(), 2);
        assert!(repo.updated_at.is_some());
    }

    #[test]
    fn test_api_repo_tolerates_missing_optional_fields() {
        let json = r#"{
            "name": "bare",
            "description": null,
            "language": null,
            "stargazers_count": 0,
            "html_url": "https://github.com/u/bare",
            "updated_at": null
        }"#;
        let repo: ApiRepo = serde_json::from_str(json).unwrap();
        assert!(repo.topics.is_empty());
        assert!(repo.language.is_none());
    }
}
