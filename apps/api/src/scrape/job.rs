//! Job-posting scraper. The board is resolved from the URL host once, then a
//! board-specific selector set pulls structured fields out of the page.

use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::scrape::skills::extract_skills;
use crate::scrape::{ScrapeError, BROWSER_UA};

/// Structured fields extracted from one job posting page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
}

/// Supported job boards, resolved once per request from the URL host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobBoard {
    Lever,
    Greenhouse,
}

impl JobBoard {
    pub fn detect(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        if host.contains("lever.co") {
            Some(JobBoard::Lever)
        } else if host.contains("greenhouse.io") {
            Some(JobBoard::Greenhouse)
        } else {
            None
        }
    }
}

/// Fetches a job posting page and extracts its structured fields.
/// An unrecognized board fails before any network traffic; a non-2xx
/// response fails with the status embedded. No retries.
pub async fn fetch_job(client: &reqwest::Client, job_url: &str) -> Result<JobPosting, ScrapeError> {
    let url =
        Url::parse(job_url).map_err(|_| ScrapeError::InvalidUrl(job_url.to_string()))?;
    let board = JobBoard::detect(&url).ok_or_else(|| {
        ScrapeError::UnsupportedBoard(url.host_str().unwrap_or(job_url).to_string())
    })?;

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::FetchFailed {
            url: job_url.to_string(),
            status: status.as_u16(),
        });
    }

    let html = response.text().await?;
    Ok(extract_job(&html, board))
}

/// Extracts posting fields from raw HTML for a known board.
/// Synchronous on purpose: `scraper::Html` must never be held across an
/// await point (it is not `Send`).
pub fn extract_job(html: &str, board: JobBoard) -> JobPosting {
    let doc = Html::parse_document(html);
    match board {
        JobBoard::Lever => extract_lever(&doc),
        JobBoard::Greenhouse => extract_greenhouse(&doc),
    }
}

fn extract_lever(doc: &Html) -> JobPosting {
    let title = select_text(doc, ".posting-headline h2");
    let description = select_text(doc, ".section[data-qa='job-description']");
    let requirements = select_all_text(doc, ".posting-requirements li");

    // Lever postings keep most skill signals in the requirements bullets
    let skill_text = format!("{} {}", description, requirements.join(" "));
    let skills = extract_skills(&skill_text);

    JobPosting {
        title,
        description,
        requirements,
        skills,
    }
}

fn extract_greenhouse(doc: &Html) -> JobPosting {
    let title = select_text(doc, "#header .app-title");
    let description = select_text(doc, "#content");
    let requirements = select_all_text(doc, "#content ul li");
    let skills = extract_skills(&description);

    JobPosting {
        title,
        description,
        requirements,
        skills,
    }
}

fn select_text(doc: &Html, selector: &str) -> String {
    let selector = Selector::parse(selector).expect("static selector");
    doc.select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}

fn select_all_text(doc: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("static selector");
    doc.select(&selector)
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVER_HTML: &str = r#"
        <html><body>
          <div class="posting-headline"><h2>Senior Backend Engineer</h2></div>
          <div class="section" data-qa="job-description">
            <p>We build data platforms in Python and love SQL.</p>
          </div>
          <div class="posting-requirements">
            <ul>
              <li>5+ years with Python</li>
              <li>Production Docker experience</li>
            </ul>
          </div>
        </body></html>
    "#;

    const GREENHOUSE_HTML: &str = r#"
        <html><body>
          <div id="header"><h1 class="app-title">Platform Engineer</h1></div>
          <div id="content">
            <p>Kubernetes and Go in production.</p>
            <ul>
              <li>Ship reliable services</li>
              <li>Own deployments end to end</li>
            </ul>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_detect_lever_board() {
        let url = Url::parse("https://jobs.lever.co/acme/123").unwrap();
        assert_eq!(JobBoard::detect(&url), Some(JobBoard::Lever));
    }

    #[test]
    fn test_detect_greenhouse_board() {
        let url = Url::parse("https://boards.greenhouse.io/acme/jobs/123").unwrap();
        assert_eq!(JobBoard::detect(&url), Some(JobBoard::Greenhouse));
    }

    #[test]
    fn test_detect_unknown_board() {
        let url = Url::parse("https://careers.example.com/jobs/123").unwrap();
        assert_eq!(JobBoard::detect(&url), None);
    }

    #[tokio::test]
    async fn test_fetch_job_rejects_unsupported_board_without_fetching() {
        let client = reqwest::Client::new();
        let result = fetch_job(&client, "https://careers.example.com/jobs/123").await;
        assert!(matches!(result, Err(ScrapeError::UnsupportedBoard(_))));
    }

    #[tokio::test]
    async fn test_fetch_job_rejects_unparseable_url() {
        let client = reqwest::Client::new();
        let result = fetch_job(&client, "not a url").await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
    }

    #[test]
    fn test_extract_lever_posting() {
        let posting = extract_job(LEVER_HTML, JobBoard::Lever);
        assert_eq!(posting.title, "Senior Backend Engineer");
        assert!(posting.description.contains("data platforms"));
        assert_eq!(
            posting.requirements,
            vec![
                "5+ years with Python".to_string(),
                "Production Docker experience".to_string()
            ]
        );
        // Skills come from description + requirements on Lever
        assert_eq!(
            posting.skills,
            vec![
                "python".to_string(),
                "sql".to_string(),
                "docker".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_greenhouse_posting() {
        let posting = extract_job(GREENHOUSE_HTML, JobBoard::Greenhouse);
        assert_eq!(posting.title, "Platform Engineer");
        assert!(posting.description.contains("Kubernetes"));
        assert_eq!(posting.requirements.len(), 2);
        // Skills come from the description only on Greenhouse
        assert_eq!(
            posting.skills,
            vec!["go".to_string(), "kubernetes".to_string()]
        );
    }

    #[test]
    fn test_extract_missing_nodes_yield_empty_fields() {
        let posting = extract_job("<html><body></body></html>", JobBoard::Lever);
        assert!(posting.title.is_empty());
        assert!(posting.description.is_empty());
        assert!(posting.requirements.is_empty());
        assert!(posting.skills.is_empty());
    }
}
