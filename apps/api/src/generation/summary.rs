//! Summary synthesis — re-fetches the job page independently of the job
//! scraper, reduces it to plain text, and asks the LLM for a short narrative
//! summary. Unlike skill synthesis, failures here propagate: the caller owns
//! the summary request and must see it fail.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::content::truncate_chars;
use crate::generation::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::{CallParams, LlmClient, LlmStream};
use crate::models::resume::summary_status;
use crate::scrape::{ScrapeError, BROWSER_UA};

/// Page text is truncated before prompting.
pub const MAX_JOB_TEXT_CHARS: usize = 2000;

const SUMMARY_PARAMS: CallParams = CallParams {
    max_tokens: 300,
    temperature: 0.7,
};

/// Fetches the job page and reduces it to collapsed plain text.
/// Deliberately board-agnostic: any reachable page works here.
pub async fn fetch_job_text(
    client: &reqwest::Client,
    job_url: &str,
) -> Result<String, ScrapeError> {
    let response = client
        .get(job_url)
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
    Ok(truncate_chars(&html_to_text(&html), MAX_JOB_TEXT_CHARS))
}

/// Strips markup and collapses all whitespace runs to single spaces.
pub fn html_to_text(html: &str) -> String {
    let doc = scraper::Html::parse_document(html);
    let text = doc.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn build_prompt(job_text: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{job_text}", job_text)
}

/// Buffered variant: returns the complete summary text.
pub async fn generate_summary(
    client: &reqwest::Client,
    llm: &LlmClient,
    job_url: &str,
) -> Result<String, AppError> {
    let job_text = fetch_job_text(client, job_url).await?;
    llm.call_text(&build_prompt(&job_text), SUMMARY_SYSTEM, SUMMARY_PARAMS)
        .await
        .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))
}

/// Streaming variant: opens the LLM stream after the page fetch succeeds,
/// so all pre-stream failures surface as normal errors.
pub async fn open_summary_stream(
    client: &reqwest::Client,
    llm: &LlmClient,
    job_url: &str,
) -> Result<LlmStream, AppError> {
    let job_text = fetch_job_text(client, job_url).await?;
    llm.call_stream(&build_prompt(&job_text), SUMMARY_SYSTEM, SUMMARY_PARAMS)
        .await
        .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))
}

/// Marks the summary lifecycle state on a resume. Returns the number of
/// rows touched so callers can 404 on unknown resume ids.
pub async fn set_summary_status(
    pool: &PgPool,
    resume_id: Uuid,
    status: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE resumes SET summary_status = $2 WHERE id = $1")
        .bind(resume_id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Persists a completed summary and flips the status to ready.
pub async fn store_summary(
    pool: &PgPool,
    resume_id: Uuid,
    summary: &str,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE resumes SET summary = $2, summary_status = $3 WHERE id = $1")
            .bind(resume_id)
            .bind(summary)
            .bind(summary_status::READY)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Engineer</h1>\n\n  <p>Build   <b>things</b>.</p></body></html>";
        assert_eq!(html_to_text(html), "Engineer Build things .");
    }

    #[test]
    fn test_html_to_text_on_plain_text() {
        assert_eq!(html_to_text("just   words"), "just words");
    }

    #[test]
    fn test_build_prompt_embeds_job_text() {
        let prompt = build_prompt("We need a Rust engineer");
        assert!(prompt.contains("We need a Rust engineer"));
        assert!(!prompt.contains("{job_text}"));
    }
}
