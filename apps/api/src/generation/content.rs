//! Skill synthesis — asks the LLM for a comma-separated skill list over the
//! scraped job posting, then cleans the raw text into discrete entries.
//!
//! This step is best-effort by design: any failure degrades to an empty
//! skill list so resume generation can continue.

use tracing::warn;

use crate::generation::prompts::{SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM};
use crate::llm_client::{CallParams, LlmClient};
use crate::scrape::job::JobPosting;

/// Job descriptions are truncated before prompting; the posting boilerplate
/// past this point rarely adds skill signal.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Entries longer than this are model chatter, not skills.
const MAX_SKILL_CHARS: usize = 29;

const SKILL_PARAMS: CallParams = CallParams {
    max_tokens: 200,
    temperature: 0.2,
};

/// Synthesizes resume skills for a job posting. Never fails: network or
/// model errors log a warning and yield an empty list.
pub async fn synthesize_skills(llm: &LlmClient, job: &JobPosting) -> Vec<String> {
    let description = truncate_chars(&job.description, MAX_DESCRIPTION_CHARS);
    let prompt = SKILLS_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{job_description}", &description);

    match llm.call_text(&prompt, SKILLS_SYSTEM, SKILL_PARAMS).await {
        Ok(raw) => clean_skill_list(&raw),
        Err(e) => {
            warn!("Skill synthesis failed, continuing with empty skills: {e}");
            Vec::new()
        }
    }
}

/// Cleans raw model output into a skill list:
/// a leading clause ending in a colon before the first comma is stripped
/// ("Based on the posting: SQL, Python" → "SQL, Python"), entries are
/// trimmed, and anything empty or over 29 characters is dropped.
pub fn clean_skill_list(raw: &str) -> Vec<String> {
    let text = raw.trim();
    let text = match (text.find(':'), text.find(',')) {
        (Some(colon), Some(comma)) if colon < comma => &text[colon + 1..],
        (Some(colon), None) => &text[colon + 1..],
        _ => text,
    };

    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && entry.chars().count() <= MAX_SKILL_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
