pub mod github;
pub mod handlers;
pub mod job;
pub mod linkedin;
pub mod skills;

use thiserror::Error;

/// UA sent on all scraping requests. Job boards serve a bot-unfriendly
/// page (or none at all) to default client UAs.
pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported job board: {0}")]
    UnsupportedBoard(String),

    #[error("fetch failed for {url} (status {status})")]
    FetchFailed { url: String, status: u16 },

    #[error("GitHub API error (status {status}): {message}")]
    GitHubApi { status: u16, message: String },
}
