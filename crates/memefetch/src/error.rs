//! Error types for memefetch
//!
//! Errors never cross the public fetch functions as `Err` values. They are
//! rendered into the `error` field of a result or the `message` of a tool
//! envelope, so callers always inspect data.

use thiserror::Error;

/// Broad failure category, used for logging and by tool callers that
/// want to branch without matching message strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was obtained (DNS, connect, timeout)
    Transport,
    /// A response was obtained with a non-200 status
    Http,
    /// Filtering produced zero entries
    EmptyResult,
    /// Caller-supplied input was rejected before any request
    Validation,
}

/// Errors that can occur while scraping
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure, no response
    #[error("Request error: {0}")]
    Transport(String),

    /// Failed to build HTTP client
    #[error("Request error: failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Listing endpoint answered with a non-200 status
    #[error("Failed to fetch data: Status code {0}")]
    ListingStatus(u16),

    /// Detail page answered with a non-200 status
    #[error("Failed to fetch URL: HTTP {0}")]
    PageStatus(u16),

    /// No anchor survived filtering
    #[error("No memes found")]
    EmptyResult,

    /// `url` parameter missing for a detail fetch
    #[error("URL is required for get_meme_details action")]
    MissingUrl,

    /// Dispatch received an action it does not know
    #[error("Unknown action: {0}. Available actions: get_newest_memes, get_meme_details")]
    UnknownAction(String),

    /// Parameters present but malformed
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl ScrapeError {
    /// Create an error from a failed `send()` or body read.
    ///
    /// Client construction failures use [`ScrapeError::ClientBuildError`]
    /// directly; everything here is a transport error whose message carries
    /// the reqwest error and its source chain.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ScrapeError::Transport(message)
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Transport(_) | ScrapeError::ClientBuildError(_) => ErrorKind::Transport,
            ScrapeError::ListingStatus(_) | ScrapeError::PageStatus(_) => ErrorKind::Http,
            ScrapeError::EmptyResult => ErrorKind::EmptyResult,
            ScrapeError::MissingUrl
            | ScrapeError::UnknownAction(_)
            | ScrapeError::InvalidParams(_) => ErrorKind::Validation,
        }
    }
}
