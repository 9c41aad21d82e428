//! Core types for memefetch

use schemars::JsonSchema;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ScrapeError;

/// Default number of memes returned by `get_newest_memes`
pub const DEFAULT_LIMIT: usize = 5;

/// One entry of the newest-memes listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemeSummary {
    /// Display title resolved from the listing anchor
    pub title: String,
    /// Absolute URL of the meme page
    pub url: String,
}

/// Result of fetching a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageFetchResult {
    /// Raw response body, empty on transport failure
    pub html: String,

    /// HTTP status code, 0 when no response was obtained
    pub status_code: u16,

    /// Final URL after redirects, or the requested URL on transport failure
    pub url: String,

    /// Present iff the fetch failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageFetchResult {
    /// True if the page was fetched with status 200
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Diagnostic record returned in place of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListingFailure {
    /// Human-readable failure
    pub error: String,
    /// Raw listing HTML, only when the caller asked for it on empty results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Outcome of a listing fetch
///
/// Serializes as a JSON array either way: the memes, or a single
/// diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    Memes(Vec<MemeSummary>),
    Failed(ListingFailure),
}

impl ListingOutcome {
    pub(crate) fn failed(err: &ScrapeError) -> Self {
        ListingOutcome::Failed(ListingFailure {
            error: err.to_string(),
            html: None,
        })
    }

    /// The memes, or an empty slice on failure
    pub fn memes(&self) -> &[MemeSummary] {
        match self {
            ListingOutcome::Memes(memes) => memes,
            ListingOutcome::Failed(_) => &[],
        }
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            ListingOutcome::Memes(_) => None,
            ListingOutcome::Failed(failure) => Some(&failure.error),
        }
    }

    /// Consume into the memes, dropping any failure record
    pub fn into_memes(self) -> Vec<MemeSummary> {
        match self {
            ListingOutcome::Memes(memes) => memes,
            ListingOutcome::Failed(_) => Vec::new(),
        }
    }
}

impl Serialize for ListingOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListingOutcome::Memes(memes) => memes.serialize(serializer),
            ListingOutcome::Failed(failure) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(failure)?;
                seq.end()
            }
        }
    }
}

/// Parameters of the `get_newest_memes` tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewestMemesParams {
    /// Maximum number of memes to return (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Parameters of the `get_meme_details` tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MemeDetailsParams {
    /// URL of the meme to fetch details for (absolute, or a site path like /memes/doge)
    pub url: String,
}

/// Actions understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Fetch the newest memes listing
    GetNewestMemes,
    /// Fetch one meme page
    GetMemeDetails,
}

impl Action {
    /// All actions, in the order they are advertised
    pub const ALL: [Action; 2] = [Action::GetNewestMemes, Action::GetMemeDetails];

    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetNewestMemes => "get_newest_memes",
            Action::GetMemeDetails => "get_meme_details",
        }
    }
}

impl FromStr for Action {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_newest_memes" => Ok(Action::GetNewestMemes),
            "get_meme_details" => Ok(Action::GetMemeDetails),
            other => Err(ScrapeError::UnknownAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool invocation as sent by single-tool agent frameworks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Action name, kept as a string so unknown actions reach the dispatcher
    pub action: String,
    /// Parameters for the action
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Payload of a successful tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolData {
    Memes(ListingOutcome),
    Page(PageFetchResult),
}

/// Status envelope returned by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResponse {
    Success { data: ToolData },
    Error { message: String },
}

impl ToolResponse {
    pub(crate) fn error(err: &ScrapeError) -> Self {
        ToolResponse::Error {
            message: err.to_string(),
        }
    }

    /// True for `status: "success"`
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success { .. })
    }

    /// Error message for `status: "error"`
    pub fn message(&self) -> Option<&str> {
        match self {
            ToolResponse::Success { .. } => None,
            ToolResponse::Error { message } => Some(message),
        }
    }
}
