//! memefetch - agent-friendly scraper for Know Your Meme
//!
//! Two independent pipelines, each a single HTTP GET:
//!
//! - [`fetch_listing`] reads the newest-submissions index, filters meme
//!   links and resolves their titles
//! - [`fetch_detail`] returns the raw HTML and status of one page
//!
//! [`Tool`] wraps both for agent frameworks: typed entry points, an action
//! dispatcher returning a `{status, data | message}` envelope, and
//! function-calling schemas. Failures are always reported as data.

pub mod client;
mod detail;
mod error;
pub mod extract;
pub mod insights;
mod listing;
mod tool;
mod types;

pub use client::{normalize_url, FetchOptions};
pub use detail::fetch_detail;
pub use error::{ErrorKind, ScrapeError};
pub use extract::{extract_memes, resolve_title, Anchor};
pub use insights::{
    summarize, AnalyzedMeme, ContentQuality, InsightsSummary, PageInsights, QualityDistribution,
    SummaryOutcome,
};
pub use listing::{fetch_listing, LISTING_PATH};
pub use tool::{Tool, ToolBuilder};
pub use types::{
    Action, ListingFailure, ListingOutcome, MemeDetailsParams, MemeSummary, NewestMemesParams,
    PageFetchResult, ToolCall, ToolData, ToolResponse, DEFAULT_LIMIT,
};

/// Site the scraper targets unless configured otherwise
pub const DEFAULT_ORIGIN: &str = "https://knowyourmeme.com";

/// Desktop browser User-Agent; the site rejects obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Tool name advertised to agent frameworks
pub const TOOL_NAME: &str = "know_your_meme_tool";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = "Tool for retrieving information about internet memes from KnowYourMeme.com";

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# Know Your Meme Tool

Retrieves the newest meme submissions from KnowYourMeme.com and the raw HTML
of individual meme pages.

## Actions

### get_newest_memes
- `limit` (optional): Maximum number of memes to return (default: 5)

Returns a list of `{"title", "url"}` objects in the order the site lists
them (newest first). A failed fetch returns a single `{"error"}` object.

### get_meme_details
- `url` (required): Absolute URL, or a site path such as `/memes/doge`

Returns `{"html", "status_code", "url"}`. `url` is the final URL after
redirects. `error` is present when the status is not 200 or the request
failed (then `status_code` is 0 and `html` is empty).

## Envelope
Dispatched calls return `{"status": "success", "data": ...}` or
`{"status": "error", "message": "..."}`.

## Examples

### Three newest memes
```json
{"action": "get_newest_memes", "params": {"limit": 3}}
```

### One meme page
```json
{"action": "get_meme_details", "params": {"url": "/memes/doge"}}
```

## Error Handling
- Missing `url` or an unknown action returns an error envelope without any request
- Non-200 responses keep the body and add `error`
- Nothing is retried
"#;
