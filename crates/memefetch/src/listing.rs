//! Listing fetcher: newest submissions index

use crate::client::{self, FetchOptions};
use crate::error::ScrapeError;
use crate::extract::extract_memes;
use crate::types::{ListingFailure, ListingOutcome};
use tracing::{debug, warn};

/// Listing path, sorted newest first by the site
pub const LISTING_PATH: &str = "/memes?kind=submissions&sort=newest";

/// Full listing URL for an origin
pub fn listing_url(options: &FetchOptions) -> String {
    format!("{}{}", options.origin(), LISTING_PATH)
}

/// Fetch the newest memes from the listing page
///
/// Returns at most `limit` entries in document order. When nothing survives
/// filtering and `include_html_on_empty` is set, a diagnostic record holding
/// the raw HTML is returned instead of an empty list.
pub async fn fetch_listing(
    limit: usize,
    include_html_on_empty: bool,
    options: &FetchOptions,
) -> ListingOutcome {
    let url = listing_url(options);

    let response = match client::get(&url, options).await {
        Ok(response) => response,
        Err(err) => {
            warn!(url = %url, kind = ?err.kind(), error = %err, "listing request failed");
            return ListingOutcome::failed(&err);
        }
    };

    if response.status_code != 200 {
        let err = ScrapeError::ListingStatus(response.status_code);
        warn!(url = %url, status = response.status_code, "listing returned non-200");
        return ListingOutcome::failed(&err);
    }

    let memes = extract_memes(&response.body, options.origin(), limit);
    debug!(count = memes.len(), limit, "listing extracted");

    if memes.is_empty() && include_html_on_empty {
        return ListingOutcome::Failed(ListingFailure {
            error: ScrapeError::EmptyResult.to_string(),
            html: Some(response.body),
        });
    }

    ListingOutcome::Memes(memes)
}
