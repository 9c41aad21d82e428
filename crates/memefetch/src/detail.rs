//! Detail fetcher: one meme page's raw HTML

use crate::client::{self, normalize_url, FetchOptions};
use crate::error::ScrapeError;
use crate::types::PageFetchResult;
use tracing::warn;

/// Fetch the HTML of a single page
///
/// Site-relative paths are resolved against the configured origin. Any
/// completed GET returns its body and status; a non-200 status additionally
/// sets `error`. Transport failures return an empty body and status 0.
pub async fn fetch_detail(url: &str, options: &FetchOptions) -> PageFetchResult {
    let url = normalize_url(url, options.origin());

    match client::get(&url, options).await {
        Ok(response) => {
            let error = (response.status_code != 200).then(|| {
                warn!(url = %url, status = response.status_code, "page returned non-200");
                ScrapeError::PageStatus(response.status_code).to_string()
            });
            PageFetchResult {
                html: response.body,
                status_code: response.status_code,
                url: response.final_url,
                error,
            }
        }
        Err(err) => {
            warn!(url = %url, kind = ?err.kind(), error = %err, "page request failed");
            PageFetchResult {
                html: String::new(),
                status_code: 0,
                url,
                error: Some(err.to_string()),
            }
        }
    }
}
