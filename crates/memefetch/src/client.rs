//! HTTP client for memefetch
//!
//! Both pipelines share the header set and client construction defined here.
//! Each call issues exactly one GET; there is no retry.

use crate::error::ScrapeError;
use crate::{DEFAULT_ORIGIN, DEFAULT_USER_AGENT};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT,
};
use std::time::Duration;
use tracing::debug;

/// Accept header sent by desktop browsers for page navigations
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Fetch options that can be configured via tool builder
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Site origin used for the listing URL and to absolutize paths
    pub origin: String,
    /// Custom User-Agent (defaults to a desktop browser string)
    pub user_agent: Option<String>,
    /// Total request timeout; `None` leaves the client default in place
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl FetchOptions {
    /// Origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.origin.trim_end_matches('/')
    }
}

/// A completed GET, whatever its status
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status_code: u16,
    pub final_url: String,
    pub body: String,
}

/// Browser-mimicking header set, identical for listing and detail requests
pub fn browser_headers(user_agent: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let user_agent = user_agent.unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// Turn a site-relative path into an absolute URL under `origin`
///
/// Anything already starting with `http` is returned unchanged.
pub fn normalize_url(url: &str, origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if url.starts_with("http") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("{origin}{url}")
    } else {
        format!("{origin}/{url}")
    }
}

/// Issue a single GET with the browser header set
pub(crate) async fn get(url: &str, options: &FetchOptions) -> Result<RawResponse, ScrapeError> {
    let mut builder =
        reqwest::Client::builder().default_headers(browser_headers(options.user_agent.as_deref()));
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(ScrapeError::ClientBuildError)?;

    debug!(url, "GET");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(ScrapeError::from_reqwest)?;

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let body = response.text().await.map_err(ScrapeError::from_reqwest)?;
    debug!(url, status_code, bytes = body.len(), "response received");

    Ok(RawResponse {
        status_code,
        final_url,
        body,
    })
}
