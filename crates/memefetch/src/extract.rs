//! Listing extraction: link filtering and title resolution
//!
//! The title chain and class override track the site's current markup.
//! Keep them inside [`resolve_title`] so markup changes touch one place.

use crate::types::MemeSummary;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Every meme page lives under this path
const MEMES_PREFIX: &str = "/memes/";

/// Index pages that share the meme prefix
const RESERVED_PREFIXES: &[&str] = &["/memes/new", "/memes/trending", "/memes/confirmed"];

/// Title used when nothing else is available
pub const UNKNOWN_TITLE: &str = "Unknown Meme";

static PAGINATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/\d+|\?page=\d+").expect("valid pagination pattern"));

static CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href*='/memes/']").expect("valid anchor selector"));

/// Attribute view of an anchor, all that title resolution looks at
#[derive(Debug, Clone, Default)]
pub struct Anchor<'a> {
    pub href: &'a str,
    pub alt: Option<&'a str>,
    pub title: Option<&'a str>,
    pub data_author: Option<&'a str>,
    pub text: String,
    pub is_item: bool,
}

impl<'a> Anchor<'a> {
    fn from_element(element: &ElementRef<'a>) -> Self {
        let value = element.value();
        Self {
            href: value.attr("href").unwrap_or_default(),
            alt: value.attr("alt"),
            title: value.attr("title"),
            data_author: value.attr("data-author"),
            text: element.text().collect::<String>().trim().to_string(),
            is_item: value.classes().any(|class| class == "item"),
        }
    }
}

/// Returns true if `href` points at an individual meme page
pub fn is_meme_link(href: &str) -> bool {
    href.starts_with(MEMES_PREFIX)
        && !RESERVED_PREFIXES
            .iter()
            .any(|prefix| href.starts_with(prefix))
        && !PAGINATION.is_match(href)
        && !href.contains("/categories/")
}

/// Resolve the display title of a listing anchor
///
/// First non-empty of: `alt`, `title`, `data-author`, visible text,
/// humanized last path segment, [`UNKNOWN_TITLE`]. Anchors carrying the
/// `item` class take their `alt` whenever it is present.
pub fn resolve_title(anchor: &Anchor<'_>) -> String {
    let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

    let title = non_empty(anchor.alt)
        .or_else(|| non_empty(anchor.title))
        .or_else(|| non_empty(anchor.data_author))
        .or_else(|| non_empty(Some(anchor.text.as_str())))
        .or_else(|| non_empty(Some(humanize_slug(anchor.href).as_str())))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    if anchor.is_item {
        if let Some(alt) = non_empty(anchor.alt) {
            return alt;
        }
    }
    title
}

/// Humanize the last path segment: `foo-bar` becomes `Foo Bar`
pub fn humanize_slug(href: &str) -> String {
    let segment = href.rsplit('/').next().unwrap_or_default();
    title_case(&segment.replace('-', " "))
}

/// Upper-case a letter that follows a non-letter, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

fn is_numeric_title(title: &str) -> bool {
    !title.is_empty() && title.chars().all(char::is_numeric)
}

/// Extract meme entries from listing HTML, in document order
///
/// Relative links are absolutized against `origin`. Duplicated URLs and
/// purely numeric titles are dropped; at most `limit` entries are returned.
pub fn extract_memes(html: &str, origin: &str, limit: usize) -> Vec<MemeSummary> {
    let origin = origin.trim_end_matches('/');
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut memes = Vec::new();

    for element in document.select(&CANDIDATES) {
        if memes.len() >= limit {
            break;
        }

        let anchor = Anchor::from_element(&element);
        if !is_meme_link(anchor.href) {
            continue;
        }

        let title = resolve_title(&anchor);
        let url = if anchor.href.starts_with('/') {
            format!("{origin}{}", anchor.href)
        } else {
            anchor.href.to_string()
        };

        if is_numeric_title(&title) || seen.contains(&url) {
            continue;
        }
        seen.insert(url.clone());
        memes.push(MemeSummary { title, url });
    }

    memes
}
