//! Structural insights over fetched meme pages
//!
//! Cheap markup facts an agent can use to triage pages before reading them.

use crate::types::{MemeSummary, PageFetchResult};
use schemars::JsonSchema;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Sections a complete meme entry usually has
const SECTIONS: [&str; 3] = ["Origin", "Spread", "Examples"];

/// Rough content quality bucket, by paragraph count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentQuality {
    High,
    Medium,
    Low,
}

impl ContentQuality {
    /// More than 10 paragraphs is high, more than 5 medium
    pub fn from_paragraphs(count: usize) -> Self {
        if count > 10 {
            ContentQuality::High
        } else if count > 5 {
            ContentQuality::Medium
        } else {
            ContentQuality::Low
        }
    }
}

/// Facts extracted from one page's HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageInsights {
    pub paragraph_count: usize,
    pub image_count: usize,
    pub has_twitter_card: bool,
    pub has_og_image: bool,
    pub has_origin_section: bool,
    pub has_spread_section: bool,
    pub has_examples_section: bool,
    pub estimated_content_quality: ContentQuality,
}

impl PageInsights {
    /// Analyze page HTML
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let count = |css: &str| {
            Selector::parse(css)
                .map(|selector| document.select(&selector).count())
                .unwrap_or(0)
        };

        // Section names are matched anywhere in the page, headings included
        let lowered = html.to_lowercase();
        let has_section = |name: &str| lowered.contains(&name.to_lowercase());

        let paragraph_count = count("p");
        let [origin, spread, examples] = SECTIONS.map(has_section);

        Self {
            paragraph_count,
            image_count: count("img"),
            has_twitter_card: count(r#"meta[name="twitter:card"], meta[property="twitter:card"]"#) > 0,
            has_og_image: count(r#"meta[property="og:image"], meta[name="og:image"]"#) > 0,
            has_origin_section: origin,
            has_spread_section: spread,
            has_examples_section: examples,
            estimated_content_quality: ContentQuality::from_paragraphs(paragraph_count),
        }
    }
}

/// A meme with its page insights
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzedMeme {
    pub title: String,
    pub url: String,
    pub http_status: u16,
    pub content_length: usize,
    pub analysis: PageInsights,
}

impl AnalyzedMeme {
    /// Analyze a fetched page for a listing entry
    pub fn new(meme: &MemeSummary, page: &PageFetchResult) -> Self {
        Self {
            title: meme.title.clone(),
            url: meme.url.clone(),
            http_status: page.status_code,
            content_length: page.html.len(),
            analysis: PageInsights::from_html(&page.html),
        }
    }
}

/// Count of pages per quality bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregate over many analyzed pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightsSummary {
    pub total_memes_processed: usize,
    pub average_content_length: f64,
    pub content_quality_distribution: QualityDistribution,
    pub memes_with_origin_section: usize,
    pub memes_with_spread_section: usize,
    pub memes_with_examples_section: usize,
}

/// Summary, or an error record when nothing was analyzed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryOutcome {
    Summary(InsightsSummary),
    Empty { error: String },
}

/// Summarize analyzed pages
pub fn summarize(memes: &[AnalyzedMeme]) -> SummaryOutcome {
    if memes.is_empty() {
        return SummaryOutcome::Empty {
            error: "No memes have been processed".to_string(),
        };
    }

    let total = memes.len();
    let total_length: usize = memes.iter().map(|m| m.content_length).sum();
    let mut distribution = QualityDistribution::default();
    for meme in memes {
        match meme.analysis.estimated_content_quality {
            ContentQuality::High => distribution.high += 1,
            ContentQuality::Medium => distribution.medium += 1,
            ContentQuality::Low => distribution.low += 1,
        }
    }
    let with = |pred: fn(&PageInsights) -> bool| memes.iter().filter(|m| pred(&m.analysis)).count();

    SummaryOutcome::Summary(InsightsSummary {
        total_memes_processed: total,
        average_content_length: total_length as f64 / total as f64,
        content_quality_distribution: distribution,
        memes_with_origin_section: with(|a| a.has_origin_section),
        memes_with_spread_section: with(|a| a.has_spread_section),
        memes_with_examples_section: with(|a| a.has_examples_section),
    })
}
