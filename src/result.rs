//! Search result types.

use serde::{Deserialize, Serialize};

/// Domains whose results are classified as news.
const NEWS_DOMAINS: &[&str] = &[
    "cnn.com",
    "bbc.com",
    "nytimes.com",
    "reuters.com",
    "washingtonpost.com",
    "apnews.com",
    "foxnews.com",
    "nbcnews.com",
    "theguardian.com",
    "time.com",
    "bloomberg.com",
    "wsj.com",
    "cnbc.com",
    "aljazeera.com",
    "huffpost.com",
];

/// Broad category of a search result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCategory {
    /// Standard web result.
    #[default]
    Web,
    /// Article from a known news outlet.
    News,
}

/// A single search result, normalized across engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Absolute destination URL.
    pub link: String,
    /// Result description/snippet.
    pub snippet: String,
    /// Identifier of the engine that produced this result.
    pub source: String,
}

impl SearchResult {
    /// Creates a new search result with no source attached.
    pub fn new(
        link: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
            source: String::new(),
        }
    }

    /// Sets the engine identifier that produced this result.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Returns true when the link is an absolute `http://` or `https://` URL.
    pub fn has_absolute_link(&self) -> bool {
        is_absolute_link(&self.link)
    }

    /// Classifies the result by its link's domain.
    pub fn category(&self) -> ResultCategory {
        let link = self.link.to_lowercase();
        if NEWS_DOMAINS.iter().any(|domain| link.contains(domain)) {
            ResultCategory::News
        } else {
            ResultCategory::Web
        }
    }
}

/// Returns true when `link` starts with `http://` or `https://`.
pub fn is_absolute_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Results split by category, each list keeping the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedResults {
    /// General web results.
    pub web: Vec<SearchResult>,
    /// News results.
    pub news: Vec<SearchResult>,
}

/// Splits results into web and news categories.
pub fn categorize(results: &[SearchResult]) -> CategorizedResults {
    let mut categorized = CategorizedResults::default();
    for result in results {
        match result.category() {
            ResultCategory::News => categorized.news.push(result.clone()),
            ResultCategory::Web => categorized.web.push(result.clone()),
        }
    }
    categorized
}
