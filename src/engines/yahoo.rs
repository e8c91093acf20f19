//! Yahoo search engine implementation.

use async_trait::async_trait;

use crate::engine::Pagination;
use crate::fetcher::PageRequest;
use crate::scrape::{self, SelectorTable};
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const SELECTORS: SelectorTable = SelectorTable {
    container: "div.algo",
    link: "h3 a",
    title: None,
    title_fallback: "",
    snippet: ".compText",
};

const PAGINATION: Pagination = Pagination::Offset {
    param: "b",
    start: 1,
    step: 10,
};

/// Yahoo search engine.
pub struct Yahoo {
    config: EngineConfig,
}

impl Yahoo {
    /// Creates a new Yahoo engine.
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                name: "Yahoo".to_string(),
                id: "yahoo".to_string(),
                timeout: 5,
                enabled: true,
                paging: true,
                referer: Some("https://search.yahoo.com/".to_string()),
            },
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.config.timeout = timeout;
        self
    }
}

impl Default for Yahoo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Yahoo {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &SearchQuery) -> PageRequest {
        let url = format!(
            "https://search.yahoo.com/search?p={}{}",
            query.encoded(),
            PAGINATION.query_suffix(query.page())
        );
        PageRequest::browser(url, self.config.referer.as_deref()).with_timeout(self.timeout())
    }

    fn parse(&self, html: &str) -> Result<Vec<SearchResult>> {
        scrape::extract(html, &SELECTORS, self.id(), resolve_link)
    }
}

/// Unwraps `r.search.yahoo.com/.../RU=<target>/RK=...` redirect links.
///
/// The target is a percent-encoded path segment rather than a query
/// parameter.
fn resolve_link(href: &str) -> String {
    if !href.contains("r.search.yahoo.com") {
        return href.to_string();
    }
    let Some((_, rest)) = href.split_once("/RU=") else {
        return href.to_string();
    };
    let encoded = rest.split('/').next().unwrap_or(rest);
    match urlencoding::decode(encoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => href.to_string(),
    }
}
