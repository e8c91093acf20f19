//! Brave search engine implementation.

use async_trait::async_trait;

use crate::engine::Pagination;
use crate::fetcher::PageRequest;
use crate::scrape::{self, SelectorTable};
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const SELECTORS: SelectorTable = SelectorTable {
    container: ".snippet",
    link: ".snippet-title a",
    title: None,
    title_fallback: "",
    snippet: ".snippet-description",
};

const PAGINATION: Pagination = Pagination::Offset {
    param: "offset",
    start: 0,
    step: 10,
};

/// Brave search engine.
pub struct Brave {
    config: EngineConfig,
}

impl Brave {
    /// Creates a new Brave engine.
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                name: "Brave".to_string(),
                id: "brave".to_string(),
                timeout: 5,
                enabled: true,
                paging: true,
                referer: None,
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

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Brave {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &SearchQuery) -> PageRequest {
        let url = format!(
            "https://search.brave.com/search?q={}{}",
            query.encoded(),
            PAGINATION.query_suffix(query.page())
        );
        PageRequest::browser(url, self.config.referer.as_deref()).with_timeout(self.timeout())
    }

    fn parse(&self, html: &str) -> Result<Vec<SearchResult>> {
        scrape::extract(html, &SELECTORS, self.id(), str::to_string)
    }
}
