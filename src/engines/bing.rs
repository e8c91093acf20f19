//! Bing search engine implementation.

use async_trait::async_trait;

use crate::engine::Pagination;
use crate::fetcher::PageRequest;
use crate::scrape::{self, SelectorTable};
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const SELECTORS: SelectorTable = SelectorTable {
    container: "li.b_algo",
    link: "h2 a",
    title: None,
    title_fallback: "",
    snippet: "p",
};

const PAGINATION: Pagination = Pagination::Offset {
    param: "first",
    start: 1,
    step: 10,
};

/// Bing search engine.
pub struct Bing {
    config: EngineConfig,
}

impl Bing {
    /// Creates a new Bing engine.
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                name: "Bing".to_string(),
                id: "bing".to_string(),
                timeout: 5,
                enabled: true,
                paging: true,
                referer: Some("https://www.bing.com/".to_string()),
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

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Bing {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &SearchQuery) -> PageRequest {
        let url = format!(
            "https://www.bing.com/search?q={}{}",
            query.encoded(),
            PAGINATION.query_suffix(query.page())
        );
        PageRequest::browser(url, self.config.referer.as_deref()).with_timeout(self.timeout())
    }

    fn parse(&self, html: &str) -> Result<Vec<SearchResult>> {
        scrape::extract(html, &SELECTORS, self.id(), str::to_string)
    }
}
