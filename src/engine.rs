//! Search engine trait and configuration.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fetcher::{PageFetcher, PageRequest};
use crate::{Result, SearchQuery, SearchResult};

/// How an engine turns a 1-based page number into a URL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// The engine ignores the page number.
    None,
    /// `param = start + (page - 1) * step`, saturating at `u32::MAX`.
    Offset {
        /// Query-string parameter name.
        param: &'static str,
        /// Offset for page 1.
        start: u32,
        /// Offset increment per page.
        step: u32,
    },
}

impl Pagination {
    /// Returns the offset for `page`, or `None` when the engine does not paginate.
    pub fn offset(&self, page: u32) -> Option<u32> {
        match *self {
            Pagination::None => None,
            Pagination::Offset { start, step, .. } => Some(
                page.max(1)
                    .saturating_sub(1)
                    .saturating_mul(step)
                    .saturating_add(start),
            ),
        }
    }

    /// Returns the `&param=value` suffix to append to a URL, possibly empty.
    pub fn query_suffix(&self, page: u32) -> String {
        match (*self, self.offset(page)) {
            (Pagination::Offset { param, .. }, Some(offset)) => format!("&{}={}", param, offset),
            _ => String::new(),
        }
    }
}

/// Configuration for a search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the engine.
    pub name: String,
    /// Identifier used in requests and on every result (e.g., "duckduckgo").
    pub id: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Whether the engine is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether pagination is supported.
    #[serde(default)]
    pub paging: bool,
    /// Referer header sent with each request.
    #[serde(default)]
    pub referer: Option<String>,
}

fn default_timeout() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: String::new(),
            timeout: 5,
            enabled: true,
            paging: false,
            referer: None,
        }
    }
}

/// A source adapter: knows how to ask one engine for a results page and
/// how to turn that page into [`SearchResult`]s.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns the engine configuration.
    fn config(&self) -> &EngineConfig;

    /// Builds the request for `query`, including pagination and headers.
    fn request(&self, query: &SearchQuery) -> PageRequest;

    /// Parses a results page. Entries that lack a usable link are skipped.
    fn parse(&self, html: &str) -> Result<Vec<SearchResult>>;

    /// Fetches and parses one results page, propagating any failure.
    async fn search(
        &self,
        fetcher: &dyn PageFetcher,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>> {
        let request = self.request(query);
        let html = fetcher.fetch(&request).await?;
        self.parse(&html)
    }

    /// Like [`Engine::search`], but logs failures and returns an empty list instead.
    async fn fetch_and_parse(
        &self,
        fetcher: &dyn PageFetcher,
        query: &SearchQuery,
    ) -> Vec<SearchResult> {
        match self.search(fetcher, query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Error searching {} for '{}': {}", self.id(), query.query, e);
                Vec::new()
            }
        }
    }

    /// Returns the engine name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the engine identifier.
    fn id(&self) -> &str {
        &self.config().id
    }

    /// Returns the per-request timeout.
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config().timeout)
    }

    /// Returns whether the engine is enabled.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }
}
