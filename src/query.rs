//! Search query representation.

use serde::{Deserialize, Serialize};

/// A search query with all parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms.
    pub query: String,
    /// Page number (1-indexed).
    pub page: u32,
    /// Specific engines to use (by identifier). Empty means every configured engine.
    pub engines: Vec<String>,
}

impl SearchQuery {
    /// Creates a new search query for the first page.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            engines: Vec::new(),
        }
    }

    /// Sets the page number. Page 0 is treated as page 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets specific engines to use.
    pub fn with_engines(mut self, engines: Vec<String>) -> Self {
        self.engines = engines;
        self
    }

    /// Returns the page number, never below 1.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Returns the search terms percent-encoded for a URL query string.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.query).into_owned()
    }
}
