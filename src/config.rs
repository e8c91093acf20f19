//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which engines are queried, the per-engine
//! timeout, summarization and response caching. Every field has a default,
//! so a JSON config file only needs the fields it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::source::{available_sources, SourceKind};
use crate::{cache, summary, Result, SearchError};

/// Configuration for a [`Search`](crate::Search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Engines to query by identifier. Queried concurrently; results are merged.
    pub engines: Vec<String>,
    /// Per-engine request timeout in seconds.
    pub timeout_secs: u64,
    /// Whether to attach an extractive summary to each response.
    pub summary: bool,
    /// Number of top results used as summary evidence.
    pub summary_results: usize,
    /// Maximum cached responses. 0 disables the cache.
    pub cache_capacity: usize,
    /// Oldest entries dropped once the cache exceeds its capacity.
    pub cache_evict: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: available_sources().into_iter().map(String::from).collect(),
            timeout_secs: 5,
            summary: true,
            summary_results: summary::DEFAULT_MAX_RESULTS,
            cache_capacity: cache::DEFAULT_CAPACITY,
            cache_evict: cache::DEFAULT_EVICT,
        }
    }
}

impl SearchConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SearchError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.summary_results == 0 {
            return Err(SearchError::Config(
                "summary_results must be greater than 0".into(),
            ));
        }
        if self.engines.is_empty() {
            return Err(SearchError::Config(
                "at least one engine must be enabled".into(),
            ));
        }
        if self.cache_capacity > 0 && self.cache_evict == 0 {
            return Err(SearchError::Config(
                "cache_evict must be greater than 0 when caching is enabled".into(),
            ));
        }
        self.sources().map(|_| ())
    }

    /// Resolves the configured engine names, failing on the first unknown one.
    pub fn sources(&self) -> Result<Vec<SourceKind>> {
        let mut kinds = Vec::new();
        for name in &self.engines {
            let kind: SourceKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}
