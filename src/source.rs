//! The fixed set of engines this crate knows how to scrape.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engines::{Bing, Brave, DuckDuckGo, Google, Yahoo};
use crate::{Engine, SearchError};

/// A known search source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Google web search.
    Google,
    /// Microsoft Bing.
    Bing,
    /// DuckDuckGo's HTML endpoint; also accepted as `ddg`.
    DuckDuckGo,
    /// Yahoo search.
    Yahoo,
    /// Brave Search.
    Brave,
}

impl SourceKind {
    /// Every known source, in default dispatch order.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Google,
        SourceKind::Bing,
        SourceKind::DuckDuckGo,
        SourceKind::Yahoo,
        SourceKind::Brave,
    ];

    /// Stable identifier used in requests, results and reports.
    pub fn id(self) -> &'static str {
        match self {
            SourceKind::Google => "google",
            SourceKind::Bing => "bing",
            SourceKind::DuckDuckGo => "duckduckgo",
            SourceKind::Yahoo => "yahoo",
            SourceKind::Brave => "brave",
        }
    }

    /// Builds the adapter for this source with the given fetch timeout.
    pub fn engine(self, timeout_secs: u64) -> Arc<dyn Engine> {
        match self {
            SourceKind::Google => Arc::new(Google::new().with_timeout(timeout_secs)),
            SourceKind::Bing => Arc::new(Bing::new().with_timeout(timeout_secs)),
            SourceKind::DuckDuckGo => Arc::new(DuckDuckGo::new().with_timeout(timeout_secs)),
            SourceKind::Yahoo => Arc::new(Yahoo::new().with_timeout(timeout_secs)),
            SourceKind::Brave => Arc::new(Brave::new().with_timeout(timeout_secs)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SourceKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(SourceKind::Google),
            "bing" => Ok(SourceKind::Bing),
            "duckduckgo" | "ddg" => Ok(SourceKind::DuckDuckGo),
            "yahoo" => Ok(SourceKind::Yahoo),
            "brave" => Ok(SourceKind::Brave),
            _ => Err(SearchError::UnknownEngine(s.to_string())),
        }
    }
}

/// Identifiers of every known source.
pub fn available_sources() -> Vec<&'static str> {
    SourceKind::ALL.iter().map(|kind| kind.id()).collect()
}
