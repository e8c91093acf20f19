//! # fedsearch
//!
//! A federated web search library. One query is fanned out to several
//! public search engines at once, their result pages are scraped, and the
//! merged results come back deduplicated and ranked by how many engines
//! agreed on them, optionally with a short extractive summary.
//!
//! - Concurrent per-engine dispatch with individual timeouts
//! - Failure isolation: one broken engine never sinks the query
//! - Cross-engine deduplication and occurrence ranking
//! - Extractive summaries built from result snippets
//! - Pluggable page fetching through [`PageFetcher`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fedsearch::{engines::DuckDuckGo, HttpFetcher, Search, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut search = Search::new(Arc::new(HttpFetcher::new()?));
//!     search.add_engine(DuckDuckGo::new());
//!
//!     let query = SearchQuery::new("rust programming");
//!     let response = search.search(query).await?;
//!
//!     if let Some(summary) = &response.summary {
//!         println!("{}", summary);
//!     }
//!     for result in response.items() {
//!         println!("{}: {}", result.title, result.link);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod config;
mod engine;
mod error;
mod fetcher_http;
mod query;
mod response;
mod result;
mod scrape;
mod search;
mod source;

pub mod cache;
pub mod engines;
pub mod fetcher;
pub mod summary;

pub use aggregator::{Aggregated, Aggregator};
pub use cache::ResponseCache;
pub use config::SearchConfig;
pub use engine::{Engine, EngineConfig, Pagination};
pub use error::{Result, SearchError};
pub use fetcher::{PageFetcher, PageRequest};
pub use fetcher_http::HttpFetcher;
pub use query::SearchQuery;
pub use response::{AggregateResponse, SourceReport, SourceStatus};
pub use result::{categorize, CategorizedResults, ResultCategory, SearchResult};
pub use search::Search;
pub use source::{available_sources, SourceKind};
pub use summary::{summarize, Summarizer};
