//! The aggregate payload returned for one query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SearchResult;

/// Outcome of one engine for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Returned at least one result.
    Ok,
    /// Ran without error but found nothing (or its layout no longer matched).
    Empty,
    /// Fetch or parse failed, or the engine timed out.
    Failed,
}

impl SourceStatus {
    /// Whether the engine counts as successful in [`SourceReport::successful`].
    pub fn is_success(self) -> bool {
        matches!(self, SourceStatus::Ok)
    }
}

/// Which engines were asked, and how each one fared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Engines dispatched for this query, in request order.
    pub requested: Vec<String>,
    /// Engines that produced at least one result.
    pub successful: Vec<String>,
    /// Engines that produced nothing, whether they errored or came back empty.
    pub failed: Vec<String>,
    /// Per-engine outcome, distinguishing empty from failed.
    pub status: BTreeMap<String, SourceStatus>,
}

impl SourceReport {
    /// Records the outcome of one engine.
    pub fn record(&mut self, source: impl Into<String>, status: SourceStatus) {
        let source = source.into();
        self.requested.push(source.clone());
        if status.is_success() {
            self.successful.push(source.clone());
        } else {
            self.failed.push(source.clone());
        }
        self.status.insert(source, status);
    }
}

/// Ranked, deduplicated results for one query plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// The query as submitted.
    pub query: String,
    /// Deduplicated results, ranked by cross-engine agreement.
    pub results: Vec<SearchResult>,
    /// Always `results.len()`.
    pub count: usize,
    /// Per-engine outcomes.
    pub sources: SourceReport,
    /// Wall-clock time for dispatch and merge, rounded to two decimals.
    pub elapsed_seconds: f64,
    /// Extractive summary of the top results, when one could be built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AggregateResponse {
    /// Creates a response; `count` is derived from `results`.
    pub fn new(
        query: impl Into<String>,
        results: Vec<SearchResult>,
        sources: SourceReport,
    ) -> Self {
        Self {
            query: query.into(),
            count: results.len(),
            results,
            sources,
            elapsed_seconds: 0.0,
            summary: None,
        }
    }

    /// Sets the elapsed time, rounding to two decimal places.
    pub fn set_elapsed(&mut self, seconds: f64) {
        self.elapsed_seconds = (seconds * 100.0).round() / 100.0;
    }

    /// Returns the results.
    pub fn items(&self) -> &[SearchResult] {
        &self.results
    }
}
