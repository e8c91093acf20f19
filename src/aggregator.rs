//! Result aggregation and ranking.

use std::collections::HashMap;

use tracing::debug;

use crate::SearchResult;

/// Merged output of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    /// Deduplicated results, highest occurrence count first.
    pub results: Vec<SearchResult>,
    /// Raw occurrence count per link across every engine's output.
    pub occurrences: HashMap<String, usize>,
}

impl Aggregated {
    /// Returns how many times `link` appeared before deduplication.
    pub fn occurrences_of(&self, link: &str) -> usize {
        self.occurrences.get(link).copied().unwrap_or(0)
    }
}

/// Aggregates and ranks search results from multiple engines.
#[derive(Debug, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Creates a new aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Aggregates results from multiple engines.
    ///
    /// This performs:
    /// 1. Dropping any result whose link is not absolute
    /// 2. Deduplication on the exact link, keeping the first occurrence
    /// 3. Counting every raw occurrence of each link
    /// 4. A stable sort by occurrence count, descending
    pub fn aggregate(&self, engine_results: Vec<(String, Vec<SearchResult>)>) -> Aggregated {
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<SearchResult> = Vec::new();

        for (engine_name, results) in engine_results {
            for result in results {
                if !result.has_absolute_link() {
                    debug!("Dropping non-absolute link '{}' from {}", result.link, engine_name);
                    continue;
                }

                let count = occurrences.entry(result.link.clone()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    unique.push(result);
                }
            }
        }

        // sort_by_key is stable, so ties keep first-seen order
        unique.sort_by_key(|result| std::cmp::Reverse(occurrences[&result.link]));

        Aggregated {
            results: unique,
            occurrences,
        }
    }
}
