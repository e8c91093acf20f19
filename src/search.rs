//! Search orchestration.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, ResponseCache};
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::source::SourceKind;
use crate::{
    AggregateResponse, Aggregator, Engine, Result, SearchConfig, SearchError, SearchQuery,
    SearchResult, SourceReport, SourceStatus, Summarizer,
};

/// Meta search engine that orchestrates searches across multiple engines.
pub struct Search {
    engines: Vec<Arc<dyn Engine>>,
    fetcher: Arc<dyn PageFetcher>,
    aggregator: Aggregator,
    summarizer: Option<Summarizer>,
    cache: Option<Arc<ResponseCache>>,
}

impl Search {
    /// Creates a search instance with no engines, a default summarizer and no cache.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            engines: Vec::new(),
            fetcher,
            aggregator: Aggregator::new(),
            summarizer: Some(Summarizer::default()),
            cache: None,
        }
    }

    /// Builds a search instance backed by HTTP from a validated configuration.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let mut search = Self::new(Arc::new(HttpFetcher::new()?));
        for kind in config.sources()? {
            search.add_shared_engine(kind.engine(config.timeout_secs));
        }

        search.set_summarizer(
            config
                .summary
                .then(|| Summarizer::new(config.summary_results)),
        );
        if config.cache_capacity > 0 {
            search.set_cache(Arc::new(ResponseCache::new(
                config.cache_capacity,
                config.cache_evict,
            )));
        }

        Ok(search)
    }

    /// Adds a search engine.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) {
        self.engines.push(Arc::new(engine));
    }

    /// Adds an already shared search engine.
    pub fn add_shared_engine(&mut self, engine: Arc<dyn Engine>) {
        self.engines.push(engine);
    }

    /// Adds every known engine with the given timeout.
    pub fn add_default_engines(&mut self, timeout_secs: u64) {
        for kind in SourceKind::ALL {
            self.add_shared_engine(kind.engine(timeout_secs));
        }
    }

    /// Sets or clears the summarizer.
    pub fn set_summarizer(&mut self, summarizer: Option<Summarizer>) {
        self.summarizer = summarizer;
    }

    /// Sets the response cache.
    pub fn set_cache(&mut self, cache: Arc<ResponseCache>) {
        self.cache = Some(cache);
    }

    /// Returns the response cache if configured.
    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// Returns the number of configured engines.
    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Returns the identifiers of the configured engines.
    pub fn engine_ids(&self) -> Vec<&str> {
        self.engines.iter().map(|engine| engine.id()).collect()
    }

    /// Summarizes results with this instance's summarizer, if any.
    pub fn summarize(&self, query: &str, results: &[SearchResult]) -> Option<String> {
        self.summarizer
            .as_ref()
            .and_then(|summarizer| summarizer.summarize(query, results))
    }

    /// Performs a search across the selected engines.
    ///
    /// Every selected engine runs concurrently under its own timeout. A
    /// failing or slow engine only marks itself as failed; the response is
    /// built once every engine has finished.
    pub async fn search(&self, query: SearchQuery) -> Result<AggregateResponse> {
        if self.engines.is_empty() {
            return Err(SearchError::NoEngines);
        }

        if query.query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
        }

        let engines_to_use = self.select_engines(&query);
        if engines_to_use.is_empty() {
            return Err(SearchError::NoEngines);
        }

        let requested: Vec<String> = engines_to_use
            .iter()
            .map(|engine| engine.id().to_string())
            .collect();
        let key = cache_key(&query.query, &requested, query.page());
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                debug!("Returning cached results for '{}'", query.query);
                return Ok(cached);
            }
        }

        let start = Instant::now();
        debug!("Searching {} engines", engines_to_use.len());

        let futures: Vec<_> = engines_to_use
            .iter()
            .map(|engine| {
                let query = &query;
                let fetcher = self.fetcher.as_ref();

                async move {
                    let id = engine.id().to_string();
                    let outcome = timeout(engine.timeout(), engine.search(fetcher, query))
                        .await
                        .unwrap_or(Err(SearchError::Timeout));
                    match &outcome {
                        Ok(results) => {
                            debug!("Engine {} returned {} results", id, results.len())
                        }
                        Err(e) => warn!("Engine {} failed: {}", id, e),
                    }
                    (id, outcome)
                }
            })
            .collect();

        let outcomes = join_all(futures).await;

        let mut report = SourceReport::default();
        let mut engine_results = Vec::with_capacity(outcomes.len());
        for (id, outcome) in outcomes {
            report.record(id.clone(), classify(&outcome));
            engine_results.push((id, outcome.unwrap_or_default()));
        }

        let aggregated = self.aggregator.aggregate(engine_results);
        let mut response = AggregateResponse::new(&query.query, aggregated.results, report);
        response.set_elapsed(start.elapsed().as_secs_f64());

        response.summary = self.summarize(&query.query, &response.results);
        if response.summary.is_some() {
            info!("Generated summary for query: '{}'", query.query);
        }

        if let Some(cache) = &self.cache {
            cache.insert(key, response.clone()).await;
        }

        Ok(response)
    }

    /// Selects engines for the query: every enabled engine when none are
    /// named, otherwise the named ones in request order. Unknown or
    /// disabled names are skipped.
    fn select_engines(&self, query: &SearchQuery) -> Vec<Arc<dyn Engine>> {
        if query.engines.is_empty() {
            return self
                .engines
                .iter()
                .filter(|engine| engine.is_enabled())
                .cloned()
                .collect();
        }

        let mut selected: Vec<Arc<dyn Engine>> = Vec::new();
        for name in &query.engines {
            let wanted = canonical_id(name);
            let found = self
                .engines
                .iter()
                .find(|engine| engine.is_enabled() && engine.id() == wanted);
            match found {
                Some(engine) => {
                    if !selected.iter().any(|s| s.id() == engine.id()) {
                        selected.push(Arc::clone(engine));
                    }
                }
                None => warn!("Unknown or disabled engine '{}', skipping", name),
            }
        }
        selected
    }
}

/// Status reported for one engine's outcome.
fn classify(outcome: &Result<Vec<SearchResult>>) -> SourceStatus {
    match outcome {
        Ok(results) if results.is_empty() => SourceStatus::Empty,
        Ok(_) => SourceStatus::Ok,
        Err(_) => SourceStatus::Failed,
    }
}

/// Maps aliases such as "ddg" onto the engine identifier.
fn canonical_id(name: &str) -> String {
    name.parse::<SourceKind>()
        .map(|kind| kind.id().to_string())
        .unwrap_or_else(|_| name.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::fetcher::PageRequest;
    use crate::EngineConfig;

    struct NoFetcher;

    #[async_trait]
    impl PageFetcher for NoFetcher {
        async fn fetch(&self, request: &PageRequest) -> Result<String> {
            Err(SearchError::Other(format!("unexpected fetch of {}", request.url)))
        }
    }

    enum Behavior {
        Results(Vec<SearchResult>),
        Fail,
        Hang,
    }

    struct MockEngine {
        config: EngineConfig,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
    }

    impl MockEngine {
        fn new(id: &str, links: &[&str]) -> Self {
            let results = links
                .iter()
                .map(|link| {
                    SearchResult::new(*link, format!("{} via {}", link, id), "").with_source(id)
                })
                .collect();
            Self::with_behavior(id, Behavior::Results(results))
        }

        fn failing(id: &str) -> Self {
            Self::with_behavior(id, Behavior::Fail)
        }

        fn hanging(id: &str) -> Self {
            Self::with_behavior(id, Behavior::Hang)
        }

        fn with_behavior(id: &str, behavior: Behavior) -> Self {
            Self {
                config: EngineConfig {
                    name: id.to_string(),
                    id: id.to_string(),
                    timeout: 1,
                    ..Default::default()
                },
                behavior,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_snippet(mut self, snippet: &str) -> Self {
            if let Behavior::Results(results) = &mut self.behavior {
                for result in results.iter_mut() {
                    result.snippet = snippet.to_string();
                }
            }
            self
        }

        fn disabled(mut self) -> Self {
            self.config.enabled = false;
            self
        }
    }

    #[async_trait]
    impl Engine for MockEngine {
        fn config(&self) -> &EngineConfig {
            &self.config
        }

        fn request(&self, query: &SearchQuery) -> PageRequest {
            PageRequest::new(format!("https://{}.test/?q={}", self.config.id, query.encoded()))
        }

        fn parse(&self, _html: &str) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn search(
            &self,
            _fetcher: &dyn PageFetcher,
            _query: &SearchQuery,
        ) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Results(results) => Ok(results.clone()),
                Behavior::Fail => Err(SearchError::Other("Engine failed".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn search_with(engines: Vec<MockEngine>) -> Search {
        let mut search = Search::new(Arc::new(NoFetcher));
        for engine in engines {
            search.add_engine(engine);
        }
        search
    }

    fn assert_partition(report: &SourceReport) {
        let mut union: Vec<_> = report
            .successful
            .iter()
            .chain(report.failed.iter())
            .cloned()
            .collect();
        union.sort();
        let mut requested = report.requested.clone();
        requested.sort();
        assert_eq!(union, requested);
        assert!(report.successful.iter().all(|s| !report.failed.contains(s)));
    }

    #[tokio::test]
    async fn test_search_new() {
        let search = Search::new(Arc::new(NoFetcher));
        assert_eq!(search.engine_count(), 0);
        assert!(search.cache().is_none());
    }

    #[tokio::test]
    async fn test_search_add_default_engines() {
        let mut search = Search::new(Arc::new(NoFetcher));
        search.add_default_engines(5);
        assert_eq!(
            search.engine_ids(),
            vec!["google", "bing", "duckduckgo", "yahoo", "brave"]
        );
    }

    #[tokio::test]
    async fn test_search_no_engines() {
        let search = Search::new(Arc::new(NoFetcher));
        let result = search.search(SearchQuery::new("test")).await;
        assert!(matches!(result, Err(SearchError::NoEngines)));
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let search = search_with(vec![MockEngine::new("e1", &[])]);
        let result = search.search(SearchQuery::new("   ")).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_search_whitespace_only_query() {
        let search = search_with(vec![MockEngine::new("e1", &[])]);
        let result = search.search(SearchQuery::new("\t\n  ")).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_search_deduplicates_shared_link() {
        let search = search_with(vec![
            MockEngine::new("e1", &["https://example.com/a"]),
            MockEngine::new("e2", &["https://example.com/a"]),
        ]);
        let response = search.search(SearchQuery::new("rust ownership")).await.unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].link, "https://example.com/a");
        assert_eq!(response.sources.successful, vec!["e1", "e2"]);
        assert_partition(&response.sources);
    }

    #[tokio::test]
    async fn test_search_ranks_agreement_first() {
        let search = search_with(vec![
            MockEngine::new("e1", &["https://solo.com", "https://shared.com"]),
            MockEngine::new("e2", &["https://other.com", "https://shared.com"]),
        ]);
        let response = search.search(SearchQuery::new("q")).await.unwrap();
        assert_eq!(response.results[0].link, "https://shared.com");
        assert_eq!(response.count, 3);
    }

    #[tokio::test]
    async fn test_search_handles_engine_failure() {
        let search = search_with(vec![
            MockEngine::new("working", &["https://working.com"]),
            MockEngine::failing("failing"),
        ]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].link, "https://working.com");
        assert_eq!(response.sources.successful, vec!["working"]);
        assert_eq!(response.sources.failed, vec!["failing"]);
        assert_eq!(response.sources.status["failing"], SourceStatus::Failed);
        assert_partition(&response.sources);
    }

    #[tokio::test]
    async fn test_search_empty_engine_reported_failed() {
        let search = search_with(vec![
            MockEngine::new("full", &["https://a.com"]),
            MockEngine::new("empty", &[]),
        ]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();
        assert_eq!(response.sources.failed, vec!["empty"]);
        assert_eq!(response.sources.status["empty"], SourceStatus::Empty);
        assert_eq!(response.sources.status["full"], SourceStatus::Ok);
    }

    #[tokio::test]
    async fn test_search_all_engines_fail() {
        let search = search_with(vec![MockEngine::failing("f1"), MockEngine::failing("f2")]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();
        assert_eq!(response.count, 0);
        assert!(response.sources.successful.is_empty());
        assert_eq!(response.sources.failed, vec!["f1", "f2"]);
        assert!(response.summary.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_slow_engine_times_out() {
        let search = search_with(vec![
            MockEngine::hanging("slow"),
            MockEngine::new("fast", &["https://fast.com"]),
        ]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.sources.status["slow"], SourceStatus::Failed);
        assert_eq!(response.sources.status["fast"], SourceStatus::Ok);
    }

    #[tokio::test]
    async fn test_search_filters_disabled_engines() {
        let search = search_with(vec![
            MockEngine::new("enabled", &["https://enabled.com"]),
            MockEngine::new("disabled", &["https://disabled.com"]).disabled(),
        ]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.sources.requested, vec!["enabled"]);
    }

    #[tokio::test]
    async fn test_search_filters_by_engine_id() {
        let search = search_with(vec![
            MockEngine::new("e1", &["https://one.com"]),
            MockEngine::new("e2", &["https://two.com"]),
        ]);
        let query = SearchQuery::new("test").with_engines(vec!["e2".to_string()]);
        let response = search.search(query).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].link, "https://two.com");
        assert_eq!(response.sources.requested, vec!["e2"]);
    }

    #[tokio::test]
    async fn test_search_ignores_unknown_and_duplicate_names() {
        let search = search_with(vec![MockEngine::new("e1", &["https://one.com"])]);
        let query = SearchQuery::new("test").with_engines(vec![
            "altavista".to_string(),
            "E1".to_string(),
            "e1".to_string(),
        ]);
        let response = search.search(query).await.unwrap();
        assert_eq!(response.sources.requested, vec!["e1"]);
        assert_partition(&response.sources);
    }

    #[tokio::test]
    async fn test_search_only_unknown_names() {
        let search = search_with(vec![MockEngine::new("e1", &["https://one.com"])]);
        let query = SearchQuery::new("test").with_engines(vec!["altavista".to_string()]);
        let result = search.search(query).await;
        assert!(matches!(result, Err(SearchError::NoEngines)));
    }

    #[tokio::test]
    async fn test_search_alias_resolves_to_engine() {
        let mut search = Search::new(Arc::new(NoFetcher));
        search.add_engine(MockEngine::new("duckduckgo", &["https://ddg.com"]));
        let query = SearchQuery::new("test").with_engines(vec!["ddg".to_string()]);
        let response = search.search(query).await.unwrap();
        assert_eq!(response.sources.requested, vec!["duckduckgo"]);
    }

    #[tokio::test]
    async fn test_search_attaches_summary() {
        let search = search_with(vec![MockEngine::new("e1", &["https://rust.com"])
            .with_snippet("Rust ownership keeps memory safe without a collector.")]);
        let response = search.search(SearchQuery::new("rust ownership")).await.unwrap();
        assert_eq!(
            response.summary.as_deref(),
            Some("About 'Rust ownership': Rust ownership keeps memory safe without a collector.")
        );
    }

    #[tokio::test]
    async fn test_search_without_summarizer() {
        let mut search = search_with(vec![MockEngine::new("e1", &["https://rust.com"])
            .with_snippet("Rust ownership keeps memory safe without a collector.")]);
        search.set_summarizer(None);
        let response = search.search(SearchQuery::new("rust")).await.unwrap();
        assert!(response.summary.is_none());
    }

    #[tokio::test]
    async fn test_search_records_elapsed() {
        let search = search_with(vec![MockEngine::new("e1", &["https://a.com"])]);
        let response = search.search(SearchQuery::new("test")).await.unwrap();
        assert!(response.elapsed_seconds >= 0.0);
        assert_eq!(
            response.elapsed_seconds,
            (response.elapsed_seconds * 100.0).round() / 100.0
        );
    }

    #[tokio::test]
    async fn test_search_uses_cache() {
        let engine = MockEngine::new("e1", &["https://a.com"]);
        let calls = Arc::clone(&engine.calls);
        let mut search = search_with(vec![engine]);
        search.set_cache(Arc::new(ResponseCache::new(10, 2)));

        let first = search.search(SearchQuery::new("cached")).await.unwrap();
        let second = search.search(SearchQuery::new("cached")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        search.search(SearchQuery::new("cached").with_page(2)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config() {
        let config = SearchConfig {
            engines: vec!["bing".into(), "ddg".into()],
            timeout_secs: 2,
            ..Default::default()
        };
        let search = Search::from_config(&config).unwrap();
        assert_eq!(search.engine_ids(), vec!["bing", "duckduckgo"]);
        assert!(search.cache().is_some());
    }

    #[test]
    fn test_from_config_without_cache_or_summary() {
        let config = SearchConfig {
            summary: false,
            cache_capacity: 0,
            ..Default::default()
        };
        let search = Search::from_config(&config).unwrap();
        assert!(search.cache().is_none());
        assert!(search.summarize("q", &[SearchResult::new("https://a.com", "A", "")]).is_none());
    }

    #[test]
    fn test_from_config_invalid() {
        let config = SearchConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            Search::from_config(&config),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_classify() {
        let hit = vec![SearchResult::new("https://a.com", "A", "")];
        assert_eq!(classify(&Ok(hit)), SourceStatus::Ok);
        assert_eq!(classify(&Ok(Vec::new())), SourceStatus::Empty);
        assert_eq!(classify(&Err(SearchError::Timeout)), SourceStatus::Failed);
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(canonical_id("DDG"), "duckduckgo");
        assert_eq!(canonical_id(" Custom "), "custom");
    }
}
