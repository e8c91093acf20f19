//! DuckDuckGo search engine implementation.

use async_trait::async_trait;

use crate::engine::Pagination;
use crate::fetcher::PageRequest;
use crate::scrape::{self, SelectorTable};
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const SELECTORS: SelectorTable = SelectorTable {
    container: ".result",
    link: ".result__a",
    title: None,
    title_fallback: "",
    snippet: ".result__snippet",
};

// The HTML endpoint paginates through a form token, not a URL offset.
const PAGINATION: Pagination = Pagination::None;

/// DuckDuckGo search engine.
pub struct DuckDuckGo {
    config: EngineConfig,
}

impl DuckDuckGo {
    /// Creates a new DuckDuckGo engine.
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                name: "DuckDuckGo".to_string(),
                id: "duckduckgo".to_string(),
                timeout: 5,
                enabled: true,
                paging: false,
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

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for DuckDuckGo {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &SearchQuery) -> PageRequest {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}{}",
            query.encoded(),
            PAGINATION.query_suffix(query.page())
        );
        PageRequest::browser(url, self.config.referer.as_deref()).with_timeout(self.timeout())
    }

    fn parse(&self, html: &str) -> Result<Vec<SearchResult>> {
        scrape::extract(html, &SELECTORS, self.id(), resolve_link)
    }
}

/// Unwraps DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect links.
fn resolve_link(href: &str) -> String {
    if href.contains("//duckduckgo.com/l/?") {
        if let Some(target) = scrape::query_param(href, "https://duckduckgo.com/", "uddg") {
            return target;
        }
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duckduckgo_new() {
        let engine = DuckDuckGo::new();
        assert_eq!(engine.config.name, "DuckDuckGo");
        assert_eq!(engine.config.id, "duckduckgo");
        assert_eq!(engine.config.timeout, 5);
        assert!(engine.config.enabled);
        assert!(!engine.config.paging);
    }

    #[test]
    fn test_duckduckgo_with_config() {
        let custom_config = EngineConfig {
            name: "Custom DDG".to_string(),
            id: "cddg".to_string(),
            ..Default::default()
        };
        let engine = DuckDuckGo::new().with_config(custom_config);
        assert_eq!(engine.name(), "Custom DDG");
        assert_eq!(engine.id(), "cddg");
    }

    #[test]
    fn test_duckduckgo_request_ignores_page() {
        let engine = DuckDuckGo::new();
        let first = engine.request(&SearchQuery::new("rust lang"));
        let fourth = engine.request(&SearchQuery::new("rust lang").with_page(4));
        assert_eq!(first.url, "https://html.duckduckgo.com/html/?q=rust%20lang");
        assert_eq!(first.url, fourth.url);
        assert_eq!(first.header("Referer"), None);
    }

    #[test]
    fn test_resolve_link_redirect() {
        let url = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        assert_eq!(resolve_link(url), "https://example.com/page");
    }

    #[test]
    fn test_resolve_link_redirect_no_params() {
        let url = "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com";
        assert_eq!(resolve_link(url), "https://example.com");
    }

    #[test]
    fn test_resolve_link_direct() {
        assert_eq!(resolve_link("https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn test_parse_results_empty_html() {
        let results = DuckDuckGo::new().parse("<html><body></body></html>").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_with_results() {
        let html = r#"
            <html>
            <body>
                <div class="result results_links">
                    <h2 class="result__title">
                        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa&amp;rut=1">Example Title</a>
                    </h2>
                    <a class="result__snippet">Example snippet text</a>
                </div>
                <div class="result">
                    <a class="result__a" href="https://direct.example.org/">Direct</a>
                </div>
                <div class="result">
                    <span>sponsored, no anchor</span>
                </div>
            </body>
            </html>
        "#;
        let results = DuckDuckGo::new().parse(html).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Example Title");
        assert_eq!(results[0].link, "https://example.com/a");
        assert_eq!(results[0].snippet, "Example snippet text");
        assert_eq!(results[1].link, "https://direct.example.org/");
        assert_eq!(results[1].snippet, "");
        assert!(results.iter().all(|r| r.source == "duckduckgo"));
    }
}
