//! Google search engine implementation.

use async_trait::async_trait;

use crate::engine::Pagination;
use crate::fetcher::PageRequest;
use crate::scrape::{self, SelectorTable};
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const SELECTORS: SelectorTable = SelectorTable {
    container: "div.g",
    link: "a",
    title: Some("h3"),
    title_fallback: "No title",
    snippet: "div.VwiC3b",
};

const PAGINATION: Pagination = Pagination::Offset {
    param: "start",
    start: 0,
    step: 10,
};

/// Google search engine.
pub struct Google {
    config: EngineConfig,
}

impl Google {
    /// Creates a new Google engine.
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                name: "Google".to_string(),
                id: "google".to_string(),
                timeout: 5,
                enabled: true,
                paging: true,
                referer: Some("https://www.google.com/".to_string()),
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

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for Google {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn request(&self, query: &SearchQuery) -> PageRequest {
        let url = format!(
            "https://www.google.com/search?q={}{}",
            query.encoded(),
            PAGINATION.query_suffix(query.page())
        );
        PageRequest::browser(url, self.config.referer.as_deref()).with_timeout(self.timeout())
    }

    fn parse(&self, html: &str) -> Result<Vec<SearchResult>> {
        scrape::extract(html, &SELECTORS, self.id(), resolve_link)
    }
}

/// Unwraps Google's `/url?q=<target>` redirect links.
fn resolve_link(href: &str) -> String {
    if href.starts_with("/url?") {
        if let Some(target) = scrape::query_param(href, "https://www.google.com/", "q") {
            return target;
        }
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_new() {
        let engine = Google::new();
        assert_eq!(engine.name(), "Google");
        assert_eq!(engine.id(), "google");
        assert_eq!(engine.config.timeout, 5);
        assert!(engine.config.paging);
    }

    #[test]
    fn test_google_with_config() {
        let engine = Google::new().with_config(EngineConfig {
            name: "Custom Google".to_string(),
            id: "g".to_string(),
            ..Default::default()
        });
        assert_eq!(engine.name(), "Custom Google");
        assert_eq!(engine.id(), "g");
    }

    #[test]
    fn test_google_request_first_page() {
        let request = Google::new().request(&SearchQuery::new("rust ownership"));
        assert_eq!(request.url, "https://www.google.com/search?q=rust%20ownership&start=0");
        assert_eq!(request.header("Referer"), Some("https://www.google.com/"));
    }

    #[test]
    fn test_google_request_third_page() {
        let request = Google::new().request(&SearchQuery::new("rust").with_page(3));
        assert!(request.url.ends_with("&start=20"));
    }

    #[test]
    fn test_google_request_last_page_saturates() {
        let request = Google::new().request(&SearchQuery::new("rust").with_page(u32::MAX));
        assert!(request.url.ends_with(&format!("&start={}", u32::MAX)));
    }

    #[test]
    fn test_resolve_link_redirect() {
        assert_eq!(
            resolve_link("/url?q=https://www.rust-lang.org/&sa=U&ved=abc"),
            "https://www.rust-lang.org/"
        );
    }

    #[test]
    fn test_resolve_link_keeps_plus_in_target() {
        assert_eq!(
            resolve_link("/url?q=https://x.com/a+b&sa=U"),
            "https://x.com/a+b"
        );
        assert_eq!(
            resolve_link("/url?q=https://x.com/search%3Fq%3Drust%2Blang&sa=U"),
            "https://x.com/search?q=rust+lang"
        );
    }

    #[test]
    fn test_resolve_link_direct() {
        assert_eq!(resolve_link("https://example.com"), "https://example.com");
        assert_eq!(resolve_link("/search?q=more"), "/search?q=more");
    }

    #[test]
    fn test_google_parse_results() {
        let html = r#"
        <html><body>
        <div class="g">
            <a href="/url?q=https://www.rust-lang.org/&sa=U"><h3>Rust Programming Language</h3></a>
            <div class="VwiC3b">A language empowering everyone.</div>
        </div>
        <div class="g">
            <a href="https://doc.rust-lang.org/book/"><span>no heading</span></a>
        </div>
        <div class="g">
            <a href="/search?q=related">Related searches</a>
        </div>
        </body></html>
        "#;
        let results = Google::new().parse(html).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].link, "https://www.rust-lang.org/");
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].snippet, "A language empowering everyone.");
        assert_eq!(results[0].source, "google");
        assert_eq!(results[1].title, "No title");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_google_parse_empty() {
        let results = Google::new().parse("<html><body></body></html>").unwrap();
        assert!(results.is_empty());
    }
}
