//! Page fetcher abstraction for retrieving HTML content.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::Result;

/// Realistic desktop and mobile browser User-Agent strings.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1",
];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Picks a User-Agent from [`USER_AGENTS`] using the supplied random source.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS
        .choose(rng)
        .copied()
        // USER_AGENTS is a non-empty const slice
        .unwrap_or(USER_AGENTS[0])
}

/// Picks a User-Agent using the thread-local random source.
pub fn random_user_agent() -> &'static str {
    pick_user_agent(&mut rand::thread_rng())
}

/// A single GET request for a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Fully built URL, query already encoded.
    pub url: String,
    /// Extra request headers. The fetcher adds the User-Agent itself.
    pub headers: Vec<(String, String)>,
    /// Upper bound for the whole request.
    pub timeout: Duration,
}

impl PageRequest {
    /// Creates a request with no extra headers and a 5 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Creates a request carrying the headers a desktop browser would send.
    pub fn browser(url: impl Into<String>, referer: Option<&str>) -> Self {
        let request = Self::new(url)
            .with_header("Accept", ACCEPT)
            .with_header("Accept-Language", ACCEPT_LANGUAGE);
        match referer {
            Some(referer) => request.with_header("Referer", referer),
            None => request,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Trait for fetching the HTML body of a results page.
///
/// Implementations must fail on network errors and non-2xx responses and
/// must not retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML content described by `request`.
    async fn fetch(&self, request: &PageRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_pick_user_agent_is_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(USER_AGENTS.contains(&pick_user_agent(&mut rng)));
        }
    }

    #[test]
    fn test_pick_user_agent_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first: Vec<_> = (0..10).map(|_| pick_user_agent(&mut a)).collect();
        let second: Vec<_> = (0..10).map(|_| pick_user_agent(&mut b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_user_agent_covers_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<_> = (0..500).map(|_| pick_user_agent(&mut rng)).collect();
        assert_eq!(seen.len(), USER_AGENTS.len());
    }

    #[test]
    fn test_random_user_agent() {
        let ua = random_user_agent();
        assert!(ua.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_page_request_new() {
        let request = PageRequest::new("https://example.com");
        assert_eq!(request.url, "https://example.com");
        assert!(request.headers.is_empty());
        assert_eq!(request.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_page_request_browser_headers() {
        let request = PageRequest::browser("https://example.com", Some("https://example.com/"));
        assert_eq!(request.header("accept"), Some(ACCEPT));
        assert_eq!(request.header("Accept-Language"), Some(ACCEPT_LANGUAGE));
        assert_eq!(request.header("referer"), Some("https://example.com/"));
        assert_eq!(request.header("User-Agent"), None);
    }

    #[test]
    fn test_page_request_browser_without_referer() {
        let request = PageRequest::browser("https://example.com", None);
        assert_eq!(request.header("Referer"), None);
        assert_eq!(request.headers.len(), 2);
    }

    #[test]
    fn test_page_request_with_timeout() {
        let request = PageRequest::new("u").with_timeout(Duration::from_secs(2));
        assert_eq!(request.timeout, Duration::from_secs(2));
    }
}
