//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::debug;

use crate::fetcher::{random_user_agent, PageFetcher, PageRequest};
use crate::{Result, SearchError};

/// A page fetcher that uses plain HTTP requests via reqwest.
///
/// Every request carries a User-Agent picked at random from
/// [`USER_AGENTS`](crate::fetcher::USER_AGENTS) and is bounded by the
/// request's own timeout. Nothing is retried.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` with default settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String> {
        let user_agent = random_user_agent();
        debug!("GET {} (ua: {})", request.url, user_agent);

        let mut builder = self
            .client
            .get(&request.url)
            .header(USER_AGENT, user_agent)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        Ok(html)
    }
}
