// src/crawl/fetch.rs
// =============================================================================
// This module fetches pages for the crawler.
//
// The traversal only talks to the Fetcher trait, so tests can swap in a fake
// site and the binary uses HttpFetcher (reqwest).
//
// Important difference from a normal browser-like client:
// - Redirects are NOT followed. A 301/302 comes back as a page of its own,
//   with whatever body the server sent. The crawler still scans that body
//   for links, but never adds the page to the sitemap (status is not 2xx).
// - Non-2xx statuses are not errors here. Only transport failures are.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;

use crate::error::SitemapError;

pub const DEFAULT_USER_AGENT: &str = concat!("sitemap-crawler/", env!("CARGO_PKG_VERSION"));

/// A fetched document, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        FetchedPage {
            status,
            body: body.into(),
        }
    }

    // Only the first digit matters: 2xx pages go into the sitemap
    pub fn is_success(&self) -> bool {
        self.status.to_string().starts_with('2')
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the response as-is
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Default user agent, no timeout
    pub fn new() -> Result<Self, SitemapError> {
        Self::with_options(DEFAULT_USER_AGENT, None)
    }

    // Parameters:
    //   user_agent: sent with every request
    //   timeout: per-request timeout, None waits forever
    pub fn with_options(user_agent: &str, timeout: Option<Duration>) -> Result<Self, SitemapError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none());

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpFetcher {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Reading body of {} failed", url))?;

        Ok(FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_success_is_first_digit_two() {
        assert!(FetchedPage::new(200, "").is_success());
        assert!(FetchedPage::new(204, "").is_success());
        assert!(!FetchedPage::new(301, "").is_success());
        assert!(!FetchedPage::new(404, "").is_success());
        assert!(!FetchedPage::new(500, "").is_success());
    }

    #[tokio::test]
    async fn test_fetch_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let page = fetcher.fetch(&format!("{}/missing", server.uri())).await.unwrap();

        assert_eq!(page, FetchedPage::new(404, "gone"));
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", "/new")
                    .set_body_string(r#"<a href="/new">moved</a>"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let page = fetcher.fetch(&format!("{}/old", server.uri())).await.unwrap();

        assert_eq!(page.status, 301);
        assert!(page.body.contains("/new"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_an_error() {
        // Grab a free port, then close it again so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = HttpFetcher::with_options("test", Some(Duration::from_secs(2))).unwrap();
        assert!(fetcher.fetch(&format!("http://127.0.0.1:{}/", port)).await.is_err());
    }
}
