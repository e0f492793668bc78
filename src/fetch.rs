use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::Config;
use crate::{Error, Result};

/// One fetched search-results page. The collector decides what to do with
/// non-success statuses, so the status travels with the body instead of
/// being turned into an error here.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the collector and the network. Transport failures are
/// `Err`; a served error page is an `Ok` response with its status.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, page: usize) -> Result<PageResponse>;
}

/// Fetches search-results pages over HTTP with the configured
/// browser-impersonating headers.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .default_headers(build_header_map(&cfg.headers)?)
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
        })
    }

    fn page_url(&self, page: usize) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.base_url, sep, page)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, page: usize) -> Result<PageResponse> {
        let res = self.client.get(self.page_url(page)).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(PageResponse { status, body })
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::Config(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Config(format!("invalid value for header {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Serves a canned sequence of pages: page 1 gets the first entry and so
/// on; pages past the end get a 404 with an empty body. Counts fetches so
/// tests can assert on them.
pub struct StaticFetcher {
    pages: Vec<PageResponse>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(pages: Vec<PageResponse>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    /// Convenience for tests that only care about bodies.
    pub fn from_bodies<S: Into<String>>(bodies: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            bodies
                .into_iter()
                .map(|body| PageResponse {
                    status: 200,
                    body: body.into(),
                })
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, page: usize) -> Result<PageResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .get(page.saturating_sub(1))
            .cloned()
            .unwrap_or(PageResponse {
                status: 404,
                body: String::new(),
            }))
    }
}
