use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::{FeedError, Result};

/// Upper bound on a feed body; the live upstream stays well below this.
pub const MAX_FEED_BYTES: usize = 32 * 1024 * 1024;

/// Transport that produces the raw feed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// HTTP GET against a live feed API.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        if bytes.len() > MAX_FEED_BYTES {
            return Err(FeedError::TooLarge(bytes.len()));
        }
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Static snapshot on disk, the counterpart of serving `flights.json`
/// next to the viewer.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.len() > MAX_FEED_BYTES {
            return Err(FeedError::TooLarge(bytes.len()));
        }
        Ok(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source selected from the configured endpoint string.
#[derive(Debug, Clone)]
pub enum EndpointSource {
    Http(HttpFeedSource),
    File(FileFeedSource),
}

/// `http://` and `https://` endpoints are fetched over the network, anything
/// else is read as a local path.
pub fn source_for_endpoint(endpoint: &str, client: reqwest::Client) -> EndpointSource {
    let endpoint = endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        EndpointSource::Http(HttpFeedSource::new(client, endpoint))
    } else {
        EndpointSource::File(FileFeedSource::new(endpoint))
    }
}

#[async_trait]
impl FeedSource for EndpointSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            EndpointSource::Http(s) => s.fetch().await,
            EndpointSource::File(s) => s.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            EndpointSource::Http(s) => s.describe(),
            EndpointSource::File(s) => s.describe(),
        }
    }
}
