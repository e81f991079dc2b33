//! Page retrieval: how the validator fetches a page by path.
//!
//! SYSTEM CONTEXT
//! ==============
//! Critical-page checks only need a status and a body. [`DirSource`] reads
//! the built site from disk (a missing file is a 404, not an error);
//! [`HttpSource`] fetches from a running server so the check also covers
//! whatever serves the site.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use url::Url;

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid base URL `{0}`")]
    InvalidBaseUrl(String),
    #[error("invalid page path `{0}`")]
    InvalidPath(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

/// Status and body of one retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
}

impl Fetched {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Fetched, FetchError>;
}

/// Reads pages from the built site directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl PageSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<Fetched, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Ok(Fetched { status: 404, body: String::new() });
        }
        let mut file = self.root.join(relative);
        if tokio::fs::metadata(&file).await.is_ok_and(|meta| meta.is_dir()) {
            file.push("index.html");
        }
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(Fetched { status: 200, body: String::from_utf8_lossy(&bytes).into_owned() }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Fetched { status: 404, body: String::new() }),
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}

/// Fetches pages over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// `base_url` is the directory the site is served from, e.g.
    /// `http://127.0.0.1:3000/park-babelsberg/`. A missing trailing `/` is added.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut normalized = base_url.trim().to_owned();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|_| FetchError::InvalidBaseUrl(base_url.to_owned()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Fetched, FetchError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| FetchError::InvalidPath(path.to_owned()))?;
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Fetched { status, body })
    }
}
