//! Where dataset bodies come from.
//!
//! A loader only needs "give me the body and status for this locator".
//! [`HttpSource`] serves the static site over HTTP; [`DirSource`] reads the
//! same layout from disk and answers 404 for missing files so both behave
//! the same way to the loader.

use std::path::PathBuf;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;

use crate::error::{LoadError, Result};

/// Raw response for one locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
}

impl Fetched {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn not_found() -> Self {
        Self { status: 404, body: String::new() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches resource bodies by locator (a path relative to the source base,
/// e.g. `data/title_oscar.tsv`).
pub trait ResourceSource: Send + Sync {
    fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<Fetched>>;
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Static hosting over HTTP(S).
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, locator: &str) -> String {
        format!("{}/{}", self.base_url, locator.trim_start_matches('/'))
    }
}

impl ResourceSource for HttpSource {
    fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<Fetched>> {
        async move {
            let url = self.url_for(locator);
            debug!("GET {url}");
            let transport = |e: reqwest::Error| LoadError::Transport {
                locator: locator.to_string(),
                message: e.to_string(),
            };
            let response = self.client.get(&url).send().await.map_err(transport)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(transport)?;
            Ok(Fetched { status, body })
        }
        .boxed()
    }
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// A directory laid out like the static site.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.root.join(locator.trim_start_matches('/'))
    }
}

impl ResourceSource for DirSource {
    fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<Fetched>> {
        async move {
            let path = self.path_for(locator);
            debug!("reading {}", path.display());
            match tokio::fs::read_to_string(&path).await {
                Ok(body) => Ok(Fetched::ok(body)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fetched::not_found()),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }
}
