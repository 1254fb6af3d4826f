//! Existence checks for candidate image URLs.
//!
//! A check answers one question: can this URL be loaded as an image? Every
//! failure mode (missing file, network error, timeout, non-image payload)
//! collapses to `false`. Nothing is retried.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tokio::io::AsyncReadExt;
use tracing::{debug, trace};

use crate::config::{CheckMethod, SourceConfig};

/// Bytes read from the start of a resource to recognise its image format.
const SNIFF_LEN: usize = 32;

#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

#[async_trait]
impl<T: ExistenceCheck + ?Sized> ExistenceCheck for Arc<T> {
    async fn exists(&self, url: &str) -> bool {
        (**self).exists(url).await
    }
}

#[async_trait]
impl<T: ExistenceCheck + ?Sized> ExistenceCheck for Box<T> {
    async fn exists(&self, url: &str) -> bool {
        (**self).exists(url).await
    }
}

/// Build the check described by a configured image source.
pub fn from_source(source: &SourceConfig) -> Result<Box<dyn ExistenceCheck>> {
    match source {
        SourceConfig::Http {
            origin,
            method,
            request_timeout,
        } => {
            let origin = match origin {
                Some(raw) => Some(
                    Url::parse(raw).with_context(|| format!("invalid source origin {raw:?}"))?,
                ),
                None => None,
            };
            Ok(Box::new(HttpCheck::new(origin, *method, *request_timeout)?))
        }
        SourceConfig::Local { root, page } => {
            let mut check = LocalDirCheck::new(root.clone());
            if let Some(page) = page {
                check = check.with_page(page.clone());
            }
            Ok(Box::new(check))
        }
    }
}

/// Checks URLs over HTTP. Relative URLs are resolved against `origin`.
#[derive(Debug, Clone)]
pub struct HttpCheck {
    client: Client,
    origin: Option<Url>,
    method: CheckMethod,
}

impl HttpCheck {
    pub fn new(origin: Option<Url>, method: CheckMethod, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            origin,
            method,
        })
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        Url::parse(url)
            .ok()
            .or_else(|| self.origin.as_ref().and_then(|o| o.join(url).ok()))
    }

    async fn head(&self, url: Url) -> bool {
        let Ok(resp) = self.client.head(url).send().await else {
            return false;
        };
        if !resp.status().is_success() {
            return false;
        }
        match resp.headers().get(CONTENT_TYPE) {
            None => true,
            Some(v) => v.to_str().is_ok_and(|ct| ct.starts_with("image/")),
        }
    }

    async fn get(&self, url: Url) -> bool {
        let Ok(mut resp) = self.client.get(url).send().await else {
            return false;
        };
        if !resp.status().is_success() {
            return false;
        }
        let mut head = Vec::with_capacity(SNIFF_LEN);
        while head.len() < SNIFF_LEN {
            match resp.chunk().await {
                Ok(Some(chunk)) => head.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(_) => return false,
            }
        }
        image::guess_format(&head).is_ok()
    }
}

#[async_trait]
impl ExistenceCheck for HttpCheck {
    async fn exists(&self, url: &str) -> bool {
        let Some(resolved) = self.resolve(url) else {
            debug!(url, "unresolvable candidate url");
            return false;
        };
        let found = match self.method {
            CheckMethod::Head => self.head(resolved).await,
            CheckMethod::Get => self.get(resolved).await,
        };
        trace!(url, found, "http check");
        found
    }
}

/// Checks URL paths against a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalDirCheck {
    root: PathBuf,
    page: Option<PathBuf>,
}

impl LocalDirCheck {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page: None,
        }
    }

    /// Resolve relative URLs against `page` (a file path under the root),
    /// the way a browser resolves them against the page that loads them.
    pub fn with_page(mut self, page: impl Into<PathBuf>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL (or bare path) under the root. `None` if it would escape it.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let (path, from_root) = match Url::parse(url) {
            Ok(parsed) => (parsed.path().to_owned(), true),
            Err(_) => (url.to_owned(), url.starts_with('/')),
        };
        let mut rel = PathBuf::new();
        if !from_root && let Some(dir) = self.page.as_deref().and_then(Path::parent) {
            push_within(&mut rel, dir)?;
        }
        push_within(&mut rel, Path::new(path.trim_start_matches('/')))?;
        Some(self.root.join(rel))
    }
}

/// Append `path` to `rel`, applying `..` without climbing above `rel`'s start.
fn push_within(rel: &mut PathBuf, path: &Path) -> Option<()> {
    for comp in path.components() {
        match comp {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !rel.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(())
}

#[async_trait]
impl ExistenceCheck for LocalDirCheck {
    async fn exists(&self, url: &str) -> bool {
        let Some(path) = self.resolve(url) else {
            debug!(url, "candidate escapes local root");
            return false;
        };
        let Ok(file) = tokio::fs::File::open(&path).await else {
            return false;
        };
        let mut head = Vec::with_capacity(SNIFF_LEN);
        if file
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .await
            .is_err()
        {
            return false;
        }
        let found = image::guess_format(&head).is_ok();
        trace!(path = %path.display(), found, "local check");
        found
    }
}
