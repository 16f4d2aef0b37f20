// src/fetch/mod.rs

use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::FetchError;

pub mod cache;
pub mod download;

pub use cache::PageCache;
pub use download::download_to_dir;

/// Exponential backoff for retryable failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 0,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

/// The HTTP session shared by every request of a run: one client for connection
/// reuse, plus an optional response cache.
pub struct Session {
    client: Client,
    cache: Option<PageCache>,
    retry: RetryPolicy,
}

impl Session {
    pub fn new(client: Client, cache: Option<PageCache>, retry: RetryPolicy) -> Self {
        Self {
            client,
            cache,
            retry,
        }
    }

    /// Drops every cached response. Returns how many entries were removed.
    pub fn clear_cache(&self) -> std::io::Result<usize> {
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(0),
        }
    }

    async fn get_core(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }

    async fn get_with_retry(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut attempts = 0;
        loop {
            match self.get_core(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempts < self.retry.max_retries => {
                    attempts += 1;
                    let backoff = self.retry.backoff(attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "retrying");
                    sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Raw response body, served from the cache when present.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(url)) {
            debug!(%url, "cache hit");
            return Ok(body);
        }
        let body = self.get_with_retry(url).await?;
        if let Some(cache) = &self.cache {
            cache.put(url, &body);
        }
        Ok(body)
    }

    /// Response body decoded as UTF-8 whatever charset the server declares.
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let body = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Fetches a page's text. Any failure is logged once and turned into `None`, so a
/// dead page never aborts the caller's batch.
pub async fn fetch_page(session: &Session, url: &Url) -> Option<String> {
    match session.get_text(url).await {
        Ok(text) => Some(text),
        Err(e) => {
            error!(%url, error = %e, "failed to load page");
            None
        }
    }
}
