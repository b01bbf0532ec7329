//! Process-scoped response memo.
//!
//! Created once at startup and shared by handle. Each URL is fetched at most
//! once on success; later requests for the same URL are served from memory
//! until the process exits. Failures are not stored, so a later request
//! retries. There is no invalidation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

#[derive(Debug, Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, url: &str) -> Arc<OnceCell<String>> {
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    pub fn get(&self, url: &str) -> Option<String> {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(url).and_then(|cell| cell.get().cloned())
    }

    /// Returns the memoized body for `url`, running `fetch` only when nothing
    /// is stored yet. Concurrent callers for the same URL wait on one fetch;
    /// other URLs are not blocked.
    pub fn get_or_fetch<F>(&self, url: &str, fetch: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let cell = self.slot(url);
        if let Some(body) = cell.get() {
            debug!(url, "fetch cache hit");
            return Ok(body.clone());
        }
        let body = cell.get_or_try_init(|| {
            debug!(url, "fetch cache miss");
            fetch(url)
        })?;
        Ok(body.clone())
    }

    /// Number of URLs with a stored body.
    pub fn len(&self) -> usize {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard.values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn fetch_text_cached(cache: &FetchCache, client: &Client, url: &str) -> Result<String> {
    cache.get_or_fetch(url, |url| {
        let resp = client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }
        Ok(body)
    })
}
