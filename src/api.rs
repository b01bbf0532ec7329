use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::http_cache::{FetchCache, fetch_text_cached};
use crate::http_client::http_client;
use crate::types::{
    FranchiseDetailResponse, ManagersResponse, PlayoffResponse, RecordsResponse, Season,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    sport: String,
    client: Client,
    cache: Arc<FetchCache>,
}

impl ApiClient {
    pub fn new(base_url: &str, sport: &str, timeout_secs: u64, cache: Arc<FetchCache>) -> Result<Self> {
        let client = http_client(timeout_secs)?.clone();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sport: sport.to_string(),
            client,
            cache,
        })
    }

    pub fn sport(&self) -> &str {
        &self.sport
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let body = fetch_text_cached(&self.cache, &self.client, &url)?;
        info!(url = %url, bytes = body.len(), "api payload ready");
        Ok(body)
    }

    pub fn seasons(&self) -> Result<Vec<Season>> {
        let raw = self.get_text(&format!("/api/{}/seasons", self.sport))?;
        parse_seasons_json(&raw)
    }

    pub fn managers(&self) -> Result<ManagersResponse> {
        let raw = self.get_text(&format!("/api/{}/managers", self.sport))?;
        parse_managers_json(&raw)
    }

    pub fn records(&self) -> Result<RecordsResponse> {
        let raw = self.get_text(&format!("/api/{}/records", self.sport))?;
        parse_records_json(&raw)
    }

    pub fn playoffs(&self, season: Option<i32>) -> Result<PlayoffResponse> {
        let path = match season {
            Some(season) => format!("/api/{}/playoffs?season={season}", self.sport),
            None => format!("/api/{}/playoffs", self.sport),
        };
        let raw = self.get_text(&path)?;
        parse_playoffs_json(&raw)
    }

    pub fn franchise_detail(&self, franchise_id: &str) -> Result<FranchiseDetailResponse> {
        let raw = self.get_text(&format!("/api/{}/franchise/{franchise_id}", self.sport))?;
        parse_franchise_detail_json(&raw)
    }
}

/// A literal `null` body is treated as an empty payload.
fn parse_or_default<T: DeserializeOwned + Default>(raw: &str, what: &str) -> Result<T> {
    let parsed: Option<T> =
        serde_json::from_str(raw).with_context(|| format!("invalid {what} json"))?;
    Ok(parsed.unwrap_or_default())
}

pub fn parse_seasons_json(raw: &str) -> Result<Vec<Season>> {
    parse_or_default(raw, "seasons")
}

pub fn parse_managers_json(raw: &str) -> Result<ManagersResponse> {
    parse_or_default(raw, "managers")
}

pub fn parse_records_json(raw: &str) -> Result<RecordsResponse> {
    parse_or_default(raw, "records")
}

pub fn parse_playoffs_json(raw: &str) -> Result<PlayoffResponse> {
    parse_or_default(raw, "playoffs")
}

pub fn parse_franchise_detail_json(raw: &str) -> Result<FranchiseDetailResponse> {
    parse_or_default(raw, "franchise detail")
}
