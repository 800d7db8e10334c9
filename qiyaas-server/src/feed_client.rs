use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use qiyaas_core::{PuzzleFeed, parse_puzzle_payload, today_key};
use qiyaas_types::Puzzle;
use reqwest::Client;
use tokio::sync::Mutex;

/// Fetches the daily puzzle over HTTP, caching it for the rest of the day
pub struct HttpPuzzleFeed {
    client: Client,
    url: String,
    // Held across the request so concurrent callers share one fetch
    cached: Mutex<Option<Puzzle>>,
}

impl HttpPuzzleFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            cached: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self) -> Result<Puzzle> {
        tracing::debug!("Fetching daily puzzle from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        if !response.status().is_success() {
            bail!("API returned {}", response.status());
        }

        let body = response.text().await.context("Failed to read puzzle body")?;
        parse_puzzle_payload(&body)
    }
}

#[async_trait]
impl PuzzleFeed for HttpPuzzleFeed {
    async fn fetch(&self) -> Result<Puzzle> {
        let mut cached = self.cached.lock().await;
        let today = today_key();

        if let Some(puzzle) = cached.as_ref().filter(|puzzle| puzzle.date == today) {
            tracing::debug!("Using cached puzzle for {}", today);
            return Ok(puzzle.clone());
        }

        let puzzle = self.request().await?;
        *cached = Some(puzzle.clone());
        Ok(puzzle)
    }
}
