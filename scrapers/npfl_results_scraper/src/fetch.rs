use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};
use tracing::{debug, info};

use crate::config::ScraperConfig;

const MAX_RETRIES: u32 = 2;
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UrlState {
    last_checked: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FetchState {
    urls: HashMap<String, UrlState>,
}

/// Rate-limited, retrying page fetcher with an on-disk HTML cache. A page
/// fetched within the freshness window is served from disk so repeated
/// update runs don't hammer Wikipedia.
pub struct PageFetcher {
    client: reqwest::blocking::Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    cache_dir: PathBuf,
    max_cache_age: Duration,
    state: FetchState,
}

impl PageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limits.requests_per_second)
                .ok_or_else(|| anyhow!("Invalid requests_per_second value"))?,
        );
        let rate_limiter = RateLimiter::direct(quota);

        let cache_dir = config.storage.cache_dir.clone();
        let state_path = cache_dir.join(STATE_FILE);
        let state = if state_path.exists() {
            let json = fs::read_to_string(&state_path)?;
            serde_json::from_str(&json).unwrap_or_default()
        } else {
            FetchState::default()
        };

        Ok(Self {
            client,
            rate_limiter,
            cache_dir,
            max_cache_age: Duration::from_secs(config.storage.cache_max_age_hours * 3600),
            state,
        })
    }

    /// Fetches one page, serving from the cache when it is fresh enough.
    pub fn fetch_page(&mut self, url: &str) -> Result<String> {
        let cache_path = self.cache_path(url);
        if let Some(html) = self.load_cached(url, &cache_path) {
            return Ok(html);
        }

        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(50));
        }

        let client = &self.client;
        let html = Self::retry_with_backoff(|| {
            let response = client
                .get(url)
                .send()
                .with_context(|| format!("request to {} failed", url))?;
            if !response.status().is_success() {
                anyhow::bail!("HTTP {} for {}", response.status(), url);
            }
            response.text().context("reading response body")
        })?;

        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&cache_path, &html).with_context(|| format!("caching {}", url))?;
        self.state.urls.insert(
            url.to_string(),
            UrlState {
                last_checked: Utc::now(),
            },
        );
        self.save_state()?;
        Ok(html)
    }

    fn load_cached(&self, url: &str, path: &Path) -> Option<String> {
        let checked = self.state.urls.get(url)?.last_checked;
        let age = Utc::now().signed_duration_since(checked).to_std().ok()?;
        if age > self.max_cache_age || !path.exists() {
            return None;
        }
        debug!("Serving {} from cache", url);
        fs::read_to_string(path).ok()
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let safe = url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .replace(['/', '?', '%'], "_");
        self.cache_dir.join(format!("{}.html", safe))
    }

    fn save_state(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(self.cache_dir.join(STATE_FILE), json)?;
        Ok(())
    }

    fn retry_with_backoff<F, T>(mut operation: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut delay = INITIAL_RETRY_DELAY;
        let mut attempt = 1;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= MAX_RETRIES {
                        return Err(e.context("Max retries exceeded"));
                    }
                    info!("Retry attempt {} after error: {}", attempt, e);
                    thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }
}

/// Builds the Wikipedia URL for a season label like "2024-25". Page titles
/// use an en dash between the years, and the league changed its name from
/// "Professional" to "Premier" with the 2023-24 season.
pub fn season_url(label: &str) -> String {
    let start_year: u32 = label
        .get(..4)
        .and_then(|year| year.parse().ok())
        .unwrap_or(0);
    let league = if start_year >= 2023 {
        "Nigeria_Premier_Football_League"
    } else {
        "Nigeria_Professional_Football_League"
    };
    let title = label.replacen('-', "\u{2013}", 1);
    format!(
        "https://en.wikipedia.org/wiki/{}_{}",
        urlencoding::encode(&title),
        league
    )
}
