use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            // Wikipedia serves a different (and table-poorer) page to
            // unknown agents, so present a browser UA.
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimits {
    pub requests_per_second: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            requests_per_second: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    pub master_file: PathBuf,
    pub training_file: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_max_age_hours: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            master_file: PathBuf::from("npfl_historical_data.csv"),
            training_file: PathBuf::from("npfl_training_data.csv"),
            cache_dir: PathBuf::from("html_cache"),
            cache_max_age_hours: 12,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub scraping: ScrapingConfig,
    pub rate_limits: RateLimits,
    pub storage: StorageConfig,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(user_agent) = env::var("NPFL_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Ok(timeout) =
            env::var("NPFL_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some))
        {
            if let Some(timeout) = timeout {
                config.scraping.request_timeout_secs = timeout;
            }
        }
        if let Ok(rps) =
            env::var("NPFL_RATE_LIMIT_RPS").map_or(Ok(None), |r| r.parse::<u32>().map(Some))
        {
            if let Some(rps) = rps {
                config.rate_limits.requests_per_second = rps;
            }
        }
        if let Ok(master_file) = env::var("NPFL_MASTER_FILE") {
            config.storage.master_file = PathBuf::from(master_file);
        }
        if let Ok(training_file) = env::var("NPFL_TRAINING_FILE") {
            config.storage.training_file = PathBuf::from(training_file);
        }
        if let Ok(cache_dir) = env::var("NPFL_CACHE_DIR") {
            config.storage.cache_dir = PathBuf::from(cache_dir);
        }
        if let Ok(hours) =
            env::var("NPFL_CACHE_MAX_AGE_HOURS").map_or(Ok(None), |h| h.parse::<u64>().map(Some))
        {
            if let Some(hours) = hours {
                config.storage.cache_max_age_hours = hours;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_project_files() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.storage.master_file,
            PathBuf::from("npfl_historical_data.csv")
        );
        assert_eq!(
            config.storage.training_file,
            PathBuf::from("npfl_training_data.csv")
        );
        assert_eq!(config.rate_limits.requests_per_second, 2);
        assert_eq!(config.scraping.request_timeout_secs, 30);
    }
}
