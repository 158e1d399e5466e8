use crate::products::ProductKind;
use crate::scrapers::http_scraper::DEFAULT_USER_AGENT;
use crate::{ScraperError, ScraperResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted look-back: thirty days.
pub const MAX_RECOVER_WINDOW_MINUTES: u64 = 30 * 24 * 60;

/// Runtime settings. Every field has a built-in default, so a config file
/// only needs to list what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub output_dir: PathBuf,
    pub products: Vec<ProductKind>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How far back to look for missing images on every iteration; 0 only
    /// fetches the latest available slot.
    pub recover_window_minutes: u64,
    pub headers: Vec<(String, String)>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("images"),
            products: vec![ProductKind::Gk2aInfrared],
            poll_interval_secs: 300,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            recover_window_minutes: 0,
            headers: Vec::new(),
        }
    }
}

impl ScraperConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScraperResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScraperResult<()> {
        if self.products.is_empty() {
            return Err(ScraperError::ConfigError(
                "at least one product must be configured".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ScraperError::ConfigError(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ScraperError::ConfigError(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        self.recover_window()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn recover_window(&self) -> ScraperResult<chrono::Duration> {
        if self.recover_window_minutes > MAX_RECOVER_WINDOW_MINUTES {
            return Err(ScraperError::ConfigError(format!(
                "recover_window_minutes must be at most {}",
                MAX_RECOVER_WINDOW_MINUTES
            )));
        }
        i64::try_from(self.recover_window_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or_else(|| {
                ScraperError::ConfigError("recover_window_minutes is out of range".to_string())
            })
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_products(mut self, products: Vec<ProductKind>) -> Self {
        self.products = products;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = interval.as_secs();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_recover_window(mut self, window: Duration) -> Self {
        self.recover_window_minutes = window.as_secs() / 60;
        self
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }
}
