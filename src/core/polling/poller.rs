use crate::config::{ScraperConfig, MAX_RECOVER_WINDOW_MINUTES};
use crate::core::Product;
use crate::scrapers::HttpScraper;
use crate::stats::StatsTracker;
use crate::storage::{DiskStorage, ImageKey, StorageBackend};
use crate::{Scraper, ScraperError, ScraperResult};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved { path: PathBuf, bytes: usize },
    AlreadyPresent,
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// One attempt to obtain the image of `product` observed at `observed_at`.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub product: String,
    pub observed_at: DateTime<Utc>,
    pub url: Option<Url>,
    pub outcome: FetchOutcome,
}

pub struct Poller {
    scraper: Box<dyn Scraper>,
    storage: Box<dyn StorageBackend>,
    products: Vec<Box<dyn Product>>,
    poll_interval: Duration,
    recover_window: chrono::Duration,
    stats: Arc<StatsTracker>,
}

impl Poller {
    pub fn new(
        scraper: Box<dyn Scraper>,
        storage: Box<dyn StorageBackend>,
        products: Vec<Box<dyn Product>>,
    ) -> Self {
        Self {
            scraper,
            storage,
            products,
            poll_interval: Duration::from_secs(300),
            recover_window: chrono::Duration::zero(),
            stats: Arc::new(StatsTracker::new()),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> ScraperResult<Self> {
        config.validate()?;

        let products = config
            .products
            .iter()
            .map(|kind| kind.build())
            .collect::<ScraperResult<Vec<_>>>()?;

        let headers: Vec<(&str, &str)> = config
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let scraper = HttpScraper::with_options(&config.user_agent, config.request_timeout())?
            .with_headers(headers)?;

        let storage = DiskStorage::new(&config.output_dir)?;
        info!("Saving images under {}", storage.base_path().display());

        Ok(Self::new(Box::new(scraper), Box::new(storage), products)
            .with_poll_interval(config.poll_interval())
            .with_recover_window(config.recover_window()?))
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        // tokio intervals reject a zero period
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_recover_window(mut self, recover_window: chrono::Duration) -> Self {
        let longest = chrono::Duration::minutes(MAX_RECOVER_WINDOW_MINUTES as i64);
        self.recover_window = recover_window.clamp(chrono::Duration::zero(), longest);
        self
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Slots of `product` worth attempting at `now`, oldest first.
    pub fn due_slots(&self, product: &dyn Product, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let schedule = product.schedule();
        let latest = schedule.latest_available(now);
        if self.recover_window.is_zero() {
            return vec![latest];
        }
        // The window only adds older slots; the latest one is always due.
        let start = now
            .checked_sub_signed(self.recover_window)
            .map_or(latest, |start| start.min(latest));
        schedule.slots_between(start, now)
    }

    /// Runs a single iteration over every product. Failures are logged and
    /// reported in the returned attempts, never propagated.
    pub async fn poll_once(&self, now: DateTime<Utc>) -> Vec<FetchAttempt> {
        self.stats.record_iteration();
        let mut attempts = Vec::new();

        for product in &self.products {
            let product = product.as_ref();
            for observed_at in self.due_slots(product, now) {
                attempts.push(self.attempt(product, observed_at).await);
            }
            debug!(
                "Next {} image due at {}",
                product.name(),
                product.schedule().next_available(now).format("%Y-%m-%d %H:%M UTC")
            );
        }

        attempts
    }

    async fn attempt(&self, product: &dyn Product, observed_at: DateTime<Utc>) -> FetchAttempt {
        let (url, result) = match product.image_url(observed_at) {
            Ok(url) => {
                let result = self.fetch_and_store(product, observed_at, &url).await;
                (Some(url), result)
            }
            Err(e) => (None, Err(e)),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Failed to fetch {} image for {}: {}",
                    product.name(),
                    observed_at.format("%Y-%m-%d %H:%M UTC"),
                    e
                );
                self.stats.record_failure(e.kind());
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        FetchAttempt {
            product: product.name().to_string(),
            observed_at,
            url,
            outcome,
        }
    }

    async fn fetch_and_store(
        &self,
        product: &dyn Product,
        observed_at: DateTime<Utc>,
        url: &Url,
    ) -> ScraperResult<FetchOutcome> {
        let key = ImageKey::new(product.subfolder(), product.file_name(observed_at)?);
        if self.storage.contains(&key).await? {
            debug!("Already downloaded: {}", key.file_name);
            self.stats.record_skipped();
            return Ok(FetchOutcome::AlreadyPresent);
        }

        info!("Fetching URL: {}", url);
        let response = self.scraper.fetch(url.clone()).await?;
        self.stats
            .record_request(response.status, response.body.len(), response.elapsed);

        if !response.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        product
            .format()
            .validate(&response.body, product.min_file_size())?;

        let stored = self.storage.store(&key, &response.body).await?;
        info!(
            "Saved {} ({:.1} KB)",
            stored.location.display(),
            stored.bytes as f64 / 1024.0
        );
        self.stats.record_saved();

        Ok(FetchOutcome::Saved {
            path: stored.location,
            bytes: stored.bytes,
        })
    }

    /// Polls on a fixed period until Ctrl-C.
    pub async fn run(&self) -> ScraperResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for the shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Polls on a fixed period until `shutdown` resolves. An iteration that
    /// has started always runs to completion.
    pub async fn run_until<F>(&self, shutdown: F) -> ScraperResult<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting poller for {} product(s), polling every {}s",
            self.products.len(),
            self.poll_interval.as_secs()
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping poller");
                    break;
                }
                _ = ticker.tick() => {
                    let attempts = self.poll_once(Utc::now()).await;
                    let saved = attempts.iter().filter(|a| a.outcome.is_saved()).count();
                    let failed = attempts.iter().filter(|a| a.outcome.is_failed()).count();
                    debug!(
                        "Iteration finished: {} attempted, {} saved, {} failed",
                        attempts.len(),
                        saved,
                        failed
                    );
                }
            }
        }

        self.stats.finish();
        self.stats.log_summary();
        Ok(())
    }
}
