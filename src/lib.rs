pub mod config;
pub mod core;
pub mod http;
pub mod products;
pub mod scrapers;
pub mod stats;
pub mod storage;

pub use crate::core::{FetchAttempt, FetchOutcome, ImageFormat, ObservationSchedule, Poller, Product};
pub use crate::core::{ScraperError, ScraperResult};
pub use config::ScraperConfig;
pub use http::ImageResponse;
pub use scrapers::Scraper;
pub use stats::StatsTracker;
pub use storage::DiskStorage;
