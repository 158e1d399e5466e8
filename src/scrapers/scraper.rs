use crate::{ImageResponse, ScraperResult};
use async_trait::async_trait;
use url::Url;

/// Issues a single GET. Non-success statuses are returned, not raised;
/// only transport failures are errors.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch(&self, url: Url) -> ScraperResult<ImageResponse>;
}
