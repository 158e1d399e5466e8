use crate::{ImageResponse, ScraperError, ScraperResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use url::Url;

use super::Scraper;

#[derive(Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Option<std::time::Duration>,
    pub network_error: bool,
}

impl MockResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            delay: None,
            network_error: false,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            delay: None,
            network_error: false,
        }
    }

    pub fn network_error() -> Self {
        Self {
            network_error: true,
            ..Self::status(0)
        }
    }
}

/// Replays canned responses in order, cycling when exhausted, and records
/// every requested URL with the (tokio) instant it was requested.
#[derive(Clone)]
pub struct MockScraper {
    responses: Arc<Vec<MockResponse>>,
    current_response: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Url, Instant)>>>,
}

impl MockScraper {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(responses),
            current_response: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<(Url, Instant)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch(&self, url: Url) -> ScraperResult<ImageResponse> {
        self.requests.lock().push((url.clone(), Instant::now()));

        let index = self.current_response.fetch_add(1, Ordering::SeqCst);
        let response = &self.responses[index % self.responses.len()];

        if let Some(delay) = response.delay {
            sleep(delay).await;
        }

        if response.network_error {
            return Err(ScraperError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        Ok(ImageResponse {
            url,
            status: response.status,
            headers: HashMap::new(),
            body: response.body.clone(),
            elapsed: chrono::Duration::zero(),
        })
    }
}
