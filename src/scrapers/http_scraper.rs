use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::Scraper;
use crate::{ImageResponse, ScraperError, ScraperResult};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum HttpScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

impl From<HttpScraperError> for ScraperError {
    fn from(err: HttpScraperError) -> Self {
        match err {
            HttpScraperError::HttpError(e) => ScraperError::HttpError(e),
            other => ScraperError::ConfigError(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct HttpScraper {
    client: Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpScraper {
    pub fn new() -> Result<Self, HttpScraperError> {
        Self::with_options(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    pub fn with_options(user_agent: &str, timeout: Duration) -> Result<Self, HttpScraperError> {
        let client = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            timeout,
        })
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Result<Self, HttpScraperError> {
        let mut header_map = header::HeaderMap::new();
        header_map.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&self.user_agent)?,
        );

        for (key, value) in headers {
            let name = header::HeaderName::from_bytes(key.as_bytes())?;
            let value = header::HeaderValue::from_str(value)?;
            header_map.insert(name, value);
        }

        self.client = ClientBuilder::new()
            .default_headers(header_map)
            .timeout(self.timeout)
            .build()?;

        Ok(self)
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch(&self, url: Url) -> ScraperResult<ImageResponse> {
        let start_time = Utc::now();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);
        let body = response.bytes().await?.to_vec();
        let elapsed = Utc::now() - start_time;

        debug!(
            "Received response: url={}, status={}, body_length={}, elapsed={}ms",
            url,
            status,
            body.len(),
            elapsed.num_milliseconds()
        );

        Ok(ImageResponse {
            url,
            status,
            headers,
            body,
            elapsed,
        })
    }
}
