use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid schedule: {0}")]
    ScheduleError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ScraperResult<T> = Result<T, ScraperError>;

impl ScraperError {
    /// Short label used to group failures in the run statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScraperError::HttpError(_) => "network",
            ScraperError::UnexpectedStatus { .. } => "status",
            ScraperError::InvalidImage(_) => "invalid_image",
            ScraperError::StorageError(_) | ScraperError::IoError(_) => "storage",
            ScraperError::UrlError(_) => "url",
            _ => "other",
        }
    }
}
