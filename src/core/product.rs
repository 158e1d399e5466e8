use crate::core::schedule::ObservationSchedule;
use crate::{ScraperError, ScraperResult};
use chrono::{DateTime, Utc};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn magic(&self) -> &'static [u8] {
        match self {
            ImageFormat::Png => b"\x89PNG",
            ImageFormat::Jpeg => b"\xFF\xD8",
        }
    }

    /// Rejects error pages and truncated downloads served with a success status.
    pub fn validate(&self, body: &[u8], min_size: usize) -> ScraperResult<()> {
        if body.len() < min_size {
            return Err(ScraperError::InvalidImage(format!(
                "body is {} bytes, expected at least {}",
                body.len(),
                min_size
            )));
        }
        if !body.starts_with(self.magic()) {
            return Err(ScraperError::InvalidImage(format!(
                "body does not start with the {:?} signature",
                self
            )));
        }
        Ok(())
    }
}

/// An imagery product published on a fixed timetable at a predictable URL.
pub trait Product: Send + Sync {
    fn name(&self) -> &str;
    fn schedule(&self) -> &ObservationSchedule;
    fn image_url(&self, observed_at: DateTime<Utc>) -> ScraperResult<Url>;
    fn format(&self) -> ImageFormat;

    fn min_file_size(&self) -> usize {
        1024
    }

    fn subfolder(&self) -> &str {
        self.name()
    }

    /// Local file name for the image observed at `observed_at`: the last
    /// segment of its URL, which always carries the observation timestamp.
    fn file_name(&self, observed_at: DateTime<Utc>) -> ScraperResult<String> {
        let url = self.image_url(observed_at)?;
        url.path_segments()
            .and_then(|segments| segments.last())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ScraperError::ConfigError(format!("URL {} has no file name", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_validation() {
        let mut body = b"\x89PNG\r\n\x1a\n".to_vec();
        body.resize(2048, 0);
        assert!(ImageFormat::Png.validate(&body, 1024).is_ok());
        assert!(ImageFormat::Png.validate(&body, 4096).is_err());
        assert!(ImageFormat::Jpeg.validate(&body, 1024).is_err());
    }

    #[test]
    fn test_error_page_is_rejected() {
        let mut body = b"<html><body>Not Found</body></html>".to_vec();
        body.resize(4096, b' ');
        let err = ImageFormat::Png.validate(&body, 1024).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidImage(_)));
    }

    #[test]
    fn test_jpeg_validation() {
        let mut body = vec![0xFF, 0xD8, 0xFF, 0xE0];
        body.resize(600, 0);
        assert!(ImageFormat::Jpeg.validate(&body, 512).is_ok());
    }
}
