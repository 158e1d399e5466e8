use super::directory_url;
use crate::core::{ImageFormat, ObservationSchedule, Product};
use crate::ScraperResult;
use chrono::{DateTime, Duration, Utc};
use url::Url;

pub const FY4B_BASE_URL: &str = "https://img.nsmc.org.cn/CLOUDIMAGE/FY4B/AGRI/GCLR/DISK/";

/// FY-4B AGRI geostationary colour full disk. Each image covers a 15 minute
/// scan and is only reliably published an hour after the scan started.
#[derive(Debug, Clone)]
pub struct Fy4bProduct {
    base_url: Url,
    schedule: ObservationSchedule,
}

impl Fy4bProduct {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            base_url: directory_url(FY4B_BASE_URL)?,
            schedule: ObservationSchedule::every(15, Duration::hours(1))?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> ScraperResult<Self> {
        self.base_url = directory_url(base_url)?;
        Ok(self)
    }
}

impl Product for Fy4bProduct {
    fn name(&self) -> &str {
        "fy4b_full_disk"
    }

    fn schedule(&self) -> &ObservationSchedule {
        &self.schedule
    }

    fn image_url(&self, observed_at: DateTime<Utc>) -> ScraperResult<Url> {
        let scan_end = observed_at + Duration::minutes(14) + Duration::seconds(59);
        let file_name = format!(
            "FY4B-_AGRI--_N_DISK_1050E_L2-_GCLR_MULT_NOM_{}_{}_1000M_V0001.JPG",
            observed_at.format("%Y%m%d%H%M00"),
            scan_end.format("%Y%m%d%H%M%S")
        );
        Ok(self.base_url.join(&file_name)?)
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn min_file_size(&self) -> usize {
        500 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scan_window_in_url() {
        let product = Fy4bProduct::new().unwrap();
        let observed_at = Utc.with_ymd_and_hms(2024, 6, 30, 23, 45, 0).unwrap();
        assert_eq!(
            product.image_url(observed_at).unwrap().as_str(),
            "https://img.nsmc.org.cn/CLOUDIMAGE/FY4B/AGRI/GCLR/DISK/FY4B-_AGRI--_N_DISK_1050E_L2-_GCLR_MULT_NOM_20240630234500_20240630235959_1000M_V0001.JPG"
        );
    }

    #[test]
    fn test_latest_slot_is_an_hour_behind() {
        let product = Fy4bProduct::new().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 10, 7, 0).unwrap();
        let slot = product.schedule().latest_available(now);
        assert_eq!(slot, Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap());
        assert_eq!(
            product.file_name(slot).unwrap(),
            "FY4B-_AGRI--_N_DISK_1050E_L2-_GCLR_MULT_NOM_20240630090000_20240630091459_1000M_V0001.JPG"
        );
    }
}
