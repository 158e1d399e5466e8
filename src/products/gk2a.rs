use super::directory_url;
use crate::core::{ImageFormat, ObservationSchedule, Product};
use crate::ScraperResult;
use chrono::{DateTime, Duration, Utc};
use url::Url;

pub const GK2A_BASE_URL: &str = "https://nmsc.kma.go.kr/IMG/GK2A/AMI/PRIMARY/L1B/COMPLETE/FD/";

/// Full-disk GK-2A AMI composites published by the KMA satellite centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gk2aChannel {
    /// Colour-enhanced 10.5 µm infrared, 2 km resolution.
    EnhancedInfrared,
    /// True-colour RGB, 1 km resolution.
    TrueColor,
}

impl Gk2aChannel {
    fn name(&self) -> &'static str {
        match self {
            Gk2aChannel::EnhancedInfrared => "gk2a_infrared",
            Gk2aChannel::TrueColor => "gk2a_true_color",
        }
    }

    fn product_code(&self) -> &'static str {
        match self {
            Gk2aChannel::EnhancedInfrared => "enhc-color-ir105",
            Gk2aChannel::TrueColor => "rgb-true",
        }
    }

    fn resolution(&self) -> &'static str {
        match self {
            Gk2aChannel::EnhancedInfrared => "fd020ge",
            Gk2aChannel::TrueColor => "fd010ge",
        }
    }

    fn publish_minutes(&self) -> &'static [u32] {
        match self {
            Gk2aChannel::EnhancedInfrared => &[0, 20, 40],
            Gk2aChannel::TrueColor => &[10, 30, 50],
        }
    }

    fn min_file_size(&self) -> usize {
        match self {
            Gk2aChannel::EnhancedInfrared => 1024,
            Gk2aChannel::TrueColor => 100 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gk2aProduct {
    channel: Gk2aChannel,
    base_url: Url,
    schedule: ObservationSchedule,
}

impl Gk2aProduct {
    pub fn new(channel: Gk2aChannel) -> ScraperResult<Self> {
        Ok(Self {
            channel,
            base_url: directory_url(GK2A_BASE_URL)?,
            schedule: ObservationSchedule::new(channel.publish_minutes(), Duration::minutes(20))?,
        })
    }

    pub fn infrared() -> ScraperResult<Self> {
        Self::new(Gk2aChannel::EnhancedInfrared)
    }

    pub fn true_color() -> ScraperResult<Self> {
        Self::new(Gk2aChannel::TrueColor)
    }

    pub fn with_base_url(mut self, base_url: &str) -> ScraperResult<Self> {
        self.base_url = directory_url(base_url)?;
        Ok(self)
    }
}

impl Product for Gk2aProduct {
    fn name(&self) -> &str {
        self.channel.name()
    }

    fn schedule(&self) -> &ObservationSchedule {
        &self.schedule
    }

    fn image_url(&self, observed_at: DateTime<Utc>) -> ScraperResult<Url> {
        let file_name = format!(
            "gk2a_ami_le1b_{}_{}_{}.srv.png",
            self.channel.product_code(),
            self.channel.resolution(),
            observed_at.format("%Y%m%d%H%M")
        );
        let path = format!("{}/{}", observed_at.format("%Y%m/%d/%H"), file_name);
        Ok(self.base_url.join(&path)?)
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn min_file_size(&self) -> usize {
        self.channel.min_file_size()
    }
}
