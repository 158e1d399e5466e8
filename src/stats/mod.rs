use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub iterations: usize,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub images_saved: usize,
    pub images_skipped: usize,
    pub failed_attempts: usize,
    pub bytes_downloaded: usize,
    pub status_codes: HashMap<u16, usize>,
    pub failure_reasons: HashMap<String, usize>,
    pub average_response_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                iterations: 0,
                total_requests: 0,
                successful_requests: 0,
                failed_requests: 0,
                images_saved: 0,
                images_skipped: 0,
                failed_attempts: 0,
                bytes_downloaded: 0,
                status_codes: HashMap::new(),
                failure_reasons: HashMap::new(),
                average_response_time: 0.0,
            })),
        }
    }

    pub fn record_iteration(&self) {
        self.stats.write().iterations += 1;
    }

    pub fn record_request(&self, status: u16, size: usize, duration: Duration) {
        let mut stats = self.stats.write();
        stats.total_requests += 1;

        if (200..300).contains(&status) {
            stats.successful_requests += 1;
            stats.bytes_downloaded += size;
        } else {
            stats.failed_requests += 1;
        }

        *stats.status_codes.entry(status).or_insert(0) += 1;

        let current_total = stats.average_response_time * (stats.total_requests - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_response_time = (current_total + new_duration) / stats.total_requests as f64;
    }

    pub fn record_saved(&self) {
        self.stats.write().images_saved += 1;
    }

    pub fn record_skipped(&self) {
        self.stats.write().images_skipped += 1;
    }

    pub fn record_failure(&self, reason: &str) {
        let mut stats = self.stats.write();
        stats.failed_attempts += 1;
        *stats.failure_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn log_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!("Scraping statistics:");
        info!("  Duration: {} seconds", duration.num_seconds());
        info!("  Iterations: {}", stats.iterations);
        info!(
            "  Requests: {} ({} successful, {} failed)",
            stats.total_requests, stats.successful_requests, stats.failed_requests
        );
        info!(
            "  Images: {} saved, {} already present, {} failed attempts",
            stats.images_saved, stats.images_skipped, stats.failed_attempts
        );
        info!(
            "  Data downloaded: {:.2} MB",
            stats.bytes_downloaded as f64 / 1_000_000.0
        );
        info!(
            "  Average response time: {:.2}ms",
            stats.average_response_time
        );

        for (code, count) in &stats.status_codes {
            info!("  Status {}: {}", code, count);
        }
        for (reason, count) in &stats.failure_reasons {
            info!("  Failure ({}): {}", reason, count);
        }

        if let Ok(json) = serde_json::to_string(&*stats) {
            debug!("Statistics: {}", json);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accounting() {
        let tracker = StatsTracker::new();
        tracker.record_request(200, 1000, Duration::milliseconds(100));
        tracker.record_request(404, 9, Duration::milliseconds(300));
        tracker.record_saved();
        tracker.record_failure("status");

        let stats = tracker.get_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.successful_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.bytes_downloaded, 1000);
        assert_eq!(stats.status_codes.get(&404), Some(&1));
        assert_eq!(stats.failure_reasons.get("status"), Some(&1));
        assert_eq!(stats.images_saved, 1);
        assert!((stats.average_response_time - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clones_share_counters() {
        let tracker = StatsTracker::new();
        let clone = tracker.clone();
        clone.record_skipped();
        clone.record_iteration();
        tracker.finish();

        let stats = tracker.get_stats();
        assert_eq!(stats.images_skipped, 1);
        assert_eq!(stats.iterations, 1);
        assert!(stats.end_time.is_some());
    }
}
