use crate::{ScraperError, ScraperResult};
use chrono::{DateTime, Duration, Timelike, Utc};

/// Publication timetable of an imagery product.
///
/// A product publishes one image at each of `publish_minutes` past every hour
/// (UTC). An image only becomes downloadable `availability_delay` after its
/// nominal observation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationSchedule {
    publish_minutes: Vec<u32>,
    availability_delay: Duration,
}

impl ObservationSchedule {
    pub fn new(publish_minutes: &[u32], availability_delay: Duration) -> ScraperResult<Self> {
        if publish_minutes.is_empty() {
            return Err(ScraperError::ScheduleError(
                "at least one publication minute is required".to_string(),
            ));
        }
        if let Some(minute) = publish_minutes.iter().find(|m| **m >= 60) {
            return Err(ScraperError::ScheduleError(format!(
                "publication minute {} is out of range",
                minute
            )));
        }
        if availability_delay < Duration::zero() {
            return Err(ScraperError::ScheduleError(
                "availability delay must not be negative".to_string(),
            ));
        }

        let mut minutes = publish_minutes.to_vec();
        minutes.sort_unstable();
        minutes.dedup();

        Ok(Self {
            publish_minutes: minutes,
            availability_delay,
        })
    }

    /// One slot every `step_minutes`, starting on the hour.
    pub fn every(step_minutes: u32, availability_delay: Duration) -> ScraperResult<Self> {
        if step_minutes == 0 || 60 % step_minutes != 0 {
            return Err(ScraperError::ScheduleError(format!(
                "a step of {} minutes does not divide the hour",
                step_minutes
            )));
        }
        let minutes: Vec<u32> = (0..60).step_by(step_minutes as usize).collect();
        Self::new(&minutes, availability_delay)
    }

    pub fn publish_minutes(&self) -> &[u32] {
        &self.publish_minutes
    }

    pub fn availability_delay(&self) -> Duration {
        self.availability_delay
    }

    /// Latest publication slot at or before `at`.
    pub fn slot_at_or_before(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let hour_start = truncate_to_hour(at);
        match self.publish_minutes.iter().rev().find(|m| **m <= at.minute()) {
            Some(minute) => hour_start + Duration::minutes(i64::from(*minute)),
            None => {
                // publish_minutes is never empty
                let last = self.publish_minutes[self.publish_minutes.len() - 1];
                hour_start - Duration::hours(1) + Duration::minutes(i64::from(last))
            }
        }
    }

    /// First publication slot strictly after `at`.
    pub fn slot_after(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let hour_start = truncate_to_hour(at);
        let candidate = self
            .publish_minutes
            .iter()
            .map(|m| hour_start + Duration::minutes(i64::from(*m)))
            .find(|slot| *slot > at);

        candidate.unwrap_or_else(|| {
            hour_start + Duration::hours(1) + Duration::minutes(i64::from(self.publish_minutes[0]))
        })
    }

    /// Newest slot whose image should already be downloadable at `now`.
    pub fn latest_available(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.slot_at_or_before(now - self.availability_delay)
    }

    /// Wall-clock time at which the slot after the current latest one becomes available.
    pub fn next_available(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.slot_after(self.latest_available(now)) + self.availability_delay
    }

    /// All downloadable slots no older than `start`, oldest first.
    pub fn slots_between(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut slots = Vec::new();
        let mut slot = self.latest_available(now);
        while slot >= start {
            slots.push(slot);
            slot = self.slot_at_or_before(slot - Duration::minutes(1));
        }
        slots.reverse();
        slots
    }
}

fn truncate_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at - Duration::minutes(i64::from(at.minute()))
        - Duration::seconds(i64::from(at.second()))
        - Duration::nanoseconds(i64::from(at.nanosecond()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_rejects_invalid_minutes() {
        assert!(ObservationSchedule::new(&[], Duration::zero()).is_err());
        assert!(ObservationSchedule::new(&[0, 60], Duration::zero()).is_err());
        assert!(ObservationSchedule::new(&[0], Duration::minutes(-1)).is_err());
        assert!(ObservationSchedule::every(7, Duration::zero()).is_err());
        assert!(ObservationSchedule::every(0, Duration::zero()).is_err());
    }

    #[test]
    fn test_minutes_are_sorted_and_deduplicated() {
        let schedule = ObservationSchedule::new(&[40, 0, 20, 20], Duration::zero()).unwrap();
        assert_eq!(schedule.publish_minutes(), &[0, 20, 40]);

        let every = ObservationSchedule::every(15, Duration::zero()).unwrap();
        assert_eq!(every.publish_minutes(), &[0, 15, 30, 45]);
    }

    #[test]
    fn test_slot_at_or_before_within_hour() {
        let schedule = ObservationSchedule::new(&[0, 20, 40], Duration::zero()).unwrap();
        assert_eq!(
            schedule.slot_at_or_before(utc(2024, 3, 5, 7, 33, 12)),
            utc(2024, 3, 5, 7, 20, 0)
        );
        assert_eq!(
            schedule.slot_at_or_before(utc(2024, 3, 5, 7, 40, 0)),
            utc(2024, 3, 5, 7, 40, 0)
        );
    }

    #[test]
    fn test_slot_rolls_back_across_new_year() {
        let schedule = ObservationSchedule::new(&[10, 30, 50], Duration::zero()).unwrap();
        assert_eq!(
            schedule.slot_at_or_before(utc(2024, 1, 1, 0, 5, 0)),
            utc(2023, 12, 31, 23, 50, 0)
        );
    }

    #[test]
    fn test_slot_after_rolls_forward() {
        let schedule = ObservationSchedule::new(&[10, 30, 50], Duration::zero()).unwrap();
        assert_eq!(
            schedule.slot_after(utc(2024, 2, 29, 23, 50, 0)),
            utc(2024, 3, 1, 0, 10, 0)
        );
        assert_eq!(
            schedule.slot_after(utc(2024, 2, 29, 23, 12, 0)),
            utc(2024, 2, 29, 23, 30, 0)
        );
    }

    #[test]
    fn test_latest_available_applies_delay() {
        let infrared = ObservationSchedule::new(&[0, 20, 40], Duration::minutes(20)).unwrap();
        assert_eq!(
            infrared.latest_available(utc(2024, 3, 5, 12, 25, 0)),
            utc(2024, 3, 5, 12, 0, 0)
        );
        assert_eq!(
            infrared.latest_available(utc(2024, 3, 5, 12, 45, 0)),
            utc(2024, 3, 5, 12, 20, 0)
        );

        let full_disk = ObservationSchedule::every(15, Duration::hours(1)).unwrap();
        assert_eq!(
            full_disk.latest_available(utc(2024, 3, 5, 10, 7, 0)),
            utc(2024, 3, 5, 9, 0, 0)
        );
    }

    #[test]
    fn test_next_available() {
        let infrared = ObservationSchedule::new(&[0, 20, 40], Duration::minutes(20)).unwrap();
        assert_eq!(
            infrared.next_available(utc(2024, 3, 5, 12, 25, 0)),
            utc(2024, 3, 5, 12, 40, 0)
        );
    }

    #[test]
    fn test_slots_between() {
        let infrared = ObservationSchedule::new(&[0, 20, 40], Duration::minutes(20)).unwrap();
        let now = utc(2024, 3, 5, 7, 45, 10);
        let slots = infrared.slots_between(now - Duration::hours(1), now);
        assert_eq!(
            slots,
            vec![utc(2024, 3, 5, 7, 0, 0), utc(2024, 3, 5, 7, 20, 0)]
        );

        let empty = infrared.slots_between(now, now);
        assert!(empty.is_empty());
    }
}
