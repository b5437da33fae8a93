//! # Retention
//!
//! A document's retention date is its creation instant plus the configured
//! number of calendar years. The time of day is kept. A creation date of
//! 29 February rolls to 1 March when the target year is not a leap year.

use tracing::debug;

use docgov_core::{DocumentPolicy, Timestamp};

use crate::error::DocumentError;
use crate::record::DocumentRecord;

/// Computes retention deadlines and selects records past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionCalculator {
    retention_years: u32,
}

impl RetentionCalculator {
    pub fn new(retention_years: u32) -> Self {
        Self { retention_years }
    }

    pub fn from_policy(policy: &DocumentPolicy) -> Self {
        Self::new(policy.retention_years)
    }

    pub fn retention_years(&self) -> u32 {
        self.retention_years
    }

    /// `created_at` plus the configured whole calendar years.
    pub fn compute_retention_date(
        &self,
        created_at: Timestamp,
    ) -> Result<Timestamp, DocumentError> {
        created_at
            .add_calendar_years(self.retention_years)
            .map_err(|e| DocumentError::DeadlineOverflow(e.to_string()))
    }

    /// Records whose retention date has been reached at `now`, in input order.
    pub fn due_for_retention<'a, I>(&self, records: I, now: Timestamp) -> Vec<&'a DocumentRecord>
    where
        I: IntoIterator<Item = &'a DocumentRecord>,
    {
        let due: Vec<_> = records
            .into_iter()
            .filter(|record| record.is_retention_expired(now))
            .collect();
        debug!(count = due.len(), now = %now, "retention scan");
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_five_year_retention_keeps_time_of_day() {
        let calc = RetentionCalculator::new(5);
        let date = calc.compute_retention_date(ts("2026-03-15T10:30:00Z")).unwrap();
        assert_eq!(date, ts("2031-03-15T10:30:00Z"));
    }

    #[test]
    fn test_leap_day_rolls_forward() {
        let calc = RetentionCalculator::new(5);
        let date = calc.compute_retention_date(ts("2028-02-29T08:00:00Z")).unwrap();
        assert_eq!(date, ts("2033-03-01T08:00:00Z"));
    }

    #[test]
    fn test_leap_day_to_leap_year_is_exact() {
        let calc = RetentionCalculator::new(4);
        let date = calc.compute_retention_date(ts("2028-02-29T08:00:00Z")).unwrap();
        assert_eq!(date, ts("2032-02-29T08:00:00Z"));
    }

    #[test]
    fn test_from_policy() {
        let policy = DocumentPolicy {
            retention_years: 7,
            ..DocumentPolicy::default()
        };
        assert_eq!(RetentionCalculator::from_policy(&policy).retention_years(), 7);
    }

    #[test]
    fn test_overflow_reported() {
        let calc = RetentionCalculator::new(u32::MAX);
        let err = calc.compute_retention_date(ts("2026-01-01T00:00:00Z")).unwrap_err();
        assert_eq!(err.kind(), "DEADLINE_OVERFLOW");
    }
}
