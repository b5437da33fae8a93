//! # Temporal Types: UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds precision.
//! Every time value on a document record (creation, update, processing,
//! retention deadline, encryption attestation, audit entries) is a
//! `Timestamp`, so records serialize to `YYYY-MM-DDTHH:MM:SSZ` and survive a
//! JSON round trip bit-for-bit.
//!
//! ## Calendar Arithmetic
//!
//! Retention deadlines are computed in calendar years, not fixed day
//! counts. [`Timestamp::add_calendar_years`] keeps month, day, and time of
//! day. A 29 February origin rolls over to 1 March when the target year is
//! not a leap year.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocgovError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`]: from an ISO8601 string, rejecting non-UTC offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string with a `Z` suffix.
    ///
    /// Explicit offsets, including `+00:00`, are rejected so persisted
    /// records have a single textual form per instant.
    pub fn parse(s: &str) -> Result<Self, DocgovError> {
        if !s.ends_with('Z') {
            return Err(DocgovError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any offset and
    /// converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, DocgovError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            DocgovError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, DocgovError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| {
                DocgovError::InvalidTimestamp(format!("invalid Unix timestamp: {secs}"))
            })?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Add whole calendar years, keeping month, day, and time of day.
    ///
    /// 29 February maps to 1 March when the target year has no leap day.
    pub fn add_calendar_years(&self, years: u32) -> Result<Self, DocgovError> {
        let overflow =
            || DocgovError::InvalidTimestamp(format!("{self} + {years} years overflows"));
        let date = self.0.date_naive();
        let years = i32::try_from(years).map_err(|_| overflow())?;
        let target_year = date.year().checked_add(years).ok_or_else(overflow)?;
        let target = NaiveDate::from_ymd_opt(target_year, date.month(), date.day())
            .or_else(|| NaiveDate::from_ymd_opt(target_year, 3, 1))
            .ok_or_else(overflow)?;
        Ok(Self(target.and_time(self.0.time()).and_utc()))
    }

    /// Add a number of hours.
    pub fn add_hours(&self, hours: u32) -> Result<Self, DocgovError> {
        self.0
            .checked_add_signed(Duration::hours(i64::from(hours)))
            .map(Self)
            .ok_or_else(|| DocgovError::InvalidTimestamp(format!("{self} + {hours}h overflows")))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
