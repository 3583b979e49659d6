//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Whole seconds from `earlier` to this timestamp, clamped at zero.
    pub fn secs_since(&self, earlier: &Timestamp) -> u64 {
        self.0.signed_duration_since(earlier.0).num_seconds().max(0) as u64
    }

    /// Creates a timestamp from Unix seconds.
    pub fn from_unix_secs(secs: u64) -> Self {
        Self(Utc.timestamp_opt(secs as i64, 0).single().unwrap_or_default())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> u64 {
        self.0.timestamp().max(0) as u64
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Saturates at the latest representable instant.
    pub fn plus_secs(&self, secs: u64) -> Self {
        let shifted = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|offset| self.0.checked_add_signed(offset));
        Self(shifted.unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Calendar date in `M/D/YYYY` form, as shown on generated memos.
    pub fn short_date(&self) -> String {
        self.0.format("%-m/%-d/%Y").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_ordering_follows_unix_secs() {
        let ts1 = Timestamp::from_unix_secs(1_000);
        let ts2 = Timestamp::from_unix_secs(1_001);

        assert!(ts1.is_before(&ts2));
        assert!(ts2.is_after(&ts1));
        assert!(ts1 < ts2);
    }

    #[test]
    fn timestamp_from_unix_secs_works() {
        // 2024-01-15T00:00:00Z
        let ts = Timestamp::from_unix_secs(1705276800);
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().month(), 1);
        assert_eq!(ts.as_datetime().day(), 15);
    }

    #[test]
    fn timestamp_as_unix_secs_roundtrips() {
        let unix_secs = 1705276800_u64;
        let ts = Timestamp::from_unix_secs(unix_secs);
        assert_eq!(ts.as_unix_secs(), unix_secs);
    }

    #[test]
    fn timestamp_plus_secs_adds_correctly() {
        let ts1 = Timestamp::from_unix_secs(1000);
        let ts2 = ts1.plus_secs(60);
        assert_eq!(ts2.as_unix_secs(), 1060);
    }

    #[test]
    fn timestamp_plus_secs_saturates_on_overflow() {
        let ts = Timestamp::from_unix_secs(1705276800);

        let far = ts.plus_secs(10_000_000_000_000_000);
        assert_eq!(far.as_datetime(), &DateTime::<Utc>::MAX_UTC);
        assert!(ts.is_before(&far));

        assert_eq!(ts.plus_secs(u64::MAX).as_datetime(), &DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn secs_since_clamps_negative_spans() {
        let early = Timestamp::from_unix_secs(100);
        let late = Timestamp::from_unix_secs(160);

        assert_eq!(late.secs_since(&early), 60);
        assert_eq!(early.secs_since(&late), 0);
    }

    #[test]
    fn short_date_has_no_zero_padding() {
        let ts = Timestamp::from_unix_secs(1705276800);
        assert_eq!(ts.short_date(), "1/15/2024");
    }
}
