//! # Time Source
//!
//! The client needs the current time in two places: request identity
//! derivation (UTC, seconds precision) and the default start date for a
//! recurring profile (the caller's *local* calendar date). Both come from a
//! [`Clock`] so tests can pin them.

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, Timelike, Utc};

/// A source of the current instant and the caller's local date.
pub trait Clock: Send + Sync {
    /// The current instant, truncated to whole seconds.
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in the caller's local timezone.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_seconds(Utc::now())
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant.
///
/// Carries an offset so that [`Clock::today`] reflects the local date at
/// that offset, which may differ from the UTC date near midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// A fixed clock at a UTC instant.
    pub fn utc(at: DateTime<Utc>) -> Self {
        Self(at.fixed_offset())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_seconds(self.0.with_timezone(&Utc))
    }

    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

/// The default start date for a new recurring profile: tomorrow, local time.
///
/// The gateway rejects profiles starting today or earlier.
pub fn default_profile_start(clock: &impl Clock) -> NaiveDate {
    let today = clock.today();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn system_clock_has_no_subseconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn fixed_clock_truncates_subseconds() {
        let at = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 30, 45)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let clock = FixedClock::utc(at);
        assert_eq!(clock.now().nanosecond(), 0);
        assert_eq!(clock.now().timestamp(), at.timestamp());
    }

    #[test]
    fn fixed_clock_today_uses_its_offset() {
        // 23:30 in New York (UTC-5) is already the next day in UTC.
        let ny = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = ny.with_ymd_and_hms(2026, 3, 9, 23, 30, 0).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert_eq!(clock.now().date_naive(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn default_start_is_tomorrow() {
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2026, 12, 31, 9, 0, 0).unwrap());
        assert_eq!(
            default_profile_start(&clock),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
    }
}
