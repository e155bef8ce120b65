//! Time Provider Trait and Implementations
//!
//! Every date rule asks a provider for "today" instead of reading the clock,
//! so tests can pin the calendar day.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Source of the current instant
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get current time in a specific timezone
    fn now_in_timezone(&self, timezone: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&timezone)
    }

    /// Calendar date in the given timezone, time of day discarded
    fn today_in(&self, timezone: Tz) -> NaiveDate {
        self.now_in_timezone(timezone).date_naive()
    }
}

/// System time provider for production use
#[derive(Debug, Clone, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl MockTimeProvider {
    /// Create a new mock time provider starting from the given time
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(std::sync::Mutex::new(start_time)),
        }
    }

    /// Create a mock time provider at noon UTC of the given date
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default()))
    }

    /// Create a mock time provider at a UTC date/time; `None` if it does not exist
    pub fn new_from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::new)
    }

    /// Advance the mock time by the specified duration
    pub fn advance(&self, duration: chrono::Duration) {
        if let Ok(mut time) = self.current_time.lock() {
            *time += duration;
        }
    }

    /// Advance the mock time by the specified number of days
    pub fn advance_days(&self, days: i64) {
        self.advance(chrono::Duration::days(days));
    }

    /// Get the current mock time
    pub fn current_time(&self) -> DateTime<Utc> {
        if let Ok(time) = self.current_time.lock() {
            *time
        } else {
            Utc::now()
        }
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        self.current_time()
    }
}
