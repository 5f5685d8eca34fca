//! Rolling observation window computation
//!
//! The NeoWs feed is queried over a fixed 7-day window anchored at the current
//! date. Everything here is pure date arithmetic on the Gregorian calendar;
//! the window is recomputed on every call so it silently advances as real
//! time passes.

use chrono::{Days, Local, NaiveDate};

/// Number of consecutive days covered by one feed window
pub const WINDOW_DAYS: u64 = 7;

/// Date format used for feed query parameters and bucket keys
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// An inclusive 7-day date range `[start, start + 6]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    /// First day of the window (the anchor date)
    pub start: NaiveDate,
    /// Last day of the window, always `start + 6` days
    pub end: NaiveDate,
}

impl ObservationWindow {
    /// Returns the window anchored at today's local date
    pub fn current() -> Self {
        Self::starting(Local::now().date_naive())
    }

    /// Returns the window anchored at the given date
    ///
    /// # Arguments
    /// * `start` - The first day of the window
    pub fn starting(start: NaiveDate) -> Self {
        // NaiveDate covers +/- ~262,000 years, so adding 6 days cannot
        // overflow for any date produced by a real clock.
        let end = start
            .checked_add_days(Days::new(WINDOW_DAYS - 1))
            .unwrap_or(start);
        Self { start, end }
    }

    /// Returns the 7 consecutive dates of the window in ascending order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take(WINDOW_DAYS as usize)
            .collect()
    }

    /// Returns the window's dates formatted as `YYYY-MM-DD` bucket keys
    pub fn day_keys(&self) -> Vec<String> {
        self.days()
            .iter()
            .map(|day| day.format(DATE_KEY_FORMAT).to_string())
            .collect()
    }

    /// Returns true if the given date falls inside the window (inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Returns the local date one day before today
///
/// Used by the maintenance sweep that prunes records older than yesterday.
pub fn yesterday() -> NaiveDate {
    yesterday_of(Local::now().date_naive())
}

/// Returns the date one day before the given date
pub fn yesterday_of(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
