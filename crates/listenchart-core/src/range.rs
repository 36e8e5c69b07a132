//! Calendar ranges for the chart.
//!
//! A chart covers every day from a configured start date through "today",
//! inclusive. Each day is addressed two ways: the storage key (`YYYY-MM-DD`)
//! used against the store, and the display label (`DD-MM-YYYY`) sent to the
//! front end.

use chrono::{NaiveDate, Utc};

const STORAGE_KEY_FMT: &str = "%Y-%m-%d";
const DISPLAY_LABEL_FMT: &str = "%d-%m-%Y";

/// Source of the current calendar day (UTC).
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Inclusive range of calendar days. Cheap to copy; iterate as often as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range from `start` through the clock's current day. The clock is read once.
    pub fn through_today(start: NaiveDate, clock: &dyn Clock) -> Self {
        Self::new(start, clock.today())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range (0 when start is after end).
    pub fn len(&self) -> usize {
        let days = self.end.signed_duration_since(self.start).num_days();
        if days < 0 {
            0
        } else {
            days as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn iter(&self) -> Days {
        Days {
            next: (!self.is_empty()).then_some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Lazy day-by-day iterator over a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let cur = self.next?;
        // succ_opt is None only at NaiveDate::MAX, which also ends the range.
        self.next = cur.succ_opt().filter(|d| *d <= self.end);
        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self.next {
            Some(d) => DateRange::new(d, self.end).len(),
            None => 0,
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Days {}

/// Key under which a day's blob is stored.
pub fn storage_key(date: NaiveDate) -> String {
    date.format(STORAGE_KEY_FMT).to_string()
}

/// Label shown on the chart's x axis.
pub fn display_label(date: NaiveDate) -> String {
    date.format(DISPLAY_LABEL_FMT).to_string()
}

/// Parse a `YYYY-MM-DD` date (config values, storage keys).
pub fn parse_storage_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), STORAGE_KEY_FMT).ok()
}
