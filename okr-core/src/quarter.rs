//! Calendar quarters and whole-day date windows.
//!
//! A date range `[start, end]` always covers whole days: it opens at
//! `start 00:00` and closes at the end of `end`, i.e. at `end + 1 day, 00:00`
//! (exclusive).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::QuarterParseError;

const SECONDS_PER_DAY: f64 = 86_400.0;

static QUARTER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*Q(?P<q>[1-4])\s+(?P<year>-?\d{1,6})\s*$").expect("valid quarter regex")
});

/// A fixed three-month calendar quarter (Q1 = Jan-Mar, ...).
///
/// Ordering is chronological. Serialized as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Quarter {
    year: i32,
    number: u32,
}

impl Quarter {
    /// `number` is 1-based. Returns `None` outside 1..=4 or outside chrono's year range.
    pub fn new(year: i32, number: u32) -> Option<Self> {
        if !(1..=4).contains(&number) {
            return None;
        }
        if year < NaiveDate::MIN.year() || year > NaiveDate::MAX.year() {
            return None;
        }
        Some(Self { year, number })
    }

    /// The quarter containing `date`: `floor(month0 / 3) + 1`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: date.month0() / 3 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// First calendar day of the quarter.
    pub fn start_date(&self) -> NaiveDate {
        ymd(self.year, (self.number - 1) * 3 + 1, 1)
    }

    /// Last calendar day of the quarter.
    pub fn end_date(&self) -> NaiveDate {
        match self.number {
            4 => ymd(self.year, 12, 31),
            _ => ymd(self.year, self.number * 3 + 1, 1) - TimeDelta::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// The following quarter, or `None` past the last year chrono can represent.
    pub fn next(&self) -> Option<Self> {
        if self.number == 4 {
            Quarter::new(self.year.checked_add(1)?, 1)
        } else {
            Quarter::new(self.year, self.number + 1)
        }
    }

    /// Human-readable label, e.g. `"Q1 2025"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.number, self.year)
    }
}

impl FromStr for Quarter {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || QuarterParseError(s.to_string());
        let caps = QUARTER_LABEL.captures(s).ok_or_else(err)?;
        let number: u32 = caps["q"].parse().map_err(|_| err())?;
        let year: i32 = caps["year"].parse().map_err(|_| err())?;
        Quarter::new(year, number).ok_or_else(err)
    }
}

impl From<Quarter> for String {
    fn from(q: Quarter) -> Self {
        q.label()
    }
}

impl TryFrom<String> for Quarter {
    type Error = QuarterParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The quarter containing `now`.
pub fn current_quarter(now: NaiveDateTime) -> Quarter {
    Quarter::from_date(now.date())
}

/// The quarter after the one containing `now` (Q4 rolls into Q1 of next year).
pub fn next_quarter(now: NaiveDateTime) -> Option<Quarter> {
    current_quarter(now).next()
}

/// `date 00:00`.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `date + 1 day, 00:00`: the exclusive end of a window that ends on `date`.
///
/// Saturates at `NaiveDateTime::MAX` for the last representable day.
pub fn day_end_exclusive(date: NaiveDate) -> NaiveDateTime {
    day_start(date)
        .checked_add_signed(TimeDelta::days(1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Whether `date` lies within `[start, end]` (inclusive on both ends).
pub fn is_in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// Whole days left until the end of `end_date`, rounded up.
///
/// Any instant on `end_date` itself still has `1` day left; from the following
/// midnight the value is `0` and then goes negative.
pub fn days_remaining(end_date: NaiveDate, now: NaiveDateTime) -> i64 {
    let seconds = (day_end_exclusive(end_date) - now).num_seconds() as f64;
    (seconds / SECONDS_PER_DAY).ceil() as i64
}

// Quarter construction keeps `year` inside chrono's range, where every month
// has a first day and December has a 31st.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("quarter bounds are valid dates")
}
