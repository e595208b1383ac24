//! Lifecycle and temporal status classification.
//!
//! `now` is always an argument; nothing in here reads the wall clock.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::objective::{KeyResult, Milestone};
use crate::quarter::{day_end_exclusive, day_start};

/// Percentage points a key result may trail the elapsed-time expectation
/// before it counts as at risk.
pub const AT_RISK_MARGIN: f64 = 20.0;

/// Objectives below this progress (and above zero) are at risk.
pub const OBJECTIVE_AT_RISK_BELOW: f64 = 30.0;

/// Lifecycle label shared by objectives and key results.
///
/// Only key results are ever classified `Overdue`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    AtRisk,
    Overdue,
    Completed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::NotStarted,
        Status::InProgress,
        Status::AtRisk,
        Status::Overdue,
        Status::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::AtRisk => "at-risk",
            Status::Overdue => "overdue",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a date range sits relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalStatus {
    Past,
    Current,
    Future,
}

impl TemporalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalStatus::Past => "past",
            TemporalStatus::Current => "current",
            TemporalStatus::Future => "future",
        }
    }
}

impl fmt::Display for TemporalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    Upcoming,
    Achieved,
    Missed,
}

/// `future` before the first day starts, `past` once the last day has ended,
/// `current` otherwise (both boundary days included).
pub fn date_range_status(start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> TemporalStatus {
    if now < day_start(start) {
        TemporalStatus::Future
    } else if now >= day_end_exclusive(end) {
        TemporalStatus::Past
    } else {
        TemporalStatus::Current
    }
}

/// Share of the `[start, end]` window that has elapsed at `now`, as a percentage.
///
/// Not clamped: negative before the window opens, above 100 after it closes.
/// A window with `end <= start` is treated as fully elapsed once `now` reaches
/// `start` (100) and not started before (0).
pub fn expected_progress(start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> f64 {
    let opens = day_start(start);
    if end <= start {
        return if now >= opens { 100.0 } else { 0.0 };
    }
    let total = (day_end_exclusive(end) - opens).num_milliseconds() as f64;
    let elapsed = (now - opens).num_milliseconds() as f64;
    elapsed / total * 100.0
}

/// Key result status; the first matching rule wins:
///
/// 1. `current >= target` -> completed (even when past the end date)
/// 2. `progress >= 100` -> completed
/// 3. past the end date -> overdue
/// 4. `progress == 0` -> not started
/// 5. trailing the elapsed-time expectation by more than [`AT_RISK_MARGIN`] -> at risk
/// 6. otherwise in progress
pub fn key_result_status(kr: &KeyResult, now: NaiveDateTime) -> Status {
    if kr.current_value >= kr.target_value {
        return Status::Completed;
    }
    if kr.progress >= 100.0 {
        return Status::Completed;
    }
    if now >= day_end_exclusive(kr.end_date) {
        return Status::Overdue;
    }
    if kr.progress == 0.0 {
        return Status::NotStarted;
    }
    let expected = expected_progress(kr.start_date, kr.end_date, now);
    if kr.progress < expected - AT_RISK_MARGIN {
        return Status::AtRisk;
    }
    Status::InProgress
}

/// Objective status from its own progress only; never `Overdue`.
pub fn objective_status(progress: f64) -> Status {
    if progress == 0.0 {
        Status::NotStarted
    } else if progress >= 100.0 {
        Status::Completed
    } else if progress < OBJECTIVE_AT_RISK_BELOW {
        Status::AtRisk
    } else {
        Status::InProgress
    }
}

pub fn milestone_status(milestone: &Milestone, current_value: f64, now: NaiveDateTime) -> MilestoneStatus {
    if now < day_start(milestone.date) {
        MilestoneStatus::Upcoming
    } else if current_value >= milestone.target_value {
        MilestoneStatus::Achieved
    } else {
        MilestoneStatus::Missed
    }
}
