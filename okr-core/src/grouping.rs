//! Quarter bucketing of objectives.
//!
//! Algorithm (deterministic):
//! 1) key each objective by the calendar quarter of its start date
//! 2) collect objectives per key, first-seen order of distinct keys
//! 3) build one group per key: label, quarter bounds, mean progress, temporal status
//! 4) sort groups ascending by start date
//!
//! An objective spanning several quarters lands only in its start quarter, and
//! the group's dates are that quarter's bounds, not the objectives' own dates.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::objective::Objective;
use crate::progress::mean_progress;
use crate::quarter::{current_quarter, next_quarter, Quarter};
use crate::status::{date_range_status, TemporalStatus};

/// One calendar quarter's worth of objectives, computed fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGroup {
    /// e.g. `"Q1 2025"`
    pub label: String,
    pub quarter: Quarter,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub objectives: Vec<Objective>,
    /// Mean of the objectives' progress.
    pub progress: f64,
    pub status: TemporalStatus,
}

impl TimeGroup {
    fn build(quarter: Quarter, objectives: Vec<Objective>, now: NaiveDateTime) -> Self {
        let start_date = quarter.start_date();
        let end_date = quarter.end_date();
        let progress = mean_progress(&objectives, |obj| obj.progress);
        let status = date_range_status(start_date, end_date, now);
        tracing::debug!(
            label = %quarter,
            objectives = objectives.len(),
            progress,
            %status,
            "built time group"
        );
        Self {
            label: quarter.label(),
            quarter,
            start_date,
            end_date,
            objectives,
            progress,
            status,
        }
    }
}

/// Which quarters a grouping pass should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimePeriod {
    #[default]
    All,
    CurrentQuarter,
    NextQuarter,
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimePeriod::All),
            "current-quarter" | "current" => Ok(TimePeriod::CurrentQuarter),
            "next-quarter" | "next" => Ok(TimePeriod::NextQuarter),
            other => Err(format!("unknown time period: {other}")),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimePeriod::All => "all",
            TimePeriod::CurrentQuarter => "current-quarter",
            TimePeriod::NextQuarter => "next-quarter",
        })
    }
}

/// Partition `objectives` into quarter groups ordered by start date.
///
/// Every objective appears in exactly one group; empty quarters produce no group.
pub fn group_by_quarter(objectives: &[Objective], now: NaiveDateTime) -> Vec<TimeGroup> {
    let mut index: HashMap<Quarter, usize> = HashMap::new();
    let mut buckets: Vec<(Quarter, Vec<Objective>)> = Vec::new();

    for obj in objectives {
        let quarter = Quarter::from_date(obj.start_date);
        let slot = *index.entry(quarter).or_insert_with(|| {
            buckets.push((quarter, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(obj.clone());
    }

    let mut groups: Vec<TimeGroup> = buckets
        .into_iter()
        .map(|(quarter, objs)| TimeGroup::build(quarter, objs, now))
        .collect();

    groups.sort_by_key(|g| g.start_date);
    groups
}

/// Group objectives restricted to a [`TimePeriod`].
///
/// `CurrentQuarter` / `NextQuarter` keep only objectives starting inside that
/// quarter (relative to `now`), so at most one group comes back. There is no
/// next quarter after the last year chrono represents, so that yields nothing.
pub fn group_objectives(objectives: &[Objective], period: TimePeriod, now: NaiveDateTime) -> Vec<TimeGroup> {
    let window = match period {
        TimePeriod::All => return group_by_quarter(objectives, now),
        TimePeriod::CurrentQuarter => current_quarter(now),
        TimePeriod::NextQuarter => match next_quarter(now) {
            Some(q) => q,
            None => return Vec::new(),
        },
    };

    let selected: Vec<Objective> = objectives
        .iter()
        .filter(|obj| window.contains(obj.start_date))
        .cloned()
        .collect();

    group_by_quarter(&selected, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn obj(id: &str, start: NaiveDate, end: NaiveDate, progress: f64) -> Objective {
        Objective::new(id, id, "career", start, end).with_progress(progress)
    }

    #[test]
    fn test_empty_input_gives_no_groups() {
        assert!(group_by_quarter(&[], noon(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_same_quarter_is_merged() {
        let objectives = vec![
            obj("a", date(2025, 1, 15), date(2025, 2, 15), 40.0),
            obj("b", date(2025, 3, 20), date(2025, 6, 1), 60.0),
        ];
        let groups = group_by_quarter(&objectives, noon(2025, 2, 1));

        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.label, "Q1 2025");
        assert_eq!(g.start_date, date(2025, 1, 1));
        assert_eq!(g.end_date, date(2025, 3, 31));
        assert_eq!(g.progress, 50.0);
        assert_eq!(g.status, TemporalStatus::Current);
        assert_eq!(g.objectives.len(), 2);
    }

    #[test]
    fn test_groups_sorted_by_start_not_insertion() {
        let objectives = vec![
            obj("late", date(2026, 5, 1), date(2026, 5, 30), 0.0),
            obj("early", date(2024, 11, 2), date(2024, 12, 1), 100.0),
            obj("mid", date(2025, 8, 9), date(2025, 9, 9), 20.0),
            obj("early-2", date(2024, 10, 1), date(2024, 10, 2), 50.0),
        ];
        let groups = group_by_quarter(&objectives, noon(2025, 8, 1));

        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Q4 2024", "Q3 2025", "Q2 2026"]);

        let statuses: Vec<_> = groups.iter().map(|g| g.status).collect();
        assert_eq!(
            statuses,
            vec![TemporalStatus::Past, TemporalStatus::Current, TemporalStatus::Future]
        );

        // first-seen order is kept inside a group
        let ids: Vec<_> = groups[0].objectives.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "early-2"]);
        assert_eq!(groups[0].progress, 75.0);
    }

    #[test]
    fn test_multi_quarter_objective_uses_start_quarter_bounds() {
        let objectives = vec![obj("long", date(2025, 2, 1), date(2025, 9, 30), 10.0)];
        let groups = group_by_quarter(&objectives, noon(2025, 5, 1));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Q1 2025");
        assert_eq!(groups[0].end_date, date(2025, 3, 31));
        // the quarter is over even though the objective is still running
        assert_eq!(groups[0].status, TemporalStatus::Past);
    }

    #[test]
    fn test_same_quarter_different_years_not_merged() {
        let objectives = vec![
            obj("a", date(2024, 1, 5), date(2024, 1, 6), 10.0),
            obj("b", date(2025, 1, 5), date(2025, 1, 6), 30.0),
        ];
        let groups = group_by_quarter(&objectives, noon(2025, 1, 1));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Q1 2024");
        assert_eq!(groups[1].label, "Q1 2025");
    }

    #[test]
    fn test_current_quarter_period() {
        let objectives = vec![
            obj("past", date(2025, 1, 10), date(2025, 2, 1), 90.0),
            obj("now", date(2025, 4, 2), date(2025, 6, 1), 30.0),
            obj("next", date(2025, 7, 2), date(2025, 8, 1), 0.0),
        ];
        let now = noon(2025, 5, 15);

        let current = group_objectives(&objectives, TimePeriod::CurrentQuarter, now);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].label, "Q2 2025");
        assert_eq!(current[0].status, TemporalStatus::Current);
        assert_eq!(current[0].objectives[0].id, "now");

        let next = group_objectives(&objectives, TimePeriod::NextQuarter, now);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].label, "Q3 2025");
        assert_eq!(next[0].status, TemporalStatus::Future);

        let all = group_objectives(&objectives, TimePeriod::All, now);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_period_with_no_matches_is_empty() {
        let objectives = vec![obj("old", date(2023, 1, 10), date(2023, 2, 1), 90.0)];
        let groups = group_objectives(&objectives, TimePeriod::NextQuarter, noon(2025, 5, 15));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_next_period_in_last_representable_quarter_is_empty() {
        let last_q4 = NaiveDate::MAX.with_month(10).and_then(|d| d.with_day(1)).unwrap();
        let objectives = vec![obj("edge", last_q4, NaiveDate::MAX, 10.0)];
        let now = NaiveDate::MAX.and_hms_opt(12, 0, 0).unwrap();

        assert!(group_objectives(&objectives, TimePeriod::NextQuarter, now).is_empty());

        let current = group_objectives(&objectives, TimePeriod::CurrentQuarter, now);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].status, TemporalStatus::Current);
    }

    #[test]
    fn test_time_period_parse() {
        assert_eq!("current-quarter".parse::<TimePeriod>().unwrap(), TimePeriod::CurrentQuarter);
        assert_eq!("Next".parse::<TimePeriod>().unwrap(), TimePeriod::NextQuarter);
        assert!("yearly".parse::<TimePeriod>().is_err());
    }
}
