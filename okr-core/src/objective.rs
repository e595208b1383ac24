//! Objective / key result records.
//!
//! `progress` and `status` on both records are derived fields. They are kept on
//! the struct so groups can be rendered directly, and refreshed through
//! [`KeyResult::recompute`] / [`Objective::recompute`] whenever inputs change.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::progress::{key_result_progress, mean_progress};
use crate::quarter::{days_remaining, is_in_range};
use crate::status::{
    date_range_status, key_result_status, milestone_status, objective_status, MilestoneStatus,
    Status, TemporalStatus,
};

/// An intermediate checkpoint on a key result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub date: NaiveDate,
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A measurable sub-target owned by exactly one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: String,
    pub description: String,

    /// Quantity that represents 100%.
    pub target_value: f64,
    /// Latest measurement; may exceed the target.
    pub current_value: f64,
    pub unit: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: Status,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<Milestone>,
}

impl KeyResult {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        target_value: f64,
        unit: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            target_value,
            current_value: 0.0,
            unit: unit.into(),
            start_date,
            end_date,
            progress: 0.0,
            status: Status::NotStarted,
            milestones: Vec::new(),
        }
    }

    /// Sets the raw measurement without recomputing derived fields.
    pub fn with_current_value(mut self, current_value: f64) -> Self {
        self.current_value = current_value;
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    /// Refresh `progress` and `status` from the raw values.
    ///
    /// A degenerate target leaves `progress` at `0.0` (status is still
    /// classified) and hands the reason back to the caller.
    pub fn recompute(&mut self, now: NaiveDateTime) -> Result<(), ProgressError> {
        let outcome = key_result_progress(self.current_value, self.target_value);
        self.progress = *outcome.as_ref().unwrap_or(&0.0);
        self.status = key_result_status(self, now);
        outcome.map(|_| ())
    }

    /// Record a new measurement and refresh the derived fields.
    pub fn set_current_value(&mut self, current_value: f64, now: NaiveDateTime) -> Result<(), ProgressError> {
        self.current_value = current_value;
        self.recompute(now)
    }

    pub fn milestone_statuses(&self, now: NaiveDateTime) -> Vec<(&Milestone, MilestoneStatus)> {
        self.milestones
            .iter()
            .map(|m| (m, milestone_status(m, self.current_value, now)))
            .collect()
    }

    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        days_remaining(self.end_date, now)
    }
}

/// A key result whose progress had to be clamped to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressWarning {
    pub objective_id: String,
    pub key_result_id: String,
    pub error: ProgressError,
}

impl fmt::Display for ProgressWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "objective {} / key result {}: {} (progress set to 0)",
            self.objective_id, self.key_result_id, self.error
        )
    }
}

/// Top-level goal; the aggregate root for its key results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Loose tag used for filtering.
    pub category: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub key_results: Vec<KeyResult>,

    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: Status,
}

impl Objective {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            start_date,
            end_date,
            key_results: Vec::new(),
            progress: 0.0,
            status: Status::NotStarted,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_key_result(mut self, key_result: KeyResult) -> Self {
        self.key_results.push(key_result);
        self
    }

    /// Sets a precomputed progress (and the status it implies) without touching
    /// key results. Useful when records arrive already aggregated.
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self.status = objective_status(progress);
        self
    }

    /// Recompute every key result, then this objective's mean progress and status.
    ///
    /// Never fails: malformed key results count as `0` and are reported.
    pub fn recompute(&mut self, now: NaiveDateTime) -> Vec<ProgressWarning> {
        let mut warnings = Vec::new();
        for kr in &mut self.key_results {
            if let Err(error) = kr.recompute(now) {
                tracing::warn!(
                    objective_id = %self.id,
                    key_result_id = %kr.id,
                    %error,
                    "key result progress clamped to 0"
                );
                warnings.push(ProgressWarning {
                    objective_id: self.id.clone(),
                    key_result_id: kr.id.clone(),
                    error,
                });
            }
        }
        self.progress = mean_progress(&self.key_results, |kr| kr.progress);
        self.status = objective_status(self.progress);
        warnings
    }

    /// Record a measurement on one key result and refresh the objective.
    ///
    /// Returns `None` if no key result has that id.
    pub fn update_key_result(
        &mut self,
        key_result_id: &str,
        current_value: f64,
        now: NaiveDateTime,
    ) -> Option<Vec<ProgressWarning>> {
        let kr = self.key_results.iter_mut().find(|kr| kr.id == key_result_id)?;
        kr.current_value = current_value;
        Some(self.recompute(now))
    }

    /// Whether the objective's window covers `date` (calendar view).
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        is_in_range(date, self.start_date, self.end_date)
    }

    pub fn temporal_status(&self, now: NaiveDateTime) -> TemporalStatus {
        date_range_status(self.start_date, self.end_date, now)
    }

    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        days_remaining(self.end_date, now)
    }
}

/// Recompute a whole collection in place, gathering every warning.
pub fn recompute_all(objectives: &mut [Objective], now: NaiveDateTime) -> Vec<ProgressWarning> {
    objectives
        .iter_mut()
        .flat_map(|obj| obj.recompute(now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_single_key_result_objective() {
        let start = date(2025, 2, 10);
        let end = date(2025, 2, 20);
        let mut obj = Objective::new("o1", "Grow newsletter", "career", start, end).with_key_result(
            KeyResult::new("kr1", "Subscribers", 100.0, "people", start, end).with_current_value(50.0),
        );

        let warnings = obj.recompute(noon(2025, 2, 15));
        assert!(warnings.is_empty());
        assert_eq!(obj.key_results[0].progress, 50.0);
        assert_eq!(obj.progress, 50.0);
        assert_eq!(obj.status, Status::InProgress);
    }

    #[test]
    fn test_objective_without_key_results_has_zero_progress() {
        let mut obj = Objective::new("o1", "Empty", "health", date(2025, 1, 1), date(2025, 3, 31));
        let warnings = obj.recompute(noon(2025, 2, 1));
        assert!(warnings.is_empty());
        assert_eq!(obj.progress, 0.0);
        assert!(!obj.progress.is_nan());
        assert_eq!(obj.status, Status::NotStarted);
    }

    #[test]
    fn test_zero_target_does_not_poison_mean() {
        let start = date(2025, 1, 1);
        let end = date(2025, 3, 31);
        let mut obj = Objective::new("o1", "Ship", "career", start, end)
            .with_key_result(KeyResult::new("bad", "Broken", 0.0, "x", start, end).with_current_value(10.0))
            .with_key_result(KeyResult::new("good", "Working", 10.0, "x", start, end).with_current_value(8.0));

        let warnings = obj.recompute(noon(2025, 2, 1));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key_result_id, "bad");
        assert_eq!(
            warnings[0].error,
            ProgressError::NonPositiveTarget { target: 0.0 }
        );
        assert_eq!(obj.key_results[0].progress, 0.0);
        assert_eq!(obj.progress, 40.0);
        assert!(obj.progress.is_finite());
    }

    #[test]
    fn test_objective_progress_is_unweighted_mean() {
        let start = date(2025, 4, 1);
        let end = date(2025, 6, 30);
        let mut obj = Objective::new("o1", "Fitness", "health", start, end)
            .with_key_result(KeyResult::new("a", "Runs", 1000.0, "km", start, end).with_current_value(100.0))
            .with_key_result(KeyResult::new("b", "Classes", 4.0, "classes", start, end).with_current_value(2.0));

        obj.recompute(noon(2025, 5, 1));
        assert_eq!(obj.progress, 30.0);
        assert_eq!(obj.status, Status::InProgress);
    }

    #[test]
    fn test_update_key_result_recomputes() {
        let start = date(2025, 1, 1);
        let end = date(2025, 12, 31);
        let mut obj = Objective::new("o1", "Read", "learning", start, end)
            .with_key_result(KeyResult::new("kr1", "Books", 12.0, "books", start, end));

        obj.recompute(noon(2025, 1, 2));
        assert_eq!(obj.status, Status::NotStarted);

        let warnings = obj.update_key_result("kr1", 12.0, noon(2025, 6, 1)).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(obj.key_results[0].status, Status::Completed);
        assert_eq!(obj.progress, 100.0);
        assert_eq!(obj.status, Status::Completed);

        assert!(obj.update_key_result("missing", 1.0, noon(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_set_current_value_reports_degenerate_target() {
        let mut kr = KeyResult::new("kr1", "Broken", -5.0, "x", date(2025, 1, 1), date(2025, 1, 31));
        let err = kr.set_current_value(3.0, noon(2025, 1, 10)).unwrap_err();
        assert!(matches!(err, ProgressError::NonPositiveTarget { .. }));
        assert_eq!(kr.progress, 0.0);
    }

    #[test]
    fn test_milestone_statuses() {
        let kr = KeyResult::new("kr1", "Revenue", 100.0, "k$", date(2025, 1, 1), date(2025, 12, 31))
            .with_current_value(30.0)
            .with_milestone(Milestone {
                date: date(2025, 3, 31),
                target_value: 25.0,
                description: Some("Q1 checkpoint".to_string()),
            })
            .with_milestone(Milestone {
                date: date(2025, 6, 30),
                target_value: 50.0,
                description: None,
            });

        let statuses: Vec<_> = kr
            .milestone_statuses(noon(2025, 5, 1))
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(statuses, vec![MilestoneStatus::Achieved, MilestoneStatus::Upcoming]);
    }

    #[test]
    fn test_is_active_on_includes_bounds() {
        let obj = Objective::new("o1", "Trip", "personal", date(2025, 7, 1), date(2025, 7, 10));
        assert!(obj.is_active_on(date(2025, 7, 1)));
        assert!(obj.is_active_on(date(2025, 7, 10)));
        assert!(!obj.is_active_on(date(2025, 7, 11)));
    }

    #[test]
    fn test_recompute_all_collects_warnings() {
        let start = date(2025, 1, 1);
        let end = date(2025, 1, 31);
        let mut objectives = vec![
            Objective::new("o1", "A", "x", start, end)
                .with_key_result(KeyResult::new("k1", "bad", 0.0, "x", start, end)),
            Objective::new("o2", "B", "x", start, end)
                .with_key_result(KeyResult::new("k2", "bad", f64::NAN, "x", start, end)),
        ];
        let warnings = recompute_all(&mut objectives, noon(2025, 1, 15));
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].error, ProgressError::NonFiniteTarget);
    }
}
