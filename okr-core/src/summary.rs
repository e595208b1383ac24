//! Dashboard rollups over a flat objective list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::objective::Objective;
use crate::progress::mean_progress;
use crate::status::Status;

/// Mean objective progress within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: String,
    pub progress: f64,
    pub count: usize,
}

/// Per-category mean progress, categories in first-seen order.
pub fn progress_by_category(objectives: &[Objective]) -> Vec<CategoryProgress> {
    let mut buckets: Vec<(String, Vec<&Objective>)> = Vec::new();
    for obj in objectives {
        match buckets.iter_mut().find(|(c, _)| *c == obj.category) {
            Some((_, members)) => members.push(obj),
            None => buckets.push((obj.category.clone(), vec![obj])),
        }
    }

    buckets
        .into_iter()
        .map(|(category, members)| CategoryProgress {
            progress: mean_progress(&members, |o| o.progress),
            count: members.len(),
            category,
        })
        .collect()
}

/// Objective counts per status, in [`Status::ALL`] order, zero counts omitted.
pub fn status_distribution(objectives: &[Objective]) -> Vec<(Status, usize)> {
    Status::ALL
        .iter()
        .map(|s| (*s, objectives.iter().filter(|o| o.status == *s).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Objectives whose window covers `date`.
pub fn active_on(objectives: &[Objective], date: NaiveDate) -> Vec<&Objective> {
    objectives.iter().filter(|o| o.is_active_on(date)).collect()
}
