//! Category and time filters applied before/after grouping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grouping::TimeGroup;
use crate::objective::Objective;
use crate::status::TemporalStatus;

/// Categories offered to a new user.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "career",
    "health",
    "learning",
    "personal",
    "finance",
    "relationships",
];

/// Keep groups by temporal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFilter {
    #[default]
    All,
    Current,
    Past,
    Future,
}

impl TimeFilter {
    pub fn matches(&self, status: TemporalStatus) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::Current => status == TemporalStatus::Current,
            TimeFilter::Past => status == TemporalStatus::Past,
            TimeFilter::Future => status == TemporalStatus::Future,
        }
    }
}

impl FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "current" => Ok(TimeFilter::Current),
            "past" => Ok(TimeFilter::Past),
            "future" | "upcoming" => Ok(TimeFilter::Future),
            other => Err(format!("unknown time filter: {other}")),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeFilter::All => "all",
            TimeFilter::Current => "current",
            TimeFilter::Past => "past",
            TimeFilter::Future => "future",
        })
    }
}

pub fn filter_groups(groups: Vec<TimeGroup>, filter: TimeFilter) -> Vec<TimeGroup> {
    groups.into_iter().filter(|g| filter.matches(g.status)).collect()
}

/// Exact category match; `None` keeps everything.
pub fn filter_by_category(objectives: &[Objective], category: Option<&str>) -> Vec<Objective> {
    match category {
        None => objectives.to_vec(),
        Some(c) => objectives.iter().filter(|o| o.category == c).cloned().collect(),
    }
}

/// Distinct categories in first-seen order.
pub fn categories_in_use(objectives: &[Objective]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for obj in objectives {
        if !out.iter().any(|c| *c == obj.category) {
            out.push(obj.category.clone());
        }
    }
    out
}
