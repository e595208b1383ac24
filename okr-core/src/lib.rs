//! okr-core: objectives, key results, and the quarter grouping / status / progress rules
//!
//! Pure and synchronous: callers hand in records and an explicit `now`, and get
//! freshly computed values back. No I/O, no clock reads, no shared state.

pub mod error;
pub mod filters;
pub mod grouping;
pub mod objective;
pub mod progress;
pub mod quarter;
pub mod status;
pub mod summary;

pub use error::{ProgressError, QuarterParseError};
pub use filters::{categories_in_use, filter_by_category, filter_groups, TimeFilter, DEFAULT_CATEGORIES};
pub use grouping::{group_by_quarter, group_objectives, TimeGroup, TimePeriod};
pub use objective::{recompute_all, KeyResult, Milestone, Objective, ProgressWarning};
pub use progress::{key_result_progress, mean_progress, ProgressBand};
pub use quarter::{current_quarter, days_remaining, next_quarter, Quarter};
pub use status::{
    date_range_status, expected_progress, key_result_status, milestone_status, objective_status,
    MilestoneStatus, Status, TemporalStatus,
};
pub use summary::{active_on, progress_by_category, status_distribution, CategoryProgress};
