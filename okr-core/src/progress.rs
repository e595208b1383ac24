//! Progress arithmetic: key result -> objective -> time bucket.
//!
//! Everything here is plain arithmetic over borrowed data. Callers decide what
//! to do with a degenerate key result; the aggregate means never see `NaN`.

use crate::error::ProgressError;

/// `current / target * 100`.
///
/// Over-achievement is kept (`150.0` is a valid answer). A target that is zero,
/// negative or not finite is reported instead of producing `inf`/`NaN`.
pub fn key_result_progress(current_value: f64, target_value: f64) -> Result<f64, ProgressError> {
    if !target_value.is_finite() {
        return Err(ProgressError::NonFiniteTarget);
    }
    if target_value <= 0.0 {
        return Err(ProgressError::NonPositiveTarget {
            target: target_value,
        });
    }
    if !current_value.is_finite() {
        return Err(ProgressError::NonFiniteCurrent);
    }
    Ok(current_value / target_value * 100.0)
}

/// Arithmetic mean of `selector(item)`; `0.0` for an empty slice.
pub fn mean_progress<T>(items: &[T], selector: impl Fn(&T) -> f64) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let total: f64 = items.iter().map(selector).sum();
    total / items.len() as f64
}

/// Presentation band for a percentage, used by progress bars and calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgressBand {
    Low,
    Fair,
    Good,
    High,
}

impl ProgressBand {
    pub fn of(progress: f64) -> Self {
        if progress >= 80.0 {
            ProgressBand::High
        } else if progress >= 50.0 {
            ProgressBand::Good
        } else if progress >= 20.0 {
            ProgressBand::Fair
        } else {
            ProgressBand::Low
        }
    }
}
