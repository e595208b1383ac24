//! Error types for the computation core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a key result's progress could not be computed from its raw values.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProgressError {
    #[error("target value must be positive, got {target}")]
    NonPositiveTarget { target: f64 },
    #[error("target value is not a finite number")]
    NonFiniteTarget,
    #[error("current value is not a finite number")]
    NonFiniteCurrent,
}

/// A quarter label that is not of the form `Q<1-4> <year>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quarter label: {0:?} (expected e.g. \"Q1 2025\")")]
pub struct QuarterParseError(pub String);
