use serde::{Deserialize, Serialize};

/// Stored shape of a milestone (dates as strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRow {
    pub date: String,
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Stored shape of a key result, as the hosted store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResultRow {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub unit: String,
    /// `YYYY-MM-DD`, `MM/DD/YYYY` or an RFC 3339 timestamp.
    pub start_date: String,
    pub end_date: String,
    /// Snapshot only; recomputed on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<MilestoneRow>,
}

/// Stored shape of an objective with its key results denormalized in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRow {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub key_results: Vec<KeyResultRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
