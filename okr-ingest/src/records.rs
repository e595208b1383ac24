//! Row <-> core record conversion and the objectives JSON file.
//!
//! This is the only place date strings become `NaiveDate`s.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use okr_core::{KeyResult, Milestone, Objective};
use std::fs;
use std::path::Path;

use crate::types::{KeyResultRow, MilestoneRow, ObjectiveRow};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date: `YYYY-MM-DD`, `MM/DD/YYYY`, a naive `YYYY-MM-DDTHH:MM:SS`,
/// or an RFC 3339 timestamp (its calendar date, as written).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ndt.date());
    }
    bail!("invalid date '{s}' (expected YYYY-MM-DD)")
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

fn finite(value: f64, field: &str) -> Result<f64> {
    if !value.is_finite() {
        bail!("{field} is not a finite number");
    }
    Ok(value)
}

fn milestone_from_row(row: &MilestoneRow) -> Result<Milestone> {
    Ok(Milestone {
        date: parse_date(&row.date).context("milestone date")?,
        target_value: finite(row.target_value, "milestone target_value")?,
        description: row.description.clone(),
    })
}

pub fn key_result_from_row(row: &KeyResultRow) -> Result<KeyResult> {
    let start = parse_date(&row.start_date).context("start_date")?;
    let end = parse_date(&row.end_date).context("end_date")?;
    let milestones = row
        .milestones
        .iter()
        .map(milestone_from_row)
        .collect::<Result<Vec<_>>>()?;

    let mut kr = KeyResult::new(
        row.id.clone(),
        row.description.clone(),
        finite(row.target_value, "target_value")?,
        row.unit.clone(),
        start,
        end,
    )
    .with_current_value(finite(row.current_value, "current_value")?);
    kr.milestones = milestones;
    Ok(kr)
}

/// Convert a stored row. Stored `progress`/`status` are dropped; call
/// [`Objective::recompute`] before use.
pub fn objective_from_row(row: &ObjectiveRow) -> Result<Objective> {
    let start = parse_date(&row.start_date)
        .with_context(|| format!("objective '{}': start_date", row.title))?;
    let end = parse_date(&row.end_date)
        .with_context(|| format!("objective '{}': end_date", row.title))?;

    let mut obj = Objective::new(row.id.clone(), row.title.clone(), row.category.clone(), start, end)
        .with_description(row.description.clone());

    for (i, kr) in row.key_results.iter().enumerate() {
        let kr = key_result_from_row(kr)
            .with_context(|| format!("objective '{}': key result #{}", row.title, i + 1))?;
        obj = obj.with_key_result(kr);
    }
    Ok(obj)
}

pub fn objective_to_row(obj: &Objective) -> ObjectiveRow {
    ObjectiveRow {
        id: obj.id.clone(),
        title: obj.title.clone(),
        description: obj.description.clone(),
        category: obj.category.clone(),
        start_date: format_date(obj.start_date),
        end_date: format_date(obj.end_date),
        key_results: obj.key_results.iter().map(key_result_to_row).collect(),
        progress: Some(obj.progress),
        status: Some(obj.status.to_string()),
    }
}

fn key_result_to_row(kr: &KeyResult) -> KeyResultRow {
    KeyResultRow {
        id: kr.id.clone(),
        description: kr.description.clone(),
        target_value: kr.target_value,
        current_value: kr.current_value,
        unit: kr.unit.clone(),
        start_date: format_date(kr.start_date),
        end_date: format_date(kr.end_date),
        progress: Some(kr.progress),
        status: Some(kr.status.to_string()),
        milestones: kr
            .milestones
            .iter()
            .map(|m| MilestoneRow {
                date: format_date(m.date),
                target_value: m.target_value,
                description: m.description.clone(),
            })
            .collect(),
    }
}

/// Parse a JSON array of objective rows.
pub fn parse_objectives_json(json: &str) -> Result<Vec<Objective>> {
    let rows: Vec<ObjectiveRow> = serde_json::from_str(json).context("parse objectives JSON")?;
    rows.iter().map(objective_from_row).collect()
}

pub fn load_objectives_json(path: impl AsRef<Path>) -> Result<Vec<Objective>> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_objectives_json(&s).with_context(|| format!("load {}", path.display()))
}

pub fn write_objectives_json(path: impl AsRef<Path>, objectives: &[Objective]) -> Result<()> {
    let path = path.as_ref();
    let rows: Vec<ObjectiveRow> = objectives.iter().map(objective_to_row).collect();
    let json = serde_json::to_string_pretty(&rows).context("serialize objectives")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
