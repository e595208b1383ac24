//! Spreadsheet paste import (tab-separated).
//!
//! Layout, one record per row:
//!   Title         Description     Category   Start        End
//!   <empty>       KR description  Target     Unit
//!
//! A non-empty first cell starts an objective; a row with an empty first cell
//! and a non-empty second cell adds a key result to the objective above it.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use okr_core::{KeyResult, Objective};

use crate::records::parse_date;

/// Defaults for cells the sheet leaves empty.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Category for objectives with an empty category cell.
    pub default_category: String,
    /// Date used for empty start/end cells.
    pub today: NaiveDate,
}

fn cell(record: &csv::StringRecord, i: usize) -> &str {
    record.get(i).unwrap_or("").trim()
}

fn date_cell(record: &csv::StringRecord, i: usize, fallback: NaiveDate) -> Result<NaiveDate> {
    match cell(record, i) {
        "" => Ok(fallback),
        s => parse_date(s),
    }
}

/// Parse pasted sheet text into objectives with fresh key results
/// (`current_value = 0`). Generated ids are `obj-<n>` / `obj-<n>-kr-<m>`.
///
/// Objectives without any key result are dropped; an import that yields
/// nothing is an error.
pub fn parse_sheet_tsv(text: &str, opts: &ImportOptions) -> Result<Vec<Objective>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut objectives: Vec<Objective> = Vec::new();
    let mut current: Option<Objective> = None;

    for result in rdr.records() {
        let record = result.context("reading sheet row")?;
        // Blank lines are skipped by the reader, so report the source line.
        let row = record.position().map_or(0, |p| p.line());

        if !cell(&record, 0).is_empty() {
            if let Some(done) = current.take() {
                push_if_complete(&mut objectives, done);
            }

            let start = date_cell(&record, 3, opts.today).with_context(|| format!("row {row}: start date"))?;
            let end = date_cell(&record, 4, opts.today).with_context(|| format!("row {row}: end date"))?;
            let category = match cell(&record, 2) {
                "" => opts.default_category.clone(),
                c => c.to_string(),
            };
            let id = format!("obj-{}", objectives.len() + 1);

            current = Some(
                Objective::new(id, cell(&record, 0), category, start, end)
                    .with_description(cell(&record, 1)),
            );
        } else if !cell(&record, 1).is_empty() {
            let Some(obj) = current.as_mut() else {
                tracing::debug!(row, "key result row before any objective, skipped");
                continue;
            };

            let target: f64 = match cell(&record, 2) {
                "" => 0.0,
                s => s
                    .parse()
                    .with_context(|| format!("row {row}: invalid target value '{s}'"))?,
            };
            if !target.is_finite() {
                bail!("row {row}: target value is not a finite number");
            }
            let id = format!("{}-kr-{}", obj.id, obj.key_results.len() + 1);
            let kr = KeyResult::new(id, cell(&record, 1), target, cell(&record, 3), obj.start_date, obj.end_date);
            obj.key_results.push(kr);
        } else {
            tracing::debug!(row, "blank row skipped");
        }
    }

    if let Some(done) = current.take() {
        push_if_complete(&mut objectives, done);
    }

    if objectives.is_empty() {
        bail!("No valid objectives found in the data");
    }
    Ok(objectives)
}

fn push_if_complete(out: &mut Vec<Objective>, obj: Objective) {
    if obj.key_results.is_empty() {
        tracing::debug!(title = %obj.title, "objective without key results dropped");
        return;
    }
    out.push(obj);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ImportOptions {
        ImportOptions {
            default_category: "personal".to_string(),
            today: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_parse_sheet_basic() {
        let text = "Run a half marathon\tGet fit\thealth\t2025-01-01\t2025-03-31\n\
                    \tWeekly runs\t36\truns\n\
                    \tLong run distance\t21\tkm\n\
                    Learn Rust\t\t\t2025-04-01\t2025-06-30\n\
                    \tChapters read\t20\tchapters\n";

        let objectives = parse_sheet_tsv(text, &opts()).unwrap();
        assert_eq!(objectives.len(), 2);

        let first = &objectives[0];
        assert_eq!(first.id, "obj-1");
        assert_eq!(first.category, "health");
        assert_eq!(first.key_results.len(), 2);
        assert_eq!(first.key_results[1].id, "obj-1-kr-2");
        assert_eq!(first.key_results[1].target_value, 21.0);
        assert_eq!(first.key_results[1].unit, "km");
        assert_eq!(first.key_results[0].current_value, 0.0);
        assert_eq!(first.key_results[0].end_date, first.end_date);

        let second = &objectives[1];
        assert_eq!(second.id, "obj-2");
        assert_eq!(second.category, "personal");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_objective_without_key_results_is_dropped() {
        let text = "Lonely objective\tno krs\tcareer\t2025-01-01\t2025-02-01\n\
                    Real one\t\tcareer\t2025-01-01\t2025-02-01\n\
                    \tDo the thing\t1\tthing\n";
        let objectives = parse_sheet_tsv(text, &opts()).unwrap();
        assert_eq!(objectives.len(), 1);
        assert_eq!(objectives[0].title, "Real one");
        assert_eq!(objectives[0].id, "obj-1");
    }

    #[test]
    fn test_empty_dates_default_to_today() {
        let text = "Someday\t\t\t\t\n\tStep\t3\tsteps\n";
        let objectives = parse_sheet_tsv(text, &opts()).unwrap();
        assert_eq!(objectives[0].start_date, opts().today);
        assert_eq!(objectives[0].end_date, opts().today);
    }

    #[test]
    fn test_nothing_valid_is_an_error() {
        let err = parse_sheet_tsv("\n\n", &opts()).unwrap_err();
        assert!(err.to_string().contains("No valid objectives"));

        let err = parse_sheet_tsv("Title only\t\t\t2025-01-01\t2025-01-02\n", &opts()).unwrap_err();
        assert!(err.to_string().contains("No valid objectives"));
    }

    #[test]
    fn test_bad_target_reports_row() {
        let text = "Goal\t\t\t2025-01-01\t2025-01-02\n\tThing\tlots\tunits\n";
        let err = parse_sheet_tsv(text, &opts()).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_row_numbers_count_blank_lines() {
        let text = "Goal\t\t\t2025-01-01\t2025-01-02\n\n\n\tThing\tlots\tunits\n";
        let err = parse_sheet_tsv(text, &opts()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 4"), "got: {msg}");
    }

    #[test]
    fn test_non_finite_target_is_rejected() {
        for bad in ["inf", "NaN", "-infinity"] {
            let text = format!("Goal\t\t\t2025-01-01\t2025-02-01\n\tThing\t{bad}\tunits\n");
            let err = parse_sheet_tsv(&text, &opts()).unwrap_err();
            let msg = format!("{err:#}");
            assert!(msg.contains("row 2") && msg.contains("finite"), "{bad}: {msg}");
        }
    }
}
