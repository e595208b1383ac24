//! okr-ingest: the boundary between stored/pasted records and okr-core types.
//!
//! Strings become dates here and nowhere else.

pub mod parsers;
pub mod records;
pub mod types;

pub use parsers::{parse_sheet_tsv, ImportOptions};
pub use records::{
    load_objectives_json, objective_from_row, objective_to_row, parse_date, parse_objectives_json,
    write_objectives_json,
};
pub use types::{KeyResultRow, MilestoneRow, ObjectiveRow};
