pub mod sheets;

pub use sheets::{parse_sheet_tsv, ImportOptions};
