//! Reference spreadsheet: loading and cross-validation of invoice records.

mod matcher;
mod sheet;

pub use matcher::{ReferenceRow, SpreadsheetMatcher};
pub use sheet::{ReferenceSheet, SUPPORTED_EXTENSIONS, cell_text};
