//! Competency date handling.
//!
//! The invoice prints the competency as `dd/mm/yyyy` while the reference
//! sheet shows it the way a spreadsheet renders a date cell,
//! `dd-MMM-yyyy` with English month abbreviations.

use chrono::NaiveDate;

use super::patterns::COMPETENCY_DATE;
use crate::error::ExtractionError;

const INVOICE_FORMAT: &str = "%d/%m/%Y";
const SHEET_FORMAT: &str = "%d-%b-%Y";

/// Convert a strict `dd/mm/yyyy` date to `dd-MMM-yyyy` (18/10/2024 -> 18-Oct-2024).
pub fn normalize_competency_date(raw: &str) -> Result<String, ExtractionError> {
    parse_competency(raw)
        .map(format_sheet_date)
        .ok_or_else(|| ExtractionError::Parse {
            field: "competency_period".to_string(),
            value: raw.to_string(),
        })
}

/// Canonical form of a reference-sheet competency cell.
///
/// Cells typed as text in `dd/mm/yyyy` are brought to `dd-MMM-yyyy`;
/// anything else is kept as written.
pub fn canonical_competency(cell: &str) -> String {
    let cell = cell.trim();
    match parse_competency(cell) {
        Some(date) => format_sheet_date(date),
        None => cell.to_string(),
    }
}

/// Render a date the way the reference sheet displays it.
pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_FORMAT).to_string()
}

fn parse_competency(raw: &str) -> Option<NaiveDate> {
    if !COMPETENCY_DATE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, INVOICE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_competency_date() {
        assert_eq!(normalize_competency_date("18/10/2024").unwrap(), "18-Oct-2024");
        assert_eq!(normalize_competency_date("01/02/2023").unwrap(), "01-Feb-2023");
    }

    #[test]
    fn test_normalize_competency_date_rejects_other_shapes() {
        assert!(normalize_competency_date("2024-10-18").is_err());
        assert!(normalize_competency_date("1/10/2024").is_err());
        assert!(normalize_competency_date(" 18/10/2024").is_err());
        assert!(normalize_competency_date("31/02/2024").is_err());
        assert!(normalize_competency_date("").is_err());
    }

    #[test]
    fn test_canonical_competency() {
        assert_eq!(canonical_competency("18/10/2024"), "18-Oct-2024");
        assert_eq!(canonical_competency(" 18-Oct-2024 "), "18-Oct-2024");
        assert_eq!(canonical_competency("outubro/2024"), "outubro/2024");
    }

    #[test]
    fn test_format_sheet_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(format_sheet_date(date), "05-Dec-2024");
    }
}
