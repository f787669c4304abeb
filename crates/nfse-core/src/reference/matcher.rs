//! Cross-validation of an invoice record against the reference sheet.

use std::path::Path;

use tracing::{info, warn};

use crate::Result;
use crate::invoice::rules::{canonical_competency, normalize_competency_date, normalize_monetary};
use crate::models::config::ReferenceConfig;
use crate::models::invoice::InvoiceRecord;

use super::ReferenceSheet;

/// The three compared cells of one data row, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    /// Sheet row index.
    pub index: usize,
    pub tax_id: String,
    pub competency: String,
    pub value: String,
}

impl ReferenceRow {
    fn read(sheet: &ReferenceSheet, index: usize, columns: &Columns) -> Self {
        let text = |col: usize| sheet.cell(index, col).unwrap_or_default().trim();

        let value = text(columns.value);
        Self {
            index,
            tax_id: text(columns.tax_id).to_string(),
            competency: canonical_competency(text(columns.competency)),
            value: if value.is_empty() {
                String::new()
            } else {
                normalize_monetary(value)
            },
        }
    }
}

struct Columns {
    tax_id: usize,
    competency: usize,
    value: usize,
}

/// What a matching row must contain, derived from the record.
struct Expected {
    tax_id: String,
    competency: String,
    value: String,
}

/// Decides whether the reference sheet corroborates an invoice.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetMatcher {
    columns: ReferenceConfig,
}

impl SpreadsheetMatcher {
    pub fn new(columns: ReferenceConfig) -> Self {
        Self { columns }
    }

    /// Validate `record` against the workbook at `reference`.
    ///
    /// Returns `Ok(false)` when the path is empty or the record lacks the
    /// provider tax id or the competency period. A workbook that cannot be
    /// read, a missing header or column, and a malformed competency date
    /// are errors. The workbook is read anew on every call.
    pub fn validate(&self, record: &InvoiceRecord, reference: &Path) -> Result<bool> {
        if reference.as_os_str().is_empty() {
            warn!("No reference file given, invoice cannot be validated");
            return Ok(false);
        }
        if !has_join_keys(record) {
            return Ok(false);
        }

        let sheet = ReferenceSheet::open(reference)?;
        self.validate_against(record, &sheet)
    }

    /// Validate `record` against an already loaded sheet.
    pub fn validate_against(&self, record: &InvoiceRecord, sheet: &ReferenceSheet) -> Result<bool> {
        if !has_join_keys(record) {
            return Ok(false);
        }

        let columns = Columns {
            tax_id: sheet.column_index(&self.columns.tax_id_titles)?,
            competency: sheet.column_index(&self.columns.competency_titles)?,
            value: sheet.column_index(&self.columns.value_titles)?,
        };

        let expected = Expected {
            tax_id: record.provider.tax_id.as_deref().unwrap_or_default().trim().to_string(),
            competency: normalize_competency_date(
                record.competency_period.as_deref().unwrap_or_default(),
            )?,
            value: record
                .service_value
                .as_deref()
                .map(normalize_monetary)
                .unwrap_or_default(),
        };

        for (index, _) in sheet.data_rows() {
            let row = ReferenceRow::read(sheet, index, &columns);

            info!("Row {}: tax id {:?}, expected {:?}", index, row.tax_id, expected.tax_id);
            info!(
                "Row {}: competency {:?}, expected {:?}",
                index, row.competency, expected.competency
            );
            info!("Row {}: value {:?}, expected {:?}", index, row.value, expected.value);

            if row_matches(&row, &expected) {
                info!("Reference row {} corroborates the invoice", index);
                return Ok(true);
            }
        }

        info!(
            "No reference row for tax id {} and competency {}",
            expected.tax_id, expected.competency
        );
        Ok(false)
    }
}

fn has_join_keys(record: &InvoiceRecord) -> bool {
    let missing = record.missing_join_keys();
    if missing.is_empty() {
        return true;
    }
    warn!("Cannot search the reference sheet without {}", missing.join(" and "));
    false
}

fn row_matches(row: &ReferenceRow, expected: &Expected) -> bool {
    row.tax_id == expected.tax_id
        && row.competency.to_lowercase() == expected.competency.to_lowercase()
        && row.value == expected.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NfseError;
    use crate::error::{ExtractionError, ReferenceError};

    fn record() -> InvoiceRecord {
        let mut record = InvoiceRecord {
            competency_period: Some("18/10/2024".to_string()),
            service_value: Some("2500.00".to_string()),
            ..Default::default()
        };
        record.provider.tax_id = Some("12.345.678/0001-90".to_string());
        record
    }

    fn sheet() -> ReferenceSheet {
        ReferenceSheet::from_rows(vec![
            vec!["Tax ID", "Competency", "Salary"],
            vec!["12.345.678/0001-90", "18/10/2024", "2500,00"],
        ])
    }

    #[test]
    fn test_matching_row() {
        let matcher = SpreadsheetMatcher::default();
        assert!(matcher.validate_against(&record(), &sheet()).unwrap());
    }

    #[test]
    fn test_any_single_mismatch_fails() {
        let matcher = SpreadsheetMatcher::default();

        let mut other_tax_id = record();
        other_tax_id.provider.tax_id = Some("12.345.678/0001-91".to_string());
        assert!(!matcher.validate_against(&other_tax_id, &sheet()).unwrap());

        let mut other_competency = record();
        other_competency.competency_period = Some("18/11/2024".to_string());
        assert!(!matcher.validate_against(&other_competency, &sheet()).unwrap());

        let mut other_value = record();
        other_value.service_value = Some("2500.01".to_string());
        assert!(!matcher.validate_against(&other_value, &sheet()).unwrap());
    }

    #[test]
    fn test_all_fields_must_match_on_same_row() {
        let sheet = ReferenceSheet::from_rows(vec![
            vec!["CNPJ", "Competência", "Salário"],
            vec!["12.345.678/0001-90", "18-Oct-2024", "1.000,00"],
            vec!["99.999.999/0001-99", "18-Oct-2024", "2.500,00"],
        ]);
        let matcher = SpreadsheetMatcher::default();
        assert!(!matcher.validate_against(&record(), &sheet).unwrap());
    }

    #[test]
    fn test_competency_case_and_whitespace() {
        let sheet = ReferenceSheet::from_rows(vec![
            vec!["CNPJ", "Competência", "Salário"],
            vec![" 12.345.678/0001-90 ", " 18-OCT-2024 ", "2500"],
        ]);
        let mut record = record();
        record.provider.tax_id = Some(" 12.345.678/0001-90".to_string());

        let matcher = SpreadsheetMatcher::default();
        assert!(matcher.validate_against(&record, &sheet).unwrap());
    }

    #[test]
    fn test_missing_join_keys_short_circuit() {
        let matcher = SpreadsheetMatcher::default();

        let mut no_tax_id = record();
        no_tax_id.provider.tax_id = None;
        assert!(!matcher.validate_against(&no_tax_id, &sheet()).unwrap());

        let mut no_competency = record();
        no_competency.competency_period = None;
        // Never touches the file
        assert!(!matcher
            .validate(&no_competency, Path::new("/nonexistent/ref.xlsx"))
            .unwrap());
    }

    #[test]
    fn test_empty_reference_path() {
        let matcher = SpreadsheetMatcher::default();
        assert!(!matcher.validate(&record(), Path::new("")).unwrap());
    }

    #[test]
    fn test_malformed_competency_is_an_error() {
        let mut record = record();
        record.competency_period = Some("2024-10-18".to_string());

        let err = SpreadsheetMatcher::default()
            .validate_against(&record, &sheet())
            .unwrap_err();
        assert!(matches!(err, NfseError::Extraction(ExtractionError::Parse { .. })));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let sheet = ReferenceSheet::from_rows(vec![vec!["CNPJ", "Competência"]]);
        let err = SpreadsheetMatcher::default()
            .validate_against(&record(), &sheet)
            .unwrap_err();
        assert!(matches!(err, NfseError::Reference(ReferenceError::MissingColumn(_))));
    }

    #[test]
    fn test_first_matching_row_wins() {
        let sheet = ReferenceSheet::from_rows(vec![
            vec!["CNPJ", "Competência", "Salário"],
            vec!["12.345.678/0001-90", "18-Oct-2024", "2500"],
            vec!["12.345.678/0001-90", "18-Oct-2024", "2500"],
        ]);
        assert!(SpreadsheetMatcher::default()
            .validate_against(&record(), &sheet)
            .unwrap());
    }
}
