//! Validation against reference workbooks on disk.

use std::path::{Path, PathBuf};

use nfse_core::error::ReferenceError;
use nfse_core::{InvoiceRecord, NfseError, SpreadsheetMatcher};
use rust_xlsxwriter::{Format, Workbook};

fn record() -> InvoiceRecord {
    let mut record = InvoiceRecord {
        competency_period: Some("18/10/2024".to_string()),
        service_value: Some("2500.00".to_string()),
        ..Default::default()
    };
    record.provider.tax_id = Some("12.345.678/0001-90".to_string());
    record
}

fn write_text_workbook(path: &Path, rows: &[[&str; 3]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn reference_file(dir: &Path) -> PathBuf {
    let path = dir.join("reference.xlsx");
    write_text_workbook(
        &path,
        &[
            ["Tax ID", "Competency", "Salary"],
            ["12.345.678/0001-90", "18/10/2024", "2500,00"],
        ],
    );
    path
}

#[test]
fn matching_row_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_file(dir.path());

    let matcher = SpreadsheetMatcher::default();
    assert!(matcher.validate(&record(), &path).unwrap());
}

#[test]
fn single_field_mismatch_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_file(dir.path());
    let matcher = SpreadsheetMatcher::default();

    let mut record_a = record();
    record_a.provider.tax_id = Some("00.000.000/0001-00".to_string());
    assert!(!matcher.validate(&record_a, &path).unwrap());

    let mut record_b = record();
    record_b.competency_period = Some("17/10/2024".to_string());
    assert!(!matcher.validate(&record_b, &path).unwrap());

    let mut record_c = record();
    record_c.service_value = Some("2400.00".to_string());
    assert!(!matcher.validate(&record_c, &path).unwrap());
}

#[test]
fn validation_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_file(dir.path());
    let before = std::fs::read(&path).unwrap();

    let matcher = SpreadsheetMatcher::default();
    let first = matcher.validate(&record(), &path).unwrap();
    let second = matcher.validate(&record(), &path).unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn typed_date_and_number_cells_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typed.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("dd-mmm-yyyy");
    sheet.write_string(0, 0, "CNPJ").unwrap();
    sheet.write_string(0, 1, "Competência").unwrap();
    sheet.write_string(0, 2, "Salário").unwrap();
    sheet.write_string(1, 0, "12.345.678/0001-90").unwrap();
    // 2024-10-18
    sheet.write_number_with_format(1, 1, 45583.0, &date_format).unwrap();
    sheet.write_number(1, 2, 2500.0).unwrap();
    workbook.save(&path).unwrap();

    assert!(SpreadsheetMatcher::default().validate(&record(), &path).unwrap());
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reference.xlsx");
    write_text_workbook(
        &path,
        &[
            ["CNPJ", "Competência", "Observação"],
            ["12.345.678/0001-90", "18/10/2024", "ok"],
        ],
    );

    let err = SpreadsheetMatcher::default()
        .validate(&record(), &path)
        .unwrap_err();
    assert!(matches!(err, NfseError::Reference(ReferenceError::MissingColumn(_))));
}

#[test]
fn unsupported_extension_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reference.txt");
    std::fs::write(&path, "CNPJ;Competência;Salário\n").unwrap();

    let err = SpreadsheetMatcher::default()
        .validate(&record(), &path)
        .unwrap_err();
    assert!(matches!(
        err,
        NfseError::Reference(ReferenceError::UnsupportedExtension(_))
    ));
}
