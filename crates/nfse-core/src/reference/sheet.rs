//! First-sheet text grid read with calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;
use tracing::debug;

use crate::error::ReferenceError;
use crate::invoice::rules::dates::format_sheet_date;

/// Extensions calamine can open.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// The first sheet of a workbook as text cells, row 0 being the header.
///
/// Rows and columns keep their sheet positions: leading blank rows or
/// columns stay in the grid as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSheet {
    rows: Vec<Vec<String>>,
}

impl ReferenceSheet {
    /// Build a sheet from in-memory rows.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Read the first sheet of the workbook at `path`.
    pub fn open(path: &Path) -> Result<Self, ReferenceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ReferenceError::UnsupportedExtension(extension));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| ReferenceError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ReferenceError::NoSheet)?
            .map_err(|e| ReferenceError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let Some((end_row, end_col)) = range.end() else {
            debug!("Reference sheet {} is empty", path.display());
            return Ok(Self::default());
        };

        let rows: Vec<Vec<String>> = (0..=end_row)
            .map(|row| {
                (0..=end_col)
                    .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        debug!(
            "Loaded reference sheet {} ({} rows x {} columns)",
            path.display(),
            rows.len(),
            end_col + 1
        );

        Ok(Self { rows })
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Text of the cell at (`row`, `col`); `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Index of the first header cell equal to one of `titles`, ignoring case.
    ///
    /// Titles are tried in order.
    pub fn column_index(&self, titles: &[String]) -> Result<usize, ReferenceError> {
        let header = self
            .rows
            .first()
            .filter(|row| !is_blank_row(row))
            .ok_or(ReferenceError::MissingHeader)?;

        for title in titles {
            let wanted = title.trim().to_lowercase();
            if let Some(index) = header
                .iter()
                .position(|cell| cell.trim().to_lowercase() == wanted)
            {
                return Ok(index);
            }
        }

        Err(ReferenceError::MissingColumn(titles.join("/")))
    }

    /// Data rows (index 1 onwards), skipping rows with no text at all.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| !is_blank_row(row))
            .map(|(index, row)| (index, row.as_slice()))
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Text of a cell as a spreadsheet displays it.
///
/// Date cells render as `dd-MMM-yyyy`, numbers in their shortest form.
pub fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        // Serial conversion honours the workbook's 1900/1904 date system
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| dt.as_f64().to_string(), |d| format_sheet_date(d.date())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .map_or_else(|| s.clone(), format_sheet_date),
        other => other.to_string(),
    }
}
