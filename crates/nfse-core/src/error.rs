//! Error types for the nfse-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the nfse library.
#[derive(Error, Debug)]
pub enum NfseError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Reference spreadsheet error.
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The invoice input folder does not exist.
    #[error("invoice directory not found: {}", .0.display())]
    MissingInvoiceDir(PathBuf),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to invoice field extraction and normalization.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A rule's pattern does not compile.
    #[error("invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },

    /// A rule's capture pattern must hold exactly one group.
    #[error("pattern for {field} has {groups} capture groups, expected 1")]
    CaptureGroups { field: String, groups: usize },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Errors related to the reference spreadsheet.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// The workbook could not be opened or read.
    #[error("failed to open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// The file extension is not a supported spreadsheet format.
    #[error("unsupported reference file extension: {0:?}")]
    UnsupportedExtension(String),

    /// The workbook has no sheets.
    #[error("workbook has no sheets")]
    NoSheet,

    /// Row 0 is missing or blank.
    #[error("header row not found in sheet")]
    MissingHeader,

    /// A required column title is not in the header row.
    #[error("column '{0}' not found in header row")]
    MissingColumn(String),
}

/// Result type for the nfse library.
pub type Result<T> = std::result::Result<T, NfseError>;
