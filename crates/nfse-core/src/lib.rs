//! Core library for NFS-e batch validation.
//!
//! This crate provides:
//! - PDF text rendering
//! - Label/pattern field extraction into an invoice record
//! - pt-BR monetary and competency-date normalization
//! - Cross-validation against a reference spreadsheet
//! - Renaming and relocation of processed invoices

pub mod disposal;
pub mod error;
pub mod invoice;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod reference;

pub use disposal::{derive_file_name, dispose_invoice};
pub use error::{NfseError, Result};
pub use invoice::{FieldCatalog, FieldExtractor, InvoiceParser, RecordBuilder, extract_field};
pub use layout::{RunLayout, list_invoices};
pub use models::config::NfseConfig;
pub use models::invoice::{InvoiceRecord, PartyRecord};
pub use pdf::{PdfExtractor, PdfProcessor, PdfTextRenderer, TextRenderer};
pub use pipeline::{BatchProcessor, BatchSummary, FileReport, InvoiceOutcome};
pub use reference::{ReferenceSheet, SpreadsheetMatcher};
