//! NFS-e field extraction module.

mod builder;
pub mod extractor;
pub mod rules;

pub use builder::{ExtractionResult, RecordBuilder};
pub use extractor::{FieldExtractor, extract_field};
pub use rules::FieldCatalog;

/// Trait for turning rendered document text into an invoice record.
pub trait InvoiceParser {
    /// Parse an invoice from text, reporting the fields that were not found.
    fn parse(&self, text: &str) -> ExtractionResult;
}
