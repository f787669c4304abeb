//! Builds an [`InvoiceRecord`] by running every catalog rule over the text.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{InvoiceRecord, PartyRecord};

use super::extractor::FieldExtractor;
use super::rules::{FieldCatalog, InvoiceField, PartyField};
use super::InvoiceParser;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub record: InvoiceRecord,
    /// Fields that could not be found.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Compiled rule set for one run.
pub struct RecordBuilder {
    invoice: Vec<(InvoiceField, FieldExtractor)>,
    provider: Vec<(PartyField, FieldExtractor)>,
    client: Vec<(PartyField, FieldExtractor)>,
}

impl RecordBuilder {
    /// Compile the catalog, scoping party rules with the configured headings.
    pub fn new(catalog: &FieldCatalog, config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let invoice = catalog
            .invoice
            .iter()
            .map(|rule| {
                FieldExtractor::compile(rule.key.name(), None, rule.labels, rule.pattern)
                    .map(|extractor| (rule.key, extractor))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let provider = compile_party(catalog, &config.provider_scope, "provider")?;
        let client = compile_party(catalog, &config.client_scope, "client")?;

        debug!("Compiled {} field rules", invoice.len() + provider.len() + client.len());

        Ok(Self {
            invoice,
            provider,
            client,
        })
    }

    /// Builder over the standard catalog and default section headings.
    pub fn standard() -> Result<Self, ExtractionError> {
        Self::new(&FieldCatalog::standard(), &ExtractionConfig::default())
    }

    /// Populate a record from the full document text.
    ///
    /// Each field is extracted on its own; a miss leaves that slot empty.
    pub fn build(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::default();

        for (field, extractor) in &self.invoice {
            *field.slot(&mut record) = extractor.extract(text);
        }
        fill_party(&mut record.provider, &self.provider, text);
        fill_party(&mut record.client, &self.client, text);

        record
    }
}

fn compile_party(
    catalog: &FieldCatalog,
    scope: &str,
    role: &str,
) -> Result<Vec<(PartyField, FieldExtractor)>, ExtractionError> {
    catalog
        .party
        .iter()
        .map(|rule| {
            let name = format!("{}.{}", role, rule.key.name());
            FieldExtractor::compile(&name, Some(scope), rule.labels, rule.pattern)
                .map(|extractor| (rule.key, extractor))
        })
        .collect()
}

fn fill_party(party: &mut PartyRecord, rules: &[(PartyField, FieldExtractor)], text: &str) {
    for (field, extractor) in rules {
        *field.slot(party) = extractor.extract(text);
    }
}

impl InvoiceParser for RecordBuilder {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Extracting NFS-e fields from {} characters of text", text.len());
        let record = self.build(text);

        let mut warnings = Vec::new();
        for (field, extractor) in &self.invoice {
            if field.get(&record).is_none() {
                warnings.push(format!("Could not extract {}", extractor.field()));
            }
        }
        for (rules, party) in [(&self.provider, &record.provider), (&self.client, &record.client)] {
            for (field, extractor) in rules.iter() {
                if field.get(party).is_none() {
                    warnings.push(format!("Could not extract {}", extractor.field()));
                }
            }
        }

        for warning in &warnings {
            debug!("{}", warning);
        }

        ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
