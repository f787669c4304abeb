//! Sequential batch processing: render, extract, validate, dispose.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::disposal::dispose_invoice;
use crate::invoice::RecordBuilder;
use crate::layout::RunLayout;
use crate::models::invoice::InvoiceRecord;
use crate::pdf::TextRenderer;
use crate::reference::SpreadsheetMatcher;

/// How a single invoice left the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceOutcome {
    /// Corroborated by the reference sheet; moved to the valid folder.
    Valid { destination: PathBuf },
    /// No matching reference row; moved to the error folder.
    Invalid { destination: PathBuf },
    /// Validation could not run (unreadable sheet, missing column,
    /// malformed competency); moved to the error folder.
    StructuralFailure { destination: PathBuf, reason: String },
    /// The file could not be read or moved; left where it was.
    IoFailure { reason: String },
}

impl InvoiceOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Where the file ended up, if it was moved.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Valid { destination }
            | Self::Invalid { destination }
            | Self::StructuralFailure { destination, .. } => Some(destination),
            Self::IoFailure { .. } => None,
        }
    }
}

/// Result of processing one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    /// Extracted record, when the file could be rendered.
    pub record: Option<InvoiceRecord>,
    pub outcome: InvoiceOutcome,
    pub processing_time_ms: u64,
}

/// All file reports of a run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn valid_count(&self) -> usize {
        self.count(|o| matches!(o, InvoiceOutcome::Valid { .. }))
    }

    pub fn invalid_count(&self) -> usize {
        self.count(|o| matches!(o, InvoiceOutcome::Invalid { .. }))
    }

    /// Structural and I/O failures.
    pub fn failed_count(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                InvoiceOutcome::StructuralFailure { .. } | InvoiceOutcome::IoFailure { .. }
            )
        })
    }

    fn count(&self, pred: impl Fn(&InvoiceOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs invoices through extraction, validation and disposal one at a time.
pub struct BatchProcessor<R> {
    renderer: R,
    builder: RecordBuilder,
    matcher: SpreadsheetMatcher,
}

impl<R: TextRenderer> BatchProcessor<R> {
    pub fn new(renderer: R, builder: RecordBuilder, matcher: SpreadsheetMatcher) -> Self {
        Self {
            renderer,
            builder,
            matcher,
        }
    }

    /// Process every file, calling `on_report` as each one finishes.
    ///
    /// A failing file never stops the batch.
    pub fn run_with<F>(&self, files: &[PathBuf], layout: &RunLayout, mut on_report: F) -> BatchSummary
    where
        F: FnMut(&FileReport),
    {
        let mut summary = BatchSummary::default();
        for path in files {
            let report = self.process_file(path, layout);
            on_report(&report);
            summary.reports.push(report);
        }

        info!(
            "Batch finished: {} valid, {} invalid, {} failed",
            summary.valid_count(),
            summary.invalid_count(),
            summary.failed_count()
        );
        summary
    }

    pub fn run(&self, files: &[PathBuf], layout: &RunLayout) -> BatchSummary {
        self.run_with(files, layout, |_| {})
    }

    /// Process a single invoice end to end.
    pub fn process_file(&self, path: &Path, layout: &RunLayout) -> FileReport {
        let start = Instant::now();
        info!("Processing {}", path.display());

        let (record, outcome) = match self.renderer.render(path) {
            Ok(text) => {
                let record = self.builder.build(&text);
                let outcome = self.validate_and_dispose(path, &record, layout);
                (Some(record), outcome)
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                (None, InvoiceOutcome::IoFailure { reason: e.to_string() })
            }
        };

        FileReport {
            source: path.to_path_buf(),
            record,
            outcome,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn validate_and_dispose(
        &self,
        path: &Path,
        record: &InvoiceRecord,
        layout: &RunLayout,
    ) -> InvoiceOutcome {
        let validation = self.matcher.validate(record, &layout.reference_file);
        if let Err(e) = &validation {
            warn!("Could not validate {}: {}", path.display(), e);
        }
        let is_valid = matches!(validation, Ok(true));

        let destination = match dispose_invoice(path, record, layout.destination(is_valid)) {
            Ok(destination) => destination,
            Err(e) => {
                error!("Failed to move {}: {}", path.display(), e);
                return InvoiceOutcome::IoFailure { reason: e.to_string() };
            }
        };

        match validation {
            Ok(true) => InvoiceOutcome::Valid { destination },
            Ok(false) => InvoiceOutcome::Invalid { destination },
            Err(e) => InvoiceOutcome::StructuralFailure {
                destination,
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let report = |outcome| FileReport {
            source: PathBuf::from("x.pdf"),
            record: None,
            outcome,
            processing_time_ms: 0,
        };
        let summary = BatchSummary {
            reports: vec![
                report(InvoiceOutcome::Valid { destination: PathBuf::from("v/a.pdf") }),
                report(InvoiceOutcome::Invalid { destination: PathBuf::from("e/b.pdf") }),
                report(InvoiceOutcome::StructuralFailure {
                    destination: PathBuf::from("e/c.pdf"),
                    reason: "column".to_string(),
                }),
                report(InvoiceOutcome::IoFailure { reason: "locked".to_string() }),
            ],
        };

        assert_eq!(summary.valid_count(), 1);
        assert_eq!(summary.invalid_count(), 1);
        assert_eq!(summary.failed_count(), 2);
        assert!(summary.reports[0].outcome.is_valid());
        assert_eq!(summary.reports[3].outcome.destination(), None);
        assert_eq!(
            summary.reports[2].outcome.destination(),
            Some(Path::new("e/c.pdf"))
        );
    }
}
