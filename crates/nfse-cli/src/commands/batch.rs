//! Run command - validate and sort every invoice in the invoice folder.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use nfse_core::{
    BatchProcessor, BatchSummary, FieldCatalog, FileReport, InvoiceOutcome, PdfTextRenderer,
    RecordBuilder, RunLayout, SpreadsheetMatcher, list_invoices,
};

use super::config::load_config;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Working root holding the invoice folder and the reference file
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Reference spreadsheet, overriding the configured one
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Also write a summary CSV into the run folder
    #[arg(long)]
    summary: bool,
}

pub fn run(args: RunArgs, config_path: Option<&str>, verbose: u8) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(root) = args.root {
        config.paths.root_dir = root;
    }
    if let Some(reference) = args.reference {
        // Joining an absolute path replaces the root
        config.paths.reference_file = reference;
    }

    let layout = RunLayout::prepare(&config, chrono::Local::now().naive_local())?;

    crate::init_logging(verbose, Some(&layout.log_file))?;
    info!("Results will be written to {}", layout.run_dir.display());

    let files = list_invoices(&layout.invoices_dir)?;
    if files.is_empty() {
        println!(
            "{} No invoices found in {}",
            style("ℹ").blue(),
            layout.invoices_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Found {} invoices to process",
        style("ℹ").blue(),
        files.len()
    );

    let builder = RecordBuilder::new(&FieldCatalog::standard(), &config.extraction)?;
    let matcher = SpreadsheetMatcher::new(config.reference.clone());
    let processor = BatchProcessor::new(PdfTextRenderer, builder, matcher);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let summary = processor.run_with(&files, &layout, |report| {
        pb.println(report_line(report));
        pb.inc(1);
    });

    pb.finish_and_clear();

    if args.summary {
        let summary_path = layout.run_dir.join("summary.csv");
        write_summary(&summary_path, &summary)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} invoices in {:?}",
        style("✓").green(),
        summary.reports.len(),
        start.elapsed()
    );
    println!(
        "   {} valid, {} invalid, {} failed",
        style(summary.valid_count()).green(),
        style(summary.invalid_count()).yellow(),
        style(summary.failed_count()).red()
    );
    println!("   Results in {}", layout.run_dir.display());

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn report_line(report: &FileReport) -> String {
    let source = file_name(&report.source);
    match &report.outcome {
        InvoiceOutcome::Valid { destination } => format!(
            "{} {} -> {}",
            style("✓").green(),
            source,
            file_name(destination)
        ),
        InvoiceOutcome::Invalid { destination } => format!(
            "{} {} -> {}",
            style("✗").yellow(),
            source,
            file_name(destination)
        ),
        InvoiceOutcome::StructuralFailure { destination, reason } => format!(
            "{} {} -> {} ({})",
            style("!").red(),
            source,
            file_name(destination),
            reason
        ),
        InvoiceOutcome::IoFailure { reason } => {
            format!("{} {}: {}", style("!").red(), source, reason)
        }
    }
}

fn status(outcome: &InvoiceOutcome) -> &'static str {
    match outcome {
        InvoiceOutcome::Valid { .. } => "valid",
        InvoiceOutcome::Invalid { .. } => "invalid",
        InvoiceOutcome::StructuralFailure { .. } => "structural_error",
        InvoiceOutcome::IoFailure { .. } => "io_error",
    }
}

fn write_summary(path: &Path, summary: &BatchSummary) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "destination",
        "invoice_number",
        "competency_period",
        "provider_name",
        "provider_tax_id",
        "service_value",
        "processing_time_ms",
        "error",
    ])?;

    for report in &summary.reports {
        let record = report.record.clone().unwrap_or_default();
        let destination = report
            .outcome
            .destination()
            .map(file_name)
            .unwrap_or_default();
        let error = match &report.outcome {
            InvoiceOutcome::StructuralFailure { reason, .. }
            | InvoiceOutcome::IoFailure { reason } => reason.as_str(),
            _ => "",
        };

        wtr.write_record([
            file_name(&report.source).as_str(),
            status(&report.outcome),
            destination.as_str(),
            record.number.as_deref().unwrap_or_default(),
            record.competency_period.as_deref().unwrap_or_default(),
            record.provider.legal_name.as_deref().unwrap_or_default(),
            record.provider.tax_id.as_deref().unwrap_or_default(),
            record.service_value.as_deref().unwrap_or_default(),
            report.processing_time_ms.to_string().as_str(),
            error,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
