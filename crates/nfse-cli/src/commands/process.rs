//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use nfse_core::invoice::ExtractionResult;
use nfse_core::{
    FieldCatalog, InvoiceParser, InvoiceRecord, PartyRecord, PdfTextRenderer, RecordBuilder,
    SpreadsheetMatcher, TextRenderer,
};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also validate the record against this reference spreadsheet
    #[arg(long)]
    reference: Option<PathBuf>,

    /// List the fields that could not be extracted
    #[arg(long)]
    show_missing: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = PdfTextRenderer.render(&args.input)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from the PDF");
    }

    let builder = RecordBuilder::new(&FieldCatalog::standard(), &config.extraction)?;
    let ExtractionResult {
        record,
        warnings,
        processing_time_ms,
    } = builder.parse(&text);
    debug!("Extraction took {}ms", processing_time_ms);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Text => format_text(&record),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing && !warnings.is_empty() {
        eprintln!("{}", style("Missing fields:").yellow());
        for warning in &warnings {
            eprintln!("  - {}", warning);
        }
    }

    if let Some(reference) = &args.reference {
        let matcher = SpreadsheetMatcher::new(config.reference.clone());
        if matcher.validate(&record, reference)? {
            println!(
                "{} Corroborated by {}",
                style("✓").green(),
                reference.display()
            );
        } else {
            println!(
                "{} No matching row in {}",
                style("✗").red(),
                reference.display()
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn push_line(output: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        output.push_str(&format!("  {:<14}{}\n", format!("{}:", label), value));
    }
}

fn push_party(output: &mut String, title: &str, party: &PartyRecord) {
    output.push_str(&format!("{}:\n", title));
    push_line(output, "Name", &party.legal_name);
    push_line(output, "CNPJ", &party.tax_id);
    push_line(output, "E-mail", &party.email);
    push_line(output, "Address", &party.address);
    push_line(output, "Municipality", &party.municipality);
    push_line(output, "CEP", &party.postal_code);
    output.push('\n');
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str("Invoice:\n");
    push_line(&mut output, "Number", &record.number);
    push_line(&mut output, "Access key", &record.access_key);
    push_line(&mut output, "Competency", &record.competency_period);
    push_line(&mut output, "Issued", &record.emission_datetime);
    output.push('\n');

    push_party(&mut output, "Provider", &record.provider);
    push_party(&mut output, "Client", &record.client);

    output.push_str("Service:\n");
    push_line(&mut output, "Code", &record.service_code);
    push_line(&mut output, "Description", &record.service_description);
    push_line(&mut output, "ISSQN", &record.tax_status);
    push_line(&mut output, "Jurisdiction", &record.tax_jurisdiction);
    push_line(&mut output, "Value", &record.service_value);
    push_line(&mut output, "Net value", &record.net_value);

    output
}
