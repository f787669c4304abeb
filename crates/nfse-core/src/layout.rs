//! Folder layout of a run: inputs under the root, one timestamped results folder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::NfseError;
use crate::models::config::NfseConfig;

/// Resolved paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    /// Folder holding the invoices to process.
    pub invoices_dir: PathBuf,
    /// Reference spreadsheet.
    pub reference_file: PathBuf,
    /// `Resultados/Resultado-<timestamp>`.
    pub run_dir: PathBuf,
    /// Destination for corroborated invoices.
    pub valid_dir: PathBuf,
    /// Destination for every other invoice.
    pub error_dir: PathBuf,
    /// Log file inside the run folder.
    pub log_file: PathBuf,
}

impl RunLayout {
    /// Resolve the layout for a run started at `started`.
    pub fn new(config: &NfseConfig, started: NaiveDateTime) -> Self {
        let run_dir = config
            .paths
            .root_dir
            .join(&config.paths.results_dir)
            .join(run_folder_name(started));

        Self {
            invoices_dir: config.invoices_path(),
            reference_file: config.reference_path(),
            valid_dir: run_dir.join(&config.paths.valid_dir_name),
            error_dir: run_dir.join(&config.paths.error_dir_name),
            log_file: run_dir.join(&config.paths.log_file_name),
            run_dir,
        }
    }

    /// Resolve the layout and create the results folders.
    pub fn prepare(config: &NfseConfig, started: NaiveDateTime) -> io::Result<Self> {
        let layout = Self::new(config, started);
        layout.create_dirs()?;
        Ok(layout)
    }

    /// Create the run, valid and error folders.
    pub fn create_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.valid_dir)?;
        fs::create_dir_all(&self.error_dir)?;
        Ok(())
    }

    /// Destination folder for a validation result.
    pub fn destination(&self, valid: bool) -> &Path {
        if valid { &self.valid_dir } else { &self.error_dir }
    }
}

/// `Resultado-yyyy-MM-dd_HH-mm-ss`.
pub fn run_folder_name(started: NaiveDateTime) -> String {
    format!("Resultado-{}", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// PDF files directly inside `dir`, sorted by name.
///
/// A missing folder is an error; an empty one yields an empty list.
pub fn list_invoices(dir: &Path) -> crate::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(NfseError::MissingInvoiceDir(dir.to_path_buf()));
    }

    info!("Listing invoices in {}", dir.display());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        warn!("No PDF files found in {}", dir.display());
    }
    Ok(files)
}
