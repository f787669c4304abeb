//! Renaming and relocation of processed invoice files.
//!
//! The file is first copied next to the original under its derived name,
//! then that copy is moved into the destination folder. The two steps are
//! not atomic: an interruption between them leaves the renamed copy in the
//! source folder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, error, info};

use crate::models::invoice::{InvoiceRecord, is_blank};

lazy_static! {
    static ref NON_NAME_CHARS: Regex = Regex::new(r"[^a-zA-Z\s]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonical file name for an invoice: `{NNNN}_{LEGAL_NAME}.pdf`.
///
/// Only ASCII letters and whitespace survive in the legal name, so accented
/// letters are dropped (`João` becomes `JOO`). Without a number or a
/// provider legal name the result is `error_{original file name}`.
pub fn derive_file_name(record: &InvoiceRecord, source: &Path) -> String {
    if is_blank(&record.number) || is_blank(&record.provider.legal_name) {
        error!("Invoice number or provider legal name is missing");
        let original = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return format!("error_{}", original);
    }

    let number = record.number.as_deref().unwrap_or_default().trim();
    let legal_name = record.provider.legal_name.as_deref().unwrap_or_default();

    let letters = NON_NAME_CHARS.replace_all(legal_name, "");
    let upper = letters.trim().to_uppercase();
    let name = WHITESPACE_RUN.replace_all(&upper, "_");

    format!("{:0>4}_{}.pdf", number, name)
}

/// Copy `source` under its derived name, then move the copy into `destination_dir`.
///
/// Existing files with the same name are overwritten in both steps.
/// Returns the final path.
pub fn dispose_invoice(
    source: &Path,
    record: &InvoiceRecord,
    destination_dir: &Path,
) -> io::Result<PathBuf> {
    let file_name = derive_file_name(record, source);
    info!("Renaming {} to {}", source.display(), file_name);

    let source_dir = source.parent().unwrap_or_else(|| Path::new("."));
    let renamed = source_dir.join(&file_name);

    if renamed == source {
        // Already carries its canonical name; a self-copy would truncate it
        debug!("{} already has its derived name", source.display());
    } else {
        fs::copy(source, &renamed)?;
    }

    let destination = destination_dir.join(&file_name);
    move_file(&renamed, &destination)?;

    info!("Moved {} to {}", file_name, destination_dir.display());
    Ok(destination)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // Different filesystems
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
