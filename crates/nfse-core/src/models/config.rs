//! Configuration structures for the NFSe pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the nfse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NfseConfig {
    /// Input and output locations.
    pub paths: PathsConfig,

    /// Reference spreadsheet layout.
    pub reference: ReferenceConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Folder layout of a run, relative to `root_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Working root holding the invoices, the reference file and the results.
    pub root_dir: PathBuf,

    /// Folder of `*.pdf` invoices, relative to the root.
    pub invoices_dir: PathBuf,

    /// Reference spreadsheet, relative to the root.
    pub reference_file: PathBuf,

    /// Folder receiving one timestamped sub-folder per run.
    pub results_dir: PathBuf,

    /// Name of the folder for invoices corroborated by the reference sheet.
    pub valid_dir_name: String,

    /// Name of the folder for every other invoice.
    pub error_dir_name: String,

    /// Log file written inside the run folder.
    pub log_file_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            invoices_dir: PathBuf::from("Notas"),
            reference_file: PathBuf::from("TesteExcelDocs").join("Folha_Teste_18.10.24.xlsx"),
            results_dir: PathBuf::from("Resultados"),
            valid_dir_name: "Validos".to_string(),
            error_dir_name: "Erros".to_string(),
            log_file_name: "log.txt".to_string(),
        }
    }
}

/// Header titles accepted for each required reference column.
///
/// Titles are matched case-insensitively and exactly; the first title
/// found in the header row wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub tax_id_titles: Vec<String>,
    pub competency_titles: Vec<String>,
    pub value_titles: Vec<String>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            tax_id_titles: vec!["CNPJ".to_string(), "Tax ID".to_string()],
            competency_titles: vec!["Competência".to_string(), "Competency".to_string()],
            value_titles: vec![
                "Salário".to_string(),
                "Salary".to_string(),
                "Value".to_string(),
            ],
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Section heading that precedes the provider's fields.
    pub provider_scope: String,

    /// Section heading that precedes the client's fields.
    pub client_scope: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            provider_scope: "Prestador".to_string(),
            client_scope: "Tomador".to_string(),
        }
    }
}

impl NfseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Absolute location of the invoice folder.
    pub fn invoices_path(&self) -> PathBuf {
        self.paths.root_dir.join(&self.paths.invoices_dir)
    }

    /// Absolute location of the reference spreadsheet.
    pub fn reference_path(&self) -> PathBuf {
        self.paths.root_dir.join(&self.paths.reference_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: NfseConfig =
            serde_json::from_str(r#"{ "paths": { "root_dir": "/data" } }"#).unwrap();

        assert_eq!(config.paths.root_dir, PathBuf::from("/data"));
        assert_eq!(config.paths.invoices_dir, PathBuf::from("Notas"));
        assert_eq!(config.extraction.provider_scope, "Prestador");
        assert_eq!(
            config.reference_path(),
            PathBuf::from("/data/TesteExcelDocs/Folha_Teste_18.10.24.xlsx")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = NfseConfig::default();
        config.extraction.client_scope = "Cliente".to_string();
        config.save(&path).unwrap();

        let loaded = NfseConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.client_scope, "Cliente");
        assert_eq!(loaded.reference.value_titles, config.reference.value_titles);
    }
}
