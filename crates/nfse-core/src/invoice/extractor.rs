//! Label-anchored field extraction over raw document text.

use regex::Regex;
use tracing::trace;

use crate::error::ExtractionError;

/// A compiled label/value rule, optionally scoped to a document section.
///
/// For each label candidate the combined pattern is
/// `(?is)` + `(?:{scope}[\s\S]*?)` + `(?:{label}\s*[-:]?\s*)` + `[\s\S]*?` + `{capture}`.
/// Both lazy spans may cross line breaks.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    field: String,
    patterns: Vec<Regex>,
}

impl FieldExtractor {
    /// Compile one pattern per label candidate.
    ///
    /// `capture` must contain exactly one capturing group, and `scope` and
    /// the labels must not add any.
    pub fn compile(
        field: &str,
        scope: Option<&str>,
        labels: &[&str],
        capture: &str,
    ) -> Result<Self, ExtractionError> {
        let capture_re = Regex::new(capture).map_err(|e| invalid(field, e))?;
        let groups = capture_re.captures_len() - 1;
        if groups != 1 {
            return Err(ExtractionError::CaptureGroups {
                field: field.to_string(),
                groups,
            });
        }

        let prefix = match scope {
            Some(scope) if !scope.is_empty() => format!(r"(?:{scope}[\s\S]*?)"),
            _ => String::new(),
        };

        let mut patterns = Vec::with_capacity(labels.len());
        for label in labels {
            let full = format!(r"(?is){prefix}(?:{label}\s*[-:]?\s*)[\s\S]*?{capture}");
            let re = Regex::new(&full).map_err(|e| invalid(field, e))?;
            let groups = re.captures_len() - 1;
            if groups != 1 {
                return Err(ExtractionError::CaptureGroups {
                    field: field.to_string(),
                    groups,
                });
            }
            patterns.push(re);
        }

        Ok(Self {
            field: field.to_string(),
            patterns,
        })
    }

    /// Name of the field this extractor fills.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Trimmed capture of the first label that matches.
    ///
    /// A label that matches with a blank capture ends the search with `None`.
    pub fn extract(&self, text: &str) -> Option<String> {
        for re in &self.patterns {
            if let Some(caps) = re.captures(text) {
                let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                trace!("{} matched {:?}", self.field, value);
                return (!value.is_empty()).then(|| value.to_string());
            }
        }
        None
    }
}

fn invalid(field: &str, err: regex::Error) -> ExtractionError {
    ExtractionError::InvalidPattern {
        field: field.to_string(),
        reason: err.to_string(),
    }
}

/// One-shot extraction: compile the rule and apply it to `text`.
pub fn extract_field(
    text: &str,
    scope: Option<&str>,
    labels: &[&str],
    capture: &str,
) -> Result<Option<String>, ExtractionError> {
    let extractor = FieldExtractor::compile("field", scope, labels, capture)?;
    Ok(extractor.extract(text))
}
