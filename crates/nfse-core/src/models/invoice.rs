//! NFSe record as read from the rendered PDF text.
//!
//! Every field is kept as the raw text the document carried. Numbers and
//! dates are only parsed when the record is compared against the
//! reference sheet.

use serde::{Deserialize, Serialize};

/// A municipal service invoice (NFS-e).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Access key (chave de acesso).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Invoice number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Competency period, expected as `dd/mm/yyyy`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competency_period: Option<String>,

    /// Issuance date and time, `dd/mm/yyyy hh:mm:ss`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_datetime: Option<String>,

    /// Service provider (prestador).
    pub provider: PartyRecord,

    /// Service taker (tomador).
    pub client: PartyRecord,

    /// National taxation code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,

    /// ISSQN taxation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_status: Option<String>,

    /// Municipality where ISSQN is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_jurisdiction: Option<String>,

    /// Gross service value, without the currency symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_value: Option<String>,

    /// Net value of the invoice, without the currency symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_value: Option<String>,
}

/// A legal entity named on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRecord {
    /// Business or legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    /// CNPJ, formatted as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,

    /// CEP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl PartyRecord {
    /// Check if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.legal_name.is_none()
            && self.tax_id.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.municipality.is_none()
            && self.postal_code.is_none()
    }
}

impl InvoiceRecord {
    /// Number of populated fields, party fields included.
    pub fn field_count(&self) -> usize {
        let own = [
            &self.access_key,
            &self.number,
            &self.competency_period,
            &self.emission_datetime,
            &self.service_code,
            &self.service_description,
            &self.tax_status,
            &self.tax_jurisdiction,
            &self.service_value,
            &self.net_value,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count();

        own + self.provider.field_count() + self.client.field_count()
    }

    /// Fields the reference sheet lookup cannot work without.
    pub fn missing_join_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.provider.tax_id) {
            missing.push("provider tax id");
        }
        if is_blank(&self.competency_period) {
            missing.push("competency period");
        }
        missing
    }
}

impl PartyRecord {
    fn field_count(&self) -> usize {
        [
            &self.legal_name,
            &self.tax_id,
            &self.email,
            &self.address,
            &self.municipality,
            &self.postal_code,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
