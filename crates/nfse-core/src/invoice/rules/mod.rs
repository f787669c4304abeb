//! Rule table for NFSe field extraction, plus value normalizers.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{format_brl_amount, normalize_monetary, parse_monetary};
pub use dates::{canonical_competency, normalize_competency_date};
pub use patterns::{INVOICE_RULES, PARTY_RULES};

use crate::models::invoice::{InvoiceRecord, PartyRecord};

/// A catalog entry: where a field's value sits in the document text.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<K: 'static> {
    /// Record slot the captured value is written to.
    pub key: K,
    /// Label fragments, tried in order.
    pub labels: &'static [&'static str],
    /// Value fragment holding exactly one capturing group.
    pub pattern: &'static str,
}

/// Invoice-level fields, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceField {
    AccessKey,
    Number,
    CompetencyPeriod,
    EmissionDatetime,
    ServiceCode,
    ServiceDescription,
    TaxStatus,
    TaxJurisdiction,
    ServiceValue,
    NetValue,
}

impl InvoiceField {
    pub fn name(self) -> &'static str {
        match self {
            Self::AccessKey => "access_key",
            Self::Number => "number",
            Self::CompetencyPeriod => "competency_period",
            Self::EmissionDatetime => "emission_datetime",
            Self::ServiceCode => "service_code",
            Self::ServiceDescription => "service_description",
            Self::TaxStatus => "tax_status",
            Self::TaxJurisdiction => "tax_jurisdiction",
            Self::ServiceValue => "service_value",
            Self::NetValue => "net_value",
        }
    }

    /// Current value of this field in `record`.
    pub fn get(self, record: &InvoiceRecord) -> Option<&str> {
        let value = match self {
            Self::AccessKey => &record.access_key,
            Self::Number => &record.number,
            Self::CompetencyPeriod => &record.competency_period,
            Self::EmissionDatetime => &record.emission_datetime,
            Self::ServiceCode => &record.service_code,
            Self::ServiceDescription => &record.service_description,
            Self::TaxStatus => &record.tax_status,
            Self::TaxJurisdiction => &record.tax_jurisdiction,
            Self::ServiceValue => &record.service_value,
            Self::NetValue => &record.net_value,
        };
        value.as_deref()
    }

    /// The record slot this field is written to.
    pub fn slot(self, record: &mut InvoiceRecord) -> &mut Option<String> {
        match self {
            Self::AccessKey => &mut record.access_key,
            Self::Number => &mut record.number,
            Self::CompetencyPeriod => &mut record.competency_period,
            Self::EmissionDatetime => &mut record.emission_datetime,
            Self::ServiceCode => &mut record.service_code,
            Self::ServiceDescription => &mut record.service_description,
            Self::TaxStatus => &mut record.tax_status,
            Self::TaxJurisdiction => &mut record.tax_jurisdiction,
            Self::ServiceValue => &mut record.service_value,
            Self::NetValue => &mut record.net_value,
        }
    }
}

/// Fields extracted once per party section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyField {
    TaxId,
    LegalName,
    Email,
    Address,
    Municipality,
    PostalCode,
}

impl PartyField {
    pub fn name(self) -> &'static str {
        match self {
            Self::TaxId => "tax_id",
            Self::LegalName => "legal_name",
            Self::Email => "email",
            Self::Address => "address",
            Self::Municipality => "municipality",
            Self::PostalCode => "postal_code",
        }
    }

    pub fn get(self, party: &PartyRecord) -> Option<&str> {
        let value = match self {
            Self::TaxId => &party.tax_id,
            Self::LegalName => &party.legal_name,
            Self::Email => &party.email,
            Self::Address => &party.address,
            Self::Municipality => &party.municipality,
            Self::PostalCode => &party.postal_code,
        };
        value.as_deref()
    }

    /// The party slot this field is written to.
    pub fn slot(self, party: &mut PartyRecord) -> &mut Option<String> {
        match self {
            Self::TaxId => &mut party.tax_id,
            Self::LegalName => &mut party.legal_name,
            Self::Email => &mut party.email,
            Self::Address => &mut party.address,
            Self::Municipality => &mut party.municipality,
            Self::PostalCode => &mut party.postal_code,
        }
    }
}

/// The full rule table, shared read-only by every invoice of a run.
#[derive(Debug, Clone, Copy)]
pub struct FieldCatalog {
    pub invoice: &'static [FieldRule<InvoiceField>],
    pub party: &'static [FieldRule<PartyField>],
}

impl FieldCatalog {
    /// The NFS-e layout of the national standard.
    pub fn standard() -> Self {
        Self {
            invoice: &INVOICE_RULES,
            party: &PARTY_RULES,
        }
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.invoice.len() + self.party.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
