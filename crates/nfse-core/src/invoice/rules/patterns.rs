//! Label/value patterns for NFS-e documents and number/date shapes.

use lazy_static::lazy_static;
use regex::Regex;

use super::{FieldRule, InvoiceField, PartyField};

/// Invoice-level rules, extracted without a section scope.
pub static INVOICE_RULES: [FieldRule<InvoiceField>; 10] = [
    FieldRule {
        key: InvoiceField::AccessKey,
        labels: &["Chave de Acesso da NFS-e"],
        pattern: r"(\d+)",
    },
    FieldRule {
        key: InvoiceField::Number,
        labels: &["Número da NFS-e"],
        pattern: r"(\d+)",
    },
    FieldRule {
        key: InvoiceField::CompetencyPeriod,
        labels: &["Competência da NFS-e"],
        pattern: r"([\d/]+)",
    },
    FieldRule {
        key: InvoiceField::EmissionDatetime,
        labels: &["Data e Hora da emissão"],
        pattern: r"([\d/]+ \d{2}:\d{2}:\d{2})",
    },
    FieldRule {
        key: InvoiceField::ServiceCode,
        labels: &["Código de Tributação Nacional"],
        pattern: r"([\d.]+)",
    },
    FieldRule {
        key: InvoiceField::ServiceDescription,
        labels: &["Descrição do Serviço"],
        pattern: r"([^\n]+)",
    },
    FieldRule {
        key: InvoiceField::TaxStatus,
        labels: &["Tributação do ISSQN"],
        pattern: r"([^\n]+)",
    },
    FieldRule {
        key: InvoiceField::TaxJurisdiction,
        labels: &["Município de Incidência do ISSQN"],
        pattern: r"([^\n]+)",
    },
    FieldRule {
        key: InvoiceField::ServiceValue,
        labels: &["Valor do Serviço"],
        pattern: r"R\$\s*([\d,.]+)",
    },
    FieldRule {
        key: InvoiceField::NetValue,
        labels: &["Valor Líquido da NFS-e"],
        pattern: r"R\$\s*([\d.,]+)",
    },
];

/// Party rules, extracted once after each party's section heading.
pub static PARTY_RULES: [FieldRule<PartyField>; 6] = [
    FieldRule {
        key: PartyField::TaxId,
        labels: &["CNPJ"],
        pattern: r"(\d{2}\.?(?:\d{3}\.?){2}/?\d{4}-?\d{2})",
    },
    FieldRule {
        key: PartyField::LegalName,
        labels: &[r"(?:Nome\s*)(?:Empresarial|Raz[aã]o\s*Social)"],
        pattern: r"(.+?)\n",
    },
    FieldRule {
        key: PartyField::Email,
        labels: &["E-?mail"],
        pattern: r"\s*([^\n]*)",
    },
    FieldRule {
        key: PartyField::Address,
        labels: &["Endereço"],
        pattern: r"([^\n]+)",
    },
    FieldRule {
        key: PartyField::Municipality,
        labels: &["Município"],
        pattern: r"([^\n]+)",
    },
    FieldRule {
        key: PartyField::PostalCode,
        labels: &["CEP"],
        pattern: r"([\d-]+)",
    },
];

lazy_static! {
    // pt-BR decimal: dot thousands in strict groups of three, comma decimals
    pub static ref BRL_AMOUNT: Regex = Regex::new(
        r"^([+-]?)(\d{1,3}(?:\.\d{3})+|\d+)(?:,(\d+))?$"
    ).unwrap();

    // Invariant decimal: optional comma thousands, dot decimals
    pub static ref INVARIANT_AMOUNT: Regex = Regex::new(
        r"^([+-]?)(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?$"
    ).unwrap();

    // Currency prefix tolerated in front of an amount
    pub static ref CURRENCY_PREFIX: Regex = Regex::new(
        r"^R\$\s*"
    ).unwrap();

    // Competency date, exactly dd/mm/yyyy
    pub static ref COMPETENCY_DATE: Regex = Regex::new(
        r"^\d{2}/\d{2}/\d{4}$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_field_once() {
        let mut invoice: Vec<_> = INVOICE_RULES.iter().map(|r| r.key.name()).collect();
        invoice.sort();
        invoice.dedup();
        assert_eq!(invoice.len(), 10);

        let mut party: Vec<_> = PARTY_RULES.iter().map(|r| r.key.name()).collect();
        party.sort();
        party.dedup();
        assert_eq!(party.len(), 6);
    }

    #[test]
    fn test_amount_shapes() {
        assert!(BRL_AMOUNT.is_match("2.500,50"));
        assert!(BRL_AMOUNT.is_match("2500,5"));
        assert!(!BRL_AMOUNT.is_match("2500.5"));
        assert!(!BRL_AMOUNT.is_match("2.50,00"));

        assert!(INVARIANT_AMOUNT.is_match("2500.5"));
        assert!(INVARIANT_AMOUNT.is_match("2,500.50"));
        assert!(!INVARIANT_AMOUNT.is_match("2500,5"));
    }

    #[test]
    fn test_competency_shape() {
        assert!(COMPETENCY_DATE.is_match("18/10/2024"));
        assert!(!COMPETENCY_DATE.is_match("8/10/2024"));
        assert!(!COMPETENCY_DATE.is_match("2024-10-18"));
    }
}
