//! Catalog-wide extraction behaviour.

use nfse_core::invoice::rules::{FieldCatalog, INVOICE_RULES, PARTY_RULES};
use nfse_core::models::config::ExtractionConfig;
use nfse_core::{FieldExtractor, InvoiceRecord, PartyRecord, RecordBuilder};
use pretty_assertions::assert_eq;

#[test]
fn every_catalog_rule_compiles_with_one_group() {
    for rule in INVOICE_RULES.iter() {
        FieldExtractor::compile(rule.key.name(), None, rule.labels, rule.pattern)
            .unwrap_or_else(|e| panic!("{}: {}", rule.key.name(), e));
    }
    for rule in PARTY_RULES.iter() {
        FieldExtractor::compile(rule.key.name(), Some("Prestador"), rule.labels, rule.pattern)
            .unwrap_or_else(|e| panic!("{}: {}", rule.key.name(), e));
    }
    assert_eq!(FieldCatalog::standard().len(), 16);
}

#[test]
fn sixteen_labels_round_trip() {
    let text = "\
Chave de Acesso da NFS-e: 31062001234567890000000000000123
Número da NFS-e: 123
Competência da NFS-e: 01/09/2024
Data e Hora da emissão: 02/09/2024 08:15:00
Código de Tributação Nacional: 17.01.01
Descrição do Serviço: Consultoria contábil mensal
Tributação do ISSQN: Operação Tributável
Município de Incidência do ISSQN: Belo Horizonte - MG
Valor do Serviço: R$ 3.200,75
Valor Líquido da NFS-e: R$ 3.008,71
Prestador
CNPJ: 11.222.333/0001-44
Nome Empresarial: Contabilidade Exemplo Ltda
E-mail: contato@exemplo.com.br
Endereço: Rua Espírito Santo, 500
Município: Belo Horizonte
CEP: 30160-030
";

    let record = RecordBuilder::standard().unwrap().build(text);

    let expected = InvoiceRecord {
        access_key: Some("31062001234567890000000000000123".to_string()),
        number: Some("123".to_string()),
        competency_period: Some("01/09/2024".to_string()),
        emission_datetime: Some("02/09/2024 08:15:00".to_string()),
        provider: PartyRecord {
            legal_name: Some("Contabilidade Exemplo Ltda".to_string()),
            tax_id: Some("11.222.333/0001-44".to_string()),
            email: Some("contato@exemplo.com.br".to_string()),
            address: Some("Rua Espírito Santo, 500".to_string()),
            municipality: Some("Belo Horizonte".to_string()),
            postal_code: Some("30160-030".to_string()),
        },
        client: PartyRecord::default(),
        service_code: Some("17.01.01".to_string()),
        service_description: Some("Consultoria contábil mensal".to_string()),
        tax_status: Some("Operação Tributável".to_string()),
        tax_jurisdiction: Some("Belo Horizonte - MG".to_string()),
        service_value: Some("3.200,75".to_string()),
        net_value: Some("3.008,71".to_string()),
    };

    assert_eq!(record, expected);
}

#[test]
fn provider_and_client_are_scoped_apart() {
    let text = "\
Prestador do Serviço
CNPJ 12.345.678/0001-90
Nome Empresarial ALFA SERVICOS LTDA
Tomador do Serviço
CNPJ 98.765.432/0001-10
Nome Empresarial BETA INDUSTRIA SA
";
    let config = ExtractionConfig::default();
    let builder = RecordBuilder::new(&FieldCatalog::standard(), &config).unwrap();
    let record = builder.build(text);

    assert_eq!(record.provider.tax_id.as_deref(), Some("12.345.678/0001-90"));
    assert_eq!(record.client.tax_id.as_deref(), Some("98.765.432/0001-10"));
    assert_eq!(record.provider.legal_name.as_deref(), Some("ALFA SERVICOS LTDA"));
    assert_eq!(record.client.legal_name.as_deref(), Some("BETA INDUSTRIA SA"));
}

#[test]
fn unformatted_cnpj_is_captured() {
    let text = "Prestador\nCNPJ: 12345678000190\n";
    let record = RecordBuilder::standard().unwrap().build(text);
    assert_eq!(record.provider.tax_id.as_deref(), Some("12345678000190"));
}
