//! Document number formatting.

use kontor_shared::config::NumberingConfig;

use crate::invoice::types::DocumentType;

/// Returns the configured prefix for a document type.
#[must_use]
pub fn prefix_for(config: &NumberingConfig, doc_type: DocumentType) -> &str {
    match doc_type {
        DocumentType::Invoice => &config.invoice_prefix,
        DocumentType::CreditNote => &config.credit_note_prefix,
        DocumentType::Quote => &config.quote_prefix,
    }
}

/// Formats a document number as `<PREFIX>-<YEAR>-<NNNN>`.
///
/// The sequential part is zero-padded to the configured width but never
/// truncated — the ten-thousandth invoice of a year simply grows a digit.
#[must_use]
pub fn format_document_number(
    config: &NumberingConfig,
    doc_type: DocumentType,
    year: i32,
    number: u64,
) -> String {
    let prefix = prefix_for(config, doc_type);
    let width = config.pad_width;
    format!("{prefix}-{year}-{number:0width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DocumentType::Invoice, 1, "RE-2026-0001")]
    #[case(DocumentType::Invoice, 42, "RE-2026-0042")]
    #[case(DocumentType::CreditNote, 7, "GS-2026-0007")]
    #[case(DocumentType::Quote, 999, "AN-2026-0999")]
    #[case(DocumentType::Invoice, 10_000, "RE-2026-10000")]
    fn test_format(#[case] doc_type: DocumentType, #[case] number: u64, #[case] expected: &str) {
        let config = NumberingConfig::default();
        assert_eq!(
            format_document_number(&config, doc_type, 2026, number),
            expected
        );
    }

    #[test]
    fn test_custom_prefix_and_width() {
        let config = NumberingConfig {
            invoice_prefix: "INV".to_string(),
            pad_width: 6,
            ..NumberingConfig::default()
        };
        assert_eq!(
            format_document_number(&config, DocumentType::Invoice, 2027, 12),
            "INV-2027-000012"
        );
    }
}
