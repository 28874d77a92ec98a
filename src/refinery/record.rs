// * Data model shared by the extractors and the orchestrator

use serde::{Deserialize, Serialize};

/// Which extractor produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Table,
    List,
    Structured,
}

impl SourceKind {
    /// Returns the string representation for export
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Table => "table",
            SourceKind::List => "list",
            SourceKind::Structured => "structured",
        }
    }
}

/// One validated (entity name, address) pair with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub entity_name: String,
    pub address: String,
    pub source_url: String,
    pub source_kind: SourceKind,
    /// 1-based table position on the page (table records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
    /// 1-based data-row position inside the table (table records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

/// A record as an extractor proposes it, before validation.
///
/// `extra_fields` holds the other scalar values seen alongside the
/// name/address (remaining table cells, structured address parts); the
/// validation pass may mine them for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entity_name: String,
    pub address: String,
    pub source_url: String,
    pub source_kind: SourceKind,
    pub table_index: Option<usize>,
    pub row_index: Option<usize>,
    pub extra_fields: Vec<(String, String)>,
}

impl Candidate {
    pub fn new(
        entity_name: impl Into<String>,
        address: impl Into<String>,
        source_url: &str,
        source_kind: SourceKind,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            address: address.into(),
            source_url: source_url.to_string(),
            source_kind,
            table_index: None,
            row_index: None,
            extra_fields: Vec::new(),
        }
    }

    pub fn at_table_row(mut self, table_index: usize, row_index: usize) -> Self {
        self.table_index = Some(table_index);
        self.row_index = Some(row_index);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_fields.push((key.into(), value.into()));
        self
    }

    pub(crate) fn into_record(self, entity_name: String, address: String) -> Record {
        Record {
            entity_name,
            address,
            source_url: self.source_url,
            source_kind: self.source_kind,
            table_index: self.table_index,
            row_index: self.row_index,
        }
    }
}

/// Zero-based column indices chosen for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub entity_col: usize,
    pub address_col: usize,
}

/// Outcome of splitting one text blob.
///
/// Either both parts are filled, or `name` holds the whole input and
/// `address` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationResult {
    pub name: String,
    pub address: String,
}

impl SeparationResult {
    pub fn is_separated(&self) -> bool {
        !self.address.is_empty()
    }
}

/// Character length, which is what every threshold counts
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Record validity check shared by the extractors and the validation pass
pub(crate) fn passes_record_thresholds(name: &str, address: &str) -> bool {
    use crate::config::constants::{MIN_ADDRESS_LEN, MIN_ENTITY_NAME_LEN};
    char_len(name) > MIN_ENTITY_NAME_LEN && char_len(address) > MIN_ADDRESS_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization_skips_missing_indices() {
        let record = Record {
            entity_name: "City Clinic".into(),
            address: "12 Mall Road".into(),
            source_url: "https://example.com".into(),
            source_kind: SourceKind::List,
            table_index: None,
            row_index: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""source_kind":"list""#));
        assert!(!json.contains("table_index"));
    }

    #[test]
    fn test_thresholds_count_characters() {
        assert!(passes_record_thresholds("Abc", "123456"));
        assert!(!passes_record_thresholds("Ab", "123456"));
        assert!(!passes_record_thresholds("Abc", "12345"));
        // * Multi-byte letters count once each
        assert!(passes_record_thresholds("Äbç", "Ñagar1"));
    }

    #[test]
    fn test_candidate_builder() {
        let candidate = Candidate::new("A", "B", "https://x.test", SourceKind::Table)
            .at_table_row(2, 5)
            .with_extra("Phone", "123");
        assert_eq!(candidate.table_index, Some(2));
        assert_eq!(candidate.row_index, Some(5));
        assert_eq!(candidate.extra_fields, vec![("Phone".to_string(), "123".to_string())]);
    }
}
