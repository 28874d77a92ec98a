// * The Refinery (Extraction Pipeline)
// * Goal: turn one page's HTML into validated (entity name, address) records.
// * Tables, lists and JSON-LD blocks are read in that order; results are
// * concatenated and then validated.

pub mod address;
pub mod columns;
pub mod lists;
pub mod record;
pub mod splitter;
pub mod structured;
pub mod tables;
pub mod text;

// * Re-exports for convenient access
pub use address::{extract_address_like, match_address, AddressMatch};
pub use columns::classify;
pub use lists::ListExtractor;
pub use record::{Candidate, ColumnAssignment, Record, SeparationResult, SourceKind};
pub use splitter::separate;
pub use structured::StructuredExtractor;
pub use tables::{ExtractedTable, TableExtractor};
pub use text::normalize;

use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::constants::{MIN_ADDRESS_LEN, MIN_ENTITY_NAME_LEN, TABLE_SAMPLE_ROWS};
use crate::config::keywords::KeywordTables;
use record::char_len;

#[derive(Debug, Error)]
pub enum RefineryError {
    #[error("Source URL is missing")]
    MissingSourceUrl,

    #[error("Invalid source URL '{url}': {source}")]
    InvalidSourceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Pipeline position of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    /// Parsed document received
    Fetched,
    /// Extractors have run; candidates not yet validated
    Extracted,
    /// Final records available
    Validated,
}

/// Processing statistics from the refinery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineryStats {
    pub table_candidates: usize,
    pub list_candidates: usize,
    pub structured_candidates: usize,
    /// Candidates removed by validation
    pub dropped: usize,
    /// Candidates whose address was recovered from another field
    pub repaired: usize,
    pub record_count: usize,
}

/// Result of processing one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub source_url: String,
    pub stage: ExtractionStage,
    pub records: Vec<Record>,
    pub stats: RefineryStats,
}

impl ExtractionReport {
    /// True when the page yielded nothing; a legitimate outcome
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts report to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts report to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Configuration for the refinery pipeline
#[derive(Debug, Clone)]
pub struct RefineryConfig {
    /// Whether to read `<table>` elements
    pub extract_tables: bool,
    /// Whether to read list-like elements
    pub extract_lists: bool,
    /// Whether to read JSON-LD blocks
    pub extract_structured: bool,
    /// Leading data rows handed to the column classifier
    pub sample_rows: usize,
}

impl Default for RefineryConfig {
    fn default() -> Self {
        Self {
            extract_tables: true,
            extract_lists: true,
            extract_structured: true,
            sample_rows: TABLE_SAMPLE_ROWS,
        }
    }
}

/// The extraction orchestrator.
///
/// Holds only configuration and a shared reference to the keyword tables,
/// so one instance can serve any number of pages, including concurrently.
///
/// # Example
/// ```ignore
/// use entity_flow::refinery::Refinery;
///
/// let report = Refinery::new().process(html, "https://example.com/hospitals")?;
/// for record in &report.records {
///     println!("{} | {}", record.entity_name, record.address);
/// }
/// ```
pub struct Refinery<'k> {
    config: RefineryConfig,
    keywords: &'k KeywordTables,
}

impl Refinery<'static> {
    /// Creates a new refinery with default configuration and keyword tables
    pub fn new() -> Self {
        Self::with_config(RefineryConfig::default(), KeywordTables::global())
    }
}

impl Default for Refinery<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k> Refinery<'k> {
    /// Creates a new refinery with custom configuration and keyword tables
    pub fn with_config(config: RefineryConfig, keywords: &'k KeywordTables) -> Self {
        Self { config, keywords }
    }

    /// Returns the current configuration
    pub fn config(&self) -> &RefineryConfig {
        &self.config
    }

    /// Parses `html` and runs the full pipeline.
    ///
    /// Fails only when `source_url` is blank or not a URL; a page with nothing
    /// to extract gives an empty report.
    pub fn process(&self, html: &str, source_url: &str) -> Result<ExtractionReport, RefineryError> {
        let document = Html::parse_document(html);
        self.process_document(&document, source_url)
    }

    /// Runs the pipeline over an already-parsed document
    pub fn process_document(
        &self,
        document: &Html,
        source_url: &str,
    ) -> Result<ExtractionReport, RefineryError> {
        let source_url = validate_source_url(source_url)?;
        let mut stats = RefineryStats::default();
        let mut stage = ExtractionStage::Fetched;
        debug!(url = %source_url, ?stage, "page received");

        let candidates = self.run_extractors(document, &source_url, &mut stats);
        stage = ExtractionStage::Extracted;
        debug!(candidates = candidates.len(), ?stage, "extractors finished");

        let records = self.validate(candidates, &mut stats);
        stage = ExtractionStage::Validated;
        stats.record_count = records.len();

        info!(
            url = %source_url,
            records = stats.record_count,
            dropped = stats.dropped,
            repaired = stats.repaired,
            "page extraction complete"
        );

        Ok(ExtractionReport {
            source_url,
            stage,
            records,
            stats,
        })
    }

    /// Runs the enabled extractors in fixed order (table, list, structured)
    /// and concatenates their candidates without deduplication
    fn run_extractors(
        &self,
        document: &Html,
        source_url: &str,
        stats: &mut RefineryStats,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if self.config.extract_tables {
            let found = TableExtractor::new(self.keywords, self.config.sample_rows)
                .extract(document, source_url);
            stats.table_candidates = found.len();
            candidates.extend(found);
        }

        if self.config.extract_lists {
            let found = ListExtractor::new().extract(document, source_url);
            stats.list_candidates = found.len();
            candidates.extend(found);
        }

        if self.config.extract_structured {
            let found = StructuredExtractor::new().extract(document, source_url);
            stats.structured_candidates = found.len();
            candidates.extend(found);
        }

        candidates
    }

    /// Final cleanup: re-normalizes both fields, drops short names, and tries
    /// one address repair from the candidate's other fields before dropping
    pub fn validate(&self, candidates: Vec<Candidate>, stats: &mut RefineryStats) -> Vec<Record> {
        let mut records = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let name = normalize(&candidate.entity_name);
            if char_len(&name) <= MIN_ENTITY_NAME_LEN {
                stats.dropped += 1;
                continue;
            }

            let mut address = normalize(&candidate.address);
            if char_len(&address) <= MIN_ADDRESS_LEN {
                match repair_address(&candidate.extra_fields) {
                    Some(repaired) => {
                        debug!(name = %name, address = %repaired, "address repaired");
                        stats.repaired += 1;
                        address = repaired;
                    }
                    None => {
                        stats.dropped += 1;
                        continue;
                    }
                }
            }

            records.push(candidate.into_record(name, address));
        }

        records
    }
}

/// Scans the other fields through the address matcher; the first result
/// longer than the address threshold wins
fn repair_address(extra_fields: &[(String, String)]) -> Option<String> {
    extra_fields.iter().find_map(|(key, value)| {
        let found = match_address(value);
        if char_len(found.as_str()) <= MIN_ADDRESS_LEN {
            return None;
        }
        if !found.is_pattern() {
            debug!(field = %key, "address repair fell back to the whole field");
        }
        Some(found.into_text())
    })
}

fn validate_source_url(source_url: &str) -> Result<String, RefineryError> {
    let trimmed = source_url.trim();
    if trimmed.is_empty() {
        return Err(RefineryError::MissingSourceUrl);
    }

    // * Parsed only to validate; the caller's spelling is kept as provenance
    Url::parse(trimmed).map_err(|source| RefineryError::InvalidSourceUrl {
        url: trimmed.to_string(),
        source,
    })?;
    Ok(trimmed.to_string())
}
