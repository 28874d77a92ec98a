// * Table Extraction
// * Walks every table, works out headers, lets the column classifier pick the
// * entity/address columns and turns each data row into a candidate record.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

use super::columns::classify;
use super::record::{passes_record_thresholds, Candidate, ColumnAssignment, SourceKind};
use super::splitter::separate;
use super::text::normalize;
use crate::config::keywords::KeywordTables;

// * Precompiled CSS selectors for performance
static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_THEAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead").expect("Invalid thead selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));

/// Where a table's header labels came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// `<thead>`; its rows are not data
    Thead,
    /// First row made of `<th>` cells; not data
    FirstRowTh,
    /// First row of plain `<td>` cells; still treated as data
    FirstRowTd,
    /// `Column_N` placeholders sized to the widest row
    Synthesized,
}

/// A table reduced to normalized text
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub headers: Vec<String>,
    pub header_source: HeaderSource,
    pub rows: Vec<Vec<String>>,
}

/// Extracts entity/address candidates from HTML tables
pub struct TableExtractor<'k> {
    keywords: &'k KeywordTables,
    sample_rows: usize,
}

impl<'k> TableExtractor<'k> {
    pub fn new(keywords: &'k KeywordTables, sample_rows: usize) -> Self {
        Self {
            keywords,
            sample_rows,
        }
    }

    /// Runs over every `<table>` of the document, in document order
    pub fn extract(&self, document: &Html, source_url: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let tables: Vec<ElementRef> = document.select(&SELECTOR_TABLE).collect();
        info!(count = tables.len(), "tables found on page");

        for (table_idx, table) in tables.iter().enumerate() {
            let Some(extracted) = read_table(table) else {
                debug!(table = table_idx + 1, "table has no rows, skipped");
                continue;
            };
            candidates.extend(self.extract_rows(&extracted, table_idx + 1, source_url));
        }

        info!(count = candidates.len(), "table candidates extracted");
        candidates
    }

    /// Turns one table's rows into candidates
    pub fn extract_rows(
        &self,
        table: &ExtractedTable,
        table_index: usize,
        source_url: &str,
    ) -> Vec<Candidate> {
        let sample: Vec<Vec<String>> = table
            .rows
            .iter()
            .filter(|row| !row.is_empty())
            .take(self.sample_rows)
            .cloned()
            .collect();

        let assignment = classify(&table.headers, &sample, self.keywords);
        debug!(
            table = table_index,
            headers = ?table.headers,
            entity_col = assignment.entity_col,
            address_col = assignment.address_col,
            "columns identified"
        );

        table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(row_idx, row)| {
                let candidate = self.row_candidate(table, row, assignment, source_url)?;
                Some(candidate.at_table_row(table_index, row_idx + 1))
            })
            .collect()
    }

    fn row_candidate(
        &self,
        table: &ExtractedTable,
        row: &[String],
        assignment: ColumnAssignment,
        source_url: &str,
    ) -> Option<Candidate> {
        let ColumnAssignment {
            entity_col,
            address_col,
        } = assignment;

        // * Rows too short for the assigned columns are skipped
        let entity_text = row.get(entity_col)?;
        let address_text = row.get(address_col)?;

        // * Identical cells hold one mixed blob: split it instead of copying it twice
        let (name, address) = if !entity_text.is_empty() && entity_text == address_text {
            let split = separate(entity_text, self.keywords);
            (split.name, split.address)
        } else {
            (entity_text.clone(), address_text.clone())
        };

        if !passes_record_thresholds(&name, &address) {
            return None;
        }

        let mut candidate = Candidate::new(name, address, source_url, SourceKind::Table);
        for (col, cell) in row.iter().enumerate() {
            if col == entity_col || col == address_col || cell.is_empty() {
                continue;
            }
            let key = table
                .headers
                .get(col)
                .cloned()
                .unwrap_or_else(|| synthesized_label(col));
            candidate = candidate.with_extra(key, cell.clone());
        }
        Some(candidate)
    }
}

fn synthesized_label(col: usize) -> String {
    format!("Column_{}", col + 1)
}

/// Direct `<td>`/`<th>` children of a row, normalized
fn row_cells(row: &ElementRef) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(|cell| normalize(&cell.text().collect::<String>()))
        .collect()
}

fn has_th_cell(row: &ElementRef) -> bool {
    row.children()
        .filter_map(ElementRef::wrap)
        .any(|cell| cell.value().name() == "th")
}

fn inside_thead(row: &ElementRef) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "table")
        .any(|el| el.value().name() == "thead")
}

/// Reads headers and data rows of a table. Returns None when the table has no rows.
pub fn read_table(table: &ElementRef) -> Option<ExtractedTable> {
    let all_rows: Vec<ElementRef> = table.select(&SELECTOR_TR).collect();
    if all_rows.is_empty() {
        return None;
    }

    let mut header_source = HeaderSource::Synthesized;
    let mut headers = Vec::new();
    let mut data_rows: Vec<&ElementRef> = all_rows.iter().collect();

    if let Some(thead) = table.select(&SELECTOR_THEAD).next() {
        headers = thead.select(&SELECTOR_TR).flat_map(|r| row_cells(&r)).collect();
        header_source = HeaderSource::Thead;
        data_rows.retain(|row| !inside_thead(row));
    } else if let Some(first) = all_rows.first() {
        headers = row_cells(first);
        if has_th_cell(first) {
            header_source = HeaderSource::FirstRowTh;
            data_rows.remove(0);
        } else {
            header_source = HeaderSource::FirstRowTd;
        }
    }

    if headers.is_empty() {
        let widest = all_rows.iter().map(|r| row_cells(r).len()).max().unwrap_or(0);
        if widest == 0 {
            return None;
        }
        headers = (0..widest).map(synthesized_label).collect();
        header_source = HeaderSource::Synthesized;
        data_rows = all_rows.iter().filter(|row| !inside_thead(row)).collect();
    }

    let rows = data_rows.into_iter().map(row_cells).collect();

    Some(ExtractedTable {
        headers,
        header_source,
        rows,
    })
}
