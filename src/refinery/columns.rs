// * Column Classifier
// * Decides which table column holds entity names and which holds addresses,
// * without trusting the labels. Passes run in order and only fill roles that
// * are still unassigned.

use super::record::{char_len, ColumnAssignment};
use crate::config::constants::{
    ADDRESS_SAMPLE_MIN_CHARS, CONTENT_SCAN_ROWS, ENTITY_SAMPLE_MAX_CHARS, LENGTH_SCAN_ROWS,
};
use crate::config::keywords::{contains_any, KeywordTables};

/// Roles found so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialAssignment {
    pub entity_col: Option<usize>,
    pub address_col: Option<usize>,
}

impl PartialAssignment {
    fn is_complete(&self) -> bool {
        self.entity_col.is_some() && self.address_col.is_some()
    }
}

/// One classification pass over headers and sample rows
pub type ClassifierPass = fn(&[String], &[Vec<String>], &KeywordTables, &mut PartialAssignment);

/// The pass chain in priority order
pub const PASSES: &[(&str, ClassifierPass)] = &[
    ("header_keywords", header_keyword_pass),
    ("cell_keywords", cell_keyword_pass),
    ("length_heuristic", length_heuristic_pass),
];

/// Picks the entity and address columns of a table.
///
/// Never fails: both indices are within `0..headers.len()` (or 0 for an
/// empty header list) and differ whenever there is more than one column.
pub fn classify(
    headers: &[String],
    sample_rows: &[Vec<String>],
    keywords: &KeywordTables,
) -> ColumnAssignment {
    let mut partial = PartialAssignment::default();

    for (label, pass) in PASSES {
        if partial.is_complete() {
            break;
        }
        pass(headers, sample_rows, keywords, &mut partial);
        tracing::trace!(pass = *label, ?partial, "classifier pass finished");
    }

    resolve(partial, headers.len())
}

/// Fills unassigned roles by position and separates colliding roles
fn resolve(partial: PartialAssignment, column_count: usize) -> ColumnAssignment {
    let last = column_count.saturating_sub(1);
    let entity_col = partial.entity_col.unwrap_or(0);
    let mut address_col = partial.address_col.unwrap_or_else(|| 1.min(last));

    if entity_col == address_col && column_count > 1 {
        address_col = if entity_col == 0 { 1 } else { 0 };
    }

    ColumnAssignment {
        entity_col,
        address_col,
    }
}

/// Joins the first `depth` cells of a column, lowercased
fn column_sample(sample_rows: &[Vec<String>], col: usize, depth: usize) -> String {
    sample_rows
        .iter()
        .take(depth)
        .filter_map(|row| row.get(col))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pass 1: header labels. A header that names the entity is not also taken
/// as the address.
pub fn header_keyword_pass(
    headers: &[String],
    _sample_rows: &[Vec<String>],
    keywords: &KeywordTables,
    partial: &mut PartialAssignment,
) {
    for (col, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();

        if partial.entity_col.is_none()
            && contains_any(&header_lower, keywords.entity.iter().map(String::as_str))
        {
            partial.entity_col = Some(col);
            continue;
        }

        if partial.address_col.is_none()
            && partial.entity_col != Some(col)
            && contains_any(&header_lower, keywords.address.iter().map(String::as_str))
        {
            partial.address_col = Some(col);
        }
    }
}

/// Pass 2: keywords inside the first few cells of each column
pub fn cell_keyword_pass(
    headers: &[String],
    sample_rows: &[Vec<String>],
    keywords: &KeywordTables,
    partial: &mut PartialAssignment,
) {
    for col in 0..headers.len() {
        let sample = column_sample(sample_rows, col, CONTENT_SCAN_ROWS);

        if partial.entity_col.is_none()
            && partial.address_col != Some(col)
            && contains_any(&sample, keywords.entity.iter().map(String::as_str))
        {
            partial.entity_col = Some(col);
            continue;
        }

        if partial.address_col.is_none()
            && partial.entity_col != Some(col)
            && contains_any(&sample, keywords.address.iter().map(String::as_str))
        {
            partial.address_col = Some(col);
        }
    }
}

/// Pass 3: short organization-like columns are names, long locality-like
/// columns are addresses. Only columns present in the first sample row count.
pub fn length_heuristic_pass(
    headers: &[String],
    sample_rows: &[Vec<String>],
    keywords: &KeywordTables,
    partial: &mut PartialAssignment,
) {
    let Some(first_row) = sample_rows.first() else {
        return;
    };
    let width = headers.len().min(first_row.len());

    for col in 0..width {
        let sample = column_sample(sample_rows, col, LENGTH_SCAN_ROWS);
        let sample_len = char_len(&sample);

        if partial.entity_col.is_none()
            && partial.address_col != Some(col)
            && sample_len < ENTITY_SAMPLE_MAX_CHARS
            && contains_any(&sample, keywords.organization.iter().map(String::as_str))
        {
            partial.entity_col = Some(col);
            continue;
        }

        if partial.address_col.is_none()
            && partial.entity_col != Some(col)
            && sample_len > ADDRESS_SAMPLE_MIN_CHARS
            && contains_any(&sample, keywords.locality_or_city())
        {
            partial.address_col = Some(col);
        }
    }
}
