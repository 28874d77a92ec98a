// * Entity/Address Splitter
// * Splits one unlabeled blob into (name, address) using an ordered chain of
// * strategies; the first strategy producing a valid split wins.

use regex::Regex;
use std::sync::LazyLock;

use super::record::{char_len, SeparationResult};
use super::text::normalize;
use crate::config::constants::{SPLIT_MIN_ADDRESS_LEN, SPLIT_MIN_NAME_LEN};
use crate::config::keywords::{contains_any, KeywordTables};

// * Name = shortest comma-free prefix, then the first boundary token.
// * Word tokens need word boundaries so "at" does not fire inside "Private".
static PATTERN_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([^,]+?)(,|\b(?:near|opposite|behind|in front of|at|located at)\b|\baddress\b:?|\blocation\b:?)(.+)",
    )
    .expect("Invalid boundary regex")
});

// * Literal delimiters, tried in this order
const LITERAL_DELIMITERS: &[&str] = &[
    ", Near",
    ", Opposite",
    ", Behind",
    ", In front of",
    ", At",
    ", Located at",
    ", Address:",
    ", Location:",
];

/// A single separation strategy; `None` means "not applicable, try the next"
pub type SplitStrategy = fn(&str, &KeywordTables) -> Option<SeparationResult>;

/// The strategy chain in priority order
pub const STRATEGIES: &[(&str, SplitStrategy)] = &[
    ("boundary_token", split_on_boundary_token),
    ("literal_delimiter", split_on_literal_delimiter),
    ("first_comma", split_on_first_comma),
];

/// Separates a mixed name/address blob.
///
/// Either both parts of the result are filled (name longer than 3, address
/// longer than 5), or the normalized input comes back as the name with an
/// empty address.
pub fn separate(text: &str, keywords: &KeywordTables) -> SeparationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return SeparationResult {
            name: String::new(),
            address: String::new(),
        };
    }

    for (label, strategy) in STRATEGIES {
        if let Some(result) = strategy(trimmed, keywords) {
            tracing::trace!(strategy = *label, name = %result.name, "split succeeded");
            return result;
        }
    }

    SeparationResult {
        name: normalize(trimmed),
        address: String::new(),
    }
}

/// Accepts a candidate split only when both halves are long enough
fn accept(name: &str, address: &str) -> Option<SeparationResult> {
    let name = name.trim();
    let address = address.trim();

    if char_len(name) > SPLIT_MIN_NAME_LEN && char_len(address) > SPLIT_MIN_ADDRESS_LEN {
        Some(SeparationResult {
            name: name.to_string(),
            address: address.to_string(),
        })
    } else {
        None
    }
}

/// Strategy 1: first boundary token found by regex.
/// A comma is dropped; any word token stays at the head of the address.
pub fn split_on_boundary_token(text: &str, _keywords: &KeywordTables) -> Option<SeparationResult> {
    let caps = PATTERN_BOUNDARY.captures(text)?;
    let name = caps.get(1)?.as_str();
    let token = caps.get(2)?.as_str();
    let rest = caps.get(3)?.as_str();

    if token == "," {
        accept(name, rest)
    } else {
        accept(name, &format!("{}{}", token, rest))
    }
}

/// Strategy 2: literal ", <token>" delimiters in list order
pub fn split_on_literal_delimiter(
    text: &str,
    _keywords: &KeywordTables,
) -> Option<SeparationResult> {
    let delimiter = LITERAL_DELIMITERS.iter().find(|d| text.contains(**d))?;
    let (name, rest) = text.split_once(delimiter)?;

    // * Re-prepend the token itself, without the leading ", "
    let token = delimiter.trim_start_matches(", ");
    accept(name, &format!("{} {}", token, rest.trim()))
}

/// Strategy 3: first comma, only when the tail reads like a locality
pub fn split_on_first_comma(text: &str, keywords: &KeywordTables) -> Option<SeparationResult> {
    let (name, rest) = text.split_once(',')?;
    let rest_lower = rest.to_lowercase();

    if !contains_any(&rest_lower, keywords.locality_or_city()) {
        return None;
    }

    accept(name, rest)
}
