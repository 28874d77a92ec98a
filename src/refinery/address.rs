// * Address Pattern Matcher
// * Recognizes address-like substrings through prioritized pattern families.

use regex::Regex;
use std::sync::LazyLock;

use super::text::normalize;

const STREET_TYPES: &str = "Street|Road|Avenue|Lane|Drive|Boulevard|Colony|Nagar|Area|Sector|Phase";
const BUILDING_TYPES: &str = "Floor|Building|Complex|Mall|Plaza";
const LOCALITY_TYPES: &str = "District|State|City|PIN|Postal Code";

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("Invalid address regex")
}

// * Family 1: "<number> <words> <street-type>" or "<words> <street-type> <number>"
static FAMILY_STREET: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(r"\d+\s+[A-Za-z\s]+(?:{})", STREET_TYPES)),
        compile(&format!(r"[A-Za-z\s]+(?:{})\s+\d+", STREET_TYPES)),
    ]
});

// * Family 2: same shapes with building keywords
static FAMILY_BUILDING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(r"\d+\s+[A-Za-z\s]+(?:{})", BUILDING_TYPES)),
        compile(&format!(r"[A-Za-z\s]+(?:{})\s+\d+", BUILDING_TYPES)),
    ]
});

// * Family 3: administrative keywords or a 6-digit postal code
static FAMILY_LOCALITY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(r"[A-Za-z\s]+(?:{})", LOCALITY_TYPES)),
        compile(r"\d{6}"),
    ]
});

/// What `extract_address_like` found.
///
/// `Echo` means no family matched and the normalized input came back
/// unchanged; callers should treat it as low confidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressMatch {
    Pattern(String),
    Echo(String),
}

impl AddressMatch {
    pub fn as_str(&self) -> &str {
        match self {
            AddressMatch::Pattern(text) | AddressMatch::Echo(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AddressMatch::Pattern(text) | AddressMatch::Echo(text) => text,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, AddressMatch::Pattern(_))
    }
}

/// Finds the most address-like part of `text`.
///
/// Families are tried in order (street, building, locality); the first
/// family with any match wins and its first match is returned normalized.
/// Without a match the whole normalized input is echoed back.
pub fn match_address(text: &str) -> AddressMatch {
    let families: [&[Regex]; 3] = [&FAMILY_STREET, &FAMILY_BUILDING, &FAMILY_LOCALITY];

    for family in families {
        for pattern in family {
            if let Some(found) = pattern.find(text) {
                return AddressMatch::Pattern(normalize(found.as_str()));
            }
        }
    }

    AddressMatch::Echo(normalize(text))
}

/// Text-only form of [`match_address`]
pub fn extract_address_like(text: &str) -> String {
    match_address(text).into_text()
}
