// * Keyword tables shared by the classifier, the splitter and the address matcher.
// * Loaded once at startup and only ever read afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static DEFAULT_TABLES: LazyLock<KeywordTables> = LazyLock::new(KeywordTables::builtin);

#[derive(Debug, Error)]
pub enum KeywordLoadError {
    #[error("Failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid keyword file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable keyword sets driving every heuristic in the refinery.
///
/// All entries are lowercase; matching is done against lowercased text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeywordTables {
    /// Header/content keywords marking an entity-name column
    pub entity: Vec<String>,
    /// Header/content keywords marking an address column
    pub address: Vec<String>,
    /// Organization-type words used by the length heuristic
    pub organization: Vec<String>,
    /// Street/locality words used by the length heuristic and first-comma split
    pub locality: Vec<String>,
    /// Major cities/regions accepted as locality evidence
    pub major_cities: Vec<String>,
}

impl KeywordTables {
    fn builtin() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            entity: owned(&[
                "name",
                "entity",
                "hospital",
                "company",
                "organization",
                "institution",
                "center",
                "clinic",
                "bank",
                "insurance",
                "school",
                "college",
                "university",
            ]),
            address: owned(&[
                "address", "location", "place", "area", "street", "road", "city", "state",
                "district", "pin", "postal", "colony", "nagar",
            ]),
            organization: owned(&["hospital", "clinic", "center", "institute", "company", "bank"]),
            locality: owned(&["road", "street", "colony", "nagar", "area", "sector", "phase"]),
            major_cities: owned(&[
                "punjab",
                "delhi",
                "mumbai",
                "bangalore",
                "chennai",
                "kolkata",
                "hyderabad",
                "pune",
                "ahmedabad",
            ]),
        }
    }

    /// Returns the process-wide default tables
    pub fn global() -> &'static KeywordTables {
        &DEFAULT_TABLES
    }

    /// Loads tables from a JSON file; missing keys keep their built-in values
    pub fn from_json_file(path: &Path) -> Result<Self, KeywordLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KeywordLoadError> {
        let mut tables: KeywordTables = serde_json::from_str(raw)?;
        tables.lowercase_all();
        Ok(tables)
    }

    fn lowercase_all(&mut self) {
        for set in [
            &mut self.entity,
            &mut self.address,
            &mut self.organization,
            &mut self.locality,
            &mut self.major_cities,
        ] {
            for word in set.iter_mut() {
                *word = word.to_lowercase();
            }
        }
    }

    /// Locality words followed by the major cities
    pub fn locality_or_city(&self) -> impl Iterator<Item = &str> {
        self.locality
            .iter()
            .chain(self.major_cities.iter())
            .map(String::as_str)
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::builtin()
    }
}

/// True if `haystack` (already lowercased) contains any of `needles`
pub fn contains_any<'a>(haystack: &str, mut needles: impl Iterator<Item = &'a str>) -> bool {
    needles.any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_lowercase() {
        let tables = KeywordTables::global();
        for word in tables.entity.iter().chain(tables.address.iter()) {
            assert_eq!(word, &word.to_lowercase());
        }
        assert!(tables.entity.contains(&"hospital".to_string()));
        assert!(tables.address.contains(&"location".to_string()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tables = KeywordTables::from_json_str(r#"{"entity": ["Pharmacy", "Name"]}"#).unwrap();
        assert_eq!(tables.entity, vec!["pharmacy", "name"]);
        assert_eq!(tables.address, KeywordTables::global().address);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(KeywordTables::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_locality_or_city_includes_both() {
        let tables = KeywordTables::global();
        let words: Vec<&str> = tables.locality_or_city().collect();
        assert!(words.contains(&"road"));
        assert!(words.contains(&"mumbai"));
    }
}
