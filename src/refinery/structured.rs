// * Structured Data Extraction
// * Reads organization-typed JSON-LD blocks for explicit name/address fields.

use scraper::{Html, Selector};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::record::{Candidate, SourceKind};

static SELECTOR_JSON_LD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Invalid JSON-LD selector")
});

/// Type tags whose blocks describe an entity with an address
const ENTITY_TYPES: &[&str] = &["Organization", "Hospital", "LocalBusiness"];

/// JSON-LD `@type` may be a single tag or a list of tags
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdType {
    Single(String),
    Array(Vec<String>),
    Other(IgnoredAny),
}

impl JsonLdType {
    fn is_entity(&self) -> bool {
        match self {
            JsonLdType::Single(t) => ENTITY_TYPES.contains(&t.as_str()),
            JsonLdType::Array(types) => types.iter().any(|t| ENTITY_TYPES.contains(&t.as_str())),
            JsonLdType::Other(_) => false,
        }
    }
}

/// Partial JSON-LD structure for organization-like blocks.
///
/// Scalar fields stay as raw values: pages publish postal codes as numbers
/// and telephones as arrays, and a bad shape in one field must not lose the
/// whole block.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct JsonLdEntity {
    #[serde(rename = "@type")]
    schema_type: Option<JsonLdType>,
    name: Option<Value>,
    address: Option<JsonLdAddress>,
    telephone: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdAddress {
    Postal(JsonLdPostalAddress),
    Multiple(Vec<JsonLdPostalAddress>),
    // * A bare string or any other shape carries no street-address field
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct JsonLdPostalAddress {
    #[serde(alias = "streetAddress")]
    street_address: Option<Value>,
    #[serde(alias = "addressLocality")]
    address_locality: Option<Value>,
    #[serde(alias = "addressRegion")]
    address_region: Option<Value>,
    #[serde(alias = "postalCode")]
    postal_code: Option<Value>,
}

impl JsonLdAddress {
    fn postal(&self) -> Option<&JsonLdPostalAddress> {
        match self {
            JsonLdAddress::Postal(postal) => Some(postal),
            JsonLdAddress::Multiple(all) => all.first(),
            JsonLdAddress::Other(_) => None,
        }
    }
}

/// Text of a scalar field; numbers are printed, arrays are joined
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Extracts candidates from embedded JSON-LD blocks
#[derive(Debug, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, document: &Html, source_url: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for (block_idx, script) in document.select(&SELECTOR_JSON_LD).enumerate() {
            let json_text = script.text().collect::<String>();

            let value: Value = match serde_json::from_str(json_text.trim()) {
                Ok(value) => value,
                Err(e) => {
                    debug!(block = block_idx + 1, error = %e, "unparseable JSON-LD block skipped");
                    continue;
                }
            };

            let mut nodes = Vec::new();
            collect_nodes(value, &mut nodes);
            candidates.extend(
                nodes
                    .into_iter()
                    .filter_map(|node| node_candidate(node, source_url)),
            );
        }

        info!(count = candidates.len(), "structured candidates extracted");
        candidates
    }
}

/// Flattens top-level arrays and `@graph` containers into individual nodes
fn collect_nodes(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_nodes(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                collect_nodes(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn node_candidate(node: Value, source_url: &str) -> Option<Candidate> {
    let entity: JsonLdEntity = match serde_json::from_value(node) {
        Ok(entity) => entity,
        Err(e) => {
            debug!(error = %e, "JSON-LD node skipped");
            return None;
        }
    };
    if !entity.schema_type.as_ref().is_some_and(JsonLdType::is_entity) {
        return None;
    }

    let name = entity.name.as_ref().and_then(scalar_text)?;
    let postal = entity.address.as_ref().and_then(JsonLdAddress::postal)?;
    let street = postal.street_address.as_ref().and_then(scalar_text)?;

    let mut candidate = Candidate::new(name, street, source_url, SourceKind::Structured);
    let extras = [
        ("addressLocality", &postal.address_locality),
        ("addressRegion", &postal.address_region),
        ("postalCode", &postal.postal_code),
        ("telephone", &entity.telephone),
    ];
    for (key, value) in extras {
        if let Some(text) = value.as_ref().and_then(scalar_text) {
            candidate = candidate.with_extra(key, text);
        }
    }

    Some(candidate)
}
