// * Text Normalizer
// * Every piece of text read from a page goes through `normalize` before it is
// * inspected or stored.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// * Named, decimal and hex character references; the trailing ';' is required
static PATTERN_HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]{2,8}));")
        .expect("Invalid HTML entity regex")
});

/// Punctuation kept by the normalizer besides letters, digits and spaces
const ALLOWED_PUNCTUATION: &[char] = &['-', '.', ',', '(', ')', '&'];

/// Cleans raw extracted text.
///
/// Decodes HTML character references, turns every run of whitespace or
/// control characters (non-breaking spaces included) into one ASCII space,
/// drops characters outside letters, digits and `- . , ( ) &`, and trims.
/// Never fails; empty input gives empty output.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = decode_entities(text);
    let mut out = String::with_capacity(decoded.len());
    let mut pending_space = false;

    for ch in decoded.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if !is_allowed(ch) {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}

fn is_allowed(ch: char) -> bool {
    ch.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(&ch)
}

/// Replaces HTML character references with the characters they name.
/// Unknown names are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    PATTERN_HTML_ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };

            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        _ => None,
    }
}
