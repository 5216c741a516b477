//! Pattern-based date and number extraction.

use crate::types::{Entities, EntityResult};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{1,2} (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{2,4})\b",
    )
    .expect("Invalid regex: date")
});

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?%?\b").expect("Invalid regex: number"));

fn matches(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(super) fn extract(text: &str) -> EntityResult {
    let entities = Entities {
        dates: matches(&DATE_PATTERN, text),
        numbers: matches(&NUMBER_PATTERN, text),
    };
    let entity_count = entities.dates.len() + entities.numbers.len();

    EntityResult {
        text: text.to_string(),
        entities,
        entity_count,
    }
}
