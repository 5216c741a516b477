//! Lexicon-based sentiment scoring.

use super::{Lexicon, tokenize};
use crate::types::{SentimentLabel, SentimentResult};

/// Scores above this are positive, below its negation negative.
const LABEL_CUTOFF: f64 = 0.2;

pub(super) fn analyze(text: &str, lexicon: &Lexicon) -> SentimentResult {
    let words = tokenize(text);

    let positive_count = words.iter().filter(|w| lexicon.is_positive(w)).count();
    let negative_count = words.iter().filter(|w| lexicon.is_negative(w)).count();

    let matched = positive_count + negative_count;
    let score = if matched == 0 {
        0.0
    } else {
        (positive_count as f64 - negative_count as f64) / matched as f64
    };

    let label = if score > LABEL_CUTOFF {
        SentimentLabel::Positive
    } else if score < -LABEL_CUTOFF {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentResult {
        text: text.to_string(),
        label,
        score,
        positive_count,
        negative_count,
        word_count: words.len(),
    }
}
