//! Frequency-ranked keyword extraction.

use super::{Lexicon, tokenize};
use crate::types::{Keyword, KeywordResult};
use std::collections::HashMap;

pub(super) fn extract(text: &str, lexicon: &Lexicon, limit: usize) -> KeywordResult {
    let words: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|w| !lexicon.is_stop_word(w))
        .collect();

    // First-seen order is kept so the stable sort breaks ties by it.
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<Keyword> = Vec::new();
    for word in &words {
        match position.get(word.as_str()) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                position.insert(word, counts.len());
                counts.push(Keyword {
                    word: word.clone(),
                    count: 1,
                });
            }
        }
    }

    let unique_words = counts.len();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);

    KeywordResult {
        text: text.to_string(),
        keywords: counts,
        total_words: words.len(),
        unique_words,
    }
}
