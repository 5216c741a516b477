//! Word lists used by sentiment scoring and keyword extraction.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "outstanding", "fantastic", "wonderful", "best",
    "better", "positive", "happy", "love", "like", "satisfied", "enjoy", "perfect", "recommend",
    "recommended", "easy", "awesome", "helpful", "impressive", "impressed",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "horrible", "worst", "worse", "negative", "disappointed",
    "disappointing", "difficult", "hard", "not", "never", "hate", "dislike", "problem", "issue",
    "complaint", "unhappy", "unsatisfied", "unfortunately", "expensive", "overpriced",
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "have", "has", "had",
    "do", "does", "did", "of", "for", "in", "on", "at", "to", "from", "with", "by", "about", "as",
    "into", "like", "through", "after", "before", "between", "without", "because", "during",
    "this", "that", "these", "those", "it", "they", "them", "their", "he", "she", "his", "her",
];

// Built once, shared read-only by every analyzer.
static ENGLISH: Lazy<Arc<Lexicon>> =
    Lazy::new(|| Arc::new(Lexicon::new(POSITIVE_WORDS, NEGATIVE_WORDS, STOP_WORDS)));

/// Immutable vocabularies for one language. Words are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    stop_words: HashSet<String>,
}

fn lowercase_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect()
}

impl Lexicon {
    pub fn new<P, N, W, S>(positive: P, negative: N, stop_words: W) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positive: lowercase_set(positive),
            negative: lowercase_set(negative),
            stop_words: lowercase_set(stop_words),
        }
    }

    /// The built-in English vocabularies.
    pub fn english() -> Arc<Lexicon> {
        Arc::clone(&ENGLISH)
    }

    pub fn is_positive(&self, word: &str) -> bool {
        self.positive.contains(word)
    }

    pub fn is_negative(&self, word: &str) -> bool {
        self.negative.contains(word)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon::clone(&ENGLISH)
    }
}
