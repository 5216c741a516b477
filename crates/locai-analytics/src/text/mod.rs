//! Lightweight text analysis: sentiment, keywords and entities.
//!
//! All three modes are dictionary or pattern based. Sentiment and keyword
//! extraction share one tokenizer: the text is lowercased, split on
//! anything that is not an ASCII letter, digit or underscore, and tokens of
//! two characters or fewer are dropped.

mod entities;
mod keywords;
mod lexicon;
mod sentiment;

pub use lexicon::Lexicon;

use crate::config::{TextConfig, TextMethod};
use crate::types::TextAnalysis;
use std::sync::Arc;
use tracing::debug;

/// Tokens shorter than this are ignored.
const MIN_TOKEN_LEN: usize = 3;

/// Lowercased word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Runs one analysis mode against a shared [`Lexicon`].
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    config: TextConfig,
    lexicon: Arc<Lexicon>,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(TextConfig::default())
    }
}

impl TextAnalyzer {
    /// Analyzer using the built-in English vocabularies.
    pub fn new(config: TextConfig) -> Self {
        Self::with_lexicon(config, Lexicon::english())
    }

    pub fn with_lexicon(config: TextConfig, lexicon: Arc<Lexicon>) -> Self {
        Self { config, lexicon }
    }

    pub fn analyze(&self, text: &str) -> TextAnalysis {
        debug!(
            "Text analysis ({:?}) over {} chars",
            self.config.method,
            text.len()
        );

        match self.config.method {
            TextMethod::Sentiment => TextAnalysis::Sentiment(sentiment::analyze(text, &self.lexicon)),
            TextMethod::Keywords => {
                TextAnalysis::Keywords(keywords::extract(text, &self.lexicon, self.config.limit))
            }
            TextMethod::Entities => TextAnalysis::Entities(entities::extract(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;

    static_assertions::assert_impl_all!(Lexicon: Send, Sync);
    static_assertions::assert_impl_all!(TextAnalyzer: Send, Sync);

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Great service!! Staff_member was ok; café"),
            vec!["great", "service", "staff_member", "was", "caf"]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_dispatches_by_method() {
        let text = "Excellent pastries, 20% off on 01/02/2025";

        let sentiment = TextAnalyzer::default().analyze(text);
        assert!(matches!(
            sentiment,
            TextAnalysis::Sentiment(ref r) if r.label == SentimentLabel::Positive
        ));

        let keywords = TextAnalyzer::new(TextConfig::new(TextMethod::Keywords)).analyze(text);
        assert!(matches!(keywords, TextAnalysis::Keywords(ref r) if !r.keywords.is_empty()));

        let entities = TextAnalyzer::new(TextConfig::new(TextMethod::Entities)).analyze(text);
        match entities {
            TextAnalysis::Entities(r) => assert_eq!(r.entities.dates, vec!["01/02/2025"]),
            other => panic!("unexpected analysis: {other:?}"),
        }
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Arc::new(Lexicon::new(["tasty"], ["stale"], Vec::<&str>::new()));
        let analyzer = TextAnalyzer::with_lexicon(TextConfig::default(), lexicon);

        match analyzer.analyze("stale bread, stale cake, tasty tea") {
            TextAnalysis::Sentiment(r) => {
                assert_eq!(r.negative_count, 2);
                assert_eq!(r.label, SentimentLabel::Negative);
            }
            other => panic!("unexpected analysis: {other:?}"),
        }
    }
}
