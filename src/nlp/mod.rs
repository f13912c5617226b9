//! Linguistic facts provider
//!
//! Tokenization, tagging, dependency parsing, sentence segmentation, grammar
//! rule checking and word-sense lookup all come from an external provider.
//! Scorers only see the [`LinguisticFacts`] trait, so the provider can be:
//!
//! - [`HttpFacts`]: a remote NLP service over JSON/HTTP (sync, via ureq)
//! - [`RecordedFacts`]: facts replayed from a JSON file (offline runs, tests)
//! - [`MemoFacts`]: a request-scoped memo in front of either of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use essay_eval::nlp::{HttpFacts, LinguisticFacts};
//!
//! let facts: Arc<dyn LinguisticFacts> =
//!     Arc::new(HttpFacts::new("http://localhost:8010", Duration::from_secs(30)));
//! let doc = facts.tag("I like cats.")?;
//! ```

mod client;
mod memo;
mod recorded;

pub use client::{HttpFacts, DEFAULT_LANGUAGE};
pub use memo::MemoFacts;
pub use recorded::RecordedFacts;

use rustc_hash::FxHashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{GrammarMatch, TaggedDoc};

/// Errors raised while obtaining linguistic facts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("linguistic facts provider unreachable: {0}")]
    Unreachable(String),

    #[error("linguistic facts provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("linguistic facts provider error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("no recorded facts for {0}")]
    MissingFacts(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of tagged tokens, grammar matches and sense counts.
///
/// Implementations must be safe to share across the scorer threads of one
/// evaluation. Calls may block on I/O; they should be bounded by a timeout
/// and never retried internally.
pub trait LinguisticFacts: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Tokenize, tag and sentence-split `text`
    fn tag(&self, text: &str) -> ProviderResult<TaggedDoc>;

    /// Run the grammar checker; matches come back in checker order
    fn check_grammar(&self, text: &str) -> ProviderResult<Vec<GrammarMatch>>;

    /// Number of dictionary senses for `word` (0 when unknown)
    fn sense_count(&self, word: &str) -> ProviderResult<usize>;

    /// Sense counts for many words at once.
    ///
    /// Defaults to one `sense_count` call per word; remote providers
    /// override this with a single batched request.
    fn sense_counts(&self, words: &[&str]) -> ProviderResult<FxHashMap<String, usize>> {
        words
            .iter()
            .map(|w| Ok(((*w).to_string(), self.sense_count(w)?)))
            .collect()
    }

    /// Liveness probe
    fn health(&self) -> ProviderResult<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared provider fixtures for unit tests

    use super::*;
    use crate::models::{SentenceFact, Token};

    /// Build a sentence from `(text, pos, dep)` triples
    pub(crate) fn sentence(tokens: &[(&str, &str, &str)]) -> SentenceFact {
        SentenceFact::new(
            tokens
                .iter()
                .map(|(text, pos, dep)| Token::new(*text, *pos, *dep))
                .collect(),
        )
    }

    pub(crate) const CATS_AND_DOGS: &str = "I like cats. I like dogs too.";

    pub(crate) fn cats_and_dogs_doc() -> TaggedDoc {
        TaggedDoc::new(vec![
            sentence(&[
                ("I", "PRON", "nsubj"),
                ("like", "VERB", "ROOT"),
                ("cats", "NOUN", "dobj"),
                (".", "PUNCT", "punct"),
            ]),
            sentence(&[
                ("I", "PRON", "nsubj"),
                ("like", "VERB", "ROOT"),
                ("dogs", "NOUN", "dobj"),
                ("too", "ADV", "advmod"),
                (".", "PUNCT", "punct"),
            ]),
        ])
    }

    /// Two sentences, one paragraph, no grammar matches, one sense per word
    pub(crate) fn cats_and_dogs() -> RecordedFacts {
        ["i", "like", "cats", "dogs", "too"].into_iter().fold(
            RecordedFacts::new().with_document(CATS_AND_DOGS, cats_and_dogs_doc()),
            |facts, word| facts.with_senses(word, 1),
        )
    }

    /// Provider that is never reachable
    pub(crate) struct OfflineFacts;

    impl LinguisticFacts for OfflineFacts {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn tag(&self, _text: &str) -> ProviderResult<TaggedDoc> {
            Err(ProviderError::Unreachable("connection refused".into()))
        }

        fn check_grammar(&self, _text: &str) -> ProviderResult<Vec<GrammarMatch>> {
            Err(ProviderError::Unreachable("connection refused".into()))
        }

        fn sense_count(&self, _word: &str) -> ProviderResult<usize> {
            Err(ProviderError::Timeout(Duration::from_secs(1)))
        }

        fn health(&self) -> ProviderResult<()> {
            Err(ProviderError::Unreachable("connection refused".into()))
        }
    }
}
