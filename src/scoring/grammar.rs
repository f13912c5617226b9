//! Grammar scorer
//!
//! Scores grammatical correctness from grammar-checker matches relative to
//! the number of words, and classifies sentence structure by counting
//! subordinating markers (dependency label `mark`).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{EvalResult, Scorer};
use crate::models::{ComponentScore, GrammarMatch, SentenceFact, TaggedDoc};
use crate::nlp::LinguisticFacts;

/// Checker rule flagging overly long sentences
pub const TOO_LONG_SENTENCE: &str = "TOO_LONG_SENTENCE";
/// Checker rule flagging a lowercase sentence start
pub const UPPERCASE_SENTENCE_START: &str = "UPPERCASE_SENTENCE_START";

/// Structural class of a sentence, by number of `mark` tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Simple,
    Compound,
    Complex,
}

impl SentenceKind {
    pub fn classify(sentence: &SentenceFact) -> Self {
        match sentence.count_dep("mark") {
            0 => SentenceKind::Simple,
            1 => SentenceKind::Compound,
            _ => SentenceKind::Complex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureTypes {
    pub simple: usize,
    pub compound: usize,
    pub complex: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentenceStructure {
    pub total_sentences: usize,
    /// Mean tokens per sentence, punctuation included
    pub avg_length: f64,
    pub structure_types: StructureTypes,
}

impl SentenceStructure {
    pub fn from_doc(doc: &TaggedDoc) -> Self {
        let mut types = StructureTypes::default();
        for sentence in &doc.sentences {
            match SentenceKind::classify(sentence) {
                SentenceKind::Simple => types.simple += 1,
                SentenceKind::Compound => types.compound += 1,
                SentenceKind::Complex => types.complex += 1,
            }
        }

        let total = doc.sentence_count();
        let avg_length = if total == 0 {
            0.0
        } else {
            doc.sentences.iter().map(SentenceFact::len).sum::<usize>() as f64 / total as f64
        };

        Self {
            total_sentences: total,
            avg_length,
            structure_types: types,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrammarMetrics {
    pub error_count: usize,
    pub word_count: usize,
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrammarAnalysis {
    /// Checker matches, verbatim and in checker order
    pub error_details: Vec<GrammarMatch>,
    pub sentence_structure: SentenceStructure,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrammarFeedback {
    pub metrics: GrammarMetrics,
    pub analysis: GrammarAnalysis,
    pub suggestions: Vec<String>,
}

pub struct GrammarScorer {
    facts: Arc<dyn LinguisticFacts>,
}

impl GrammarScorer {
    pub fn new(facts: Arc<dyn LinguisticFacts>) -> Self {
        Self { facts }
    }

    fn suggestions(matches: &[GrammarMatch], structure: &SentenceStructure) -> Vec<String> {
        let has_rule = |rule: &str| matches.iter().any(|m| m.rule_id == rule);
        let mut suggestions = Vec::new();

        if has_rule(TOO_LONG_SENTENCE) {
            suggestions.push("Consider breaking down long sentences into shorter ones".to_string());
        }
        if has_rule(UPPERCASE_SENTENCE_START) {
            suggestions.push("Ensure all sentences start with a capital letter".to_string());
        }
        let types = &structure.structure_types;
        if types.simple > types.complex {
            suggestions.push(
                "Try using more complex sentence structures to improve writing style".to_string(),
            );
        }
        suggestions
    }
}

impl Scorer for GrammarScorer {
    type Feedback = GrammarFeedback;

    fn name(&self) -> &'static str {
        "grammar"
    }

    fn analyze(&self, text: &str) -> EvalResult<ComponentScore<GrammarFeedback>> {
        let matches = self.facts.check_grammar(text)?;
        let doc = self.facts.tag(text)?;

        let word_count = doc.word_count();
        // No words saturates the rate, so very short texts score 0
        let error_rate = if word_count == 0 {
            1.0
        } else {
            matches.len() as f64 / word_count as f64
        };
        let score = (1.0 - error_rate).max(0.0);

        let structure = SentenceStructure::from_doc(&doc);
        let suggestions = Self::suggestions(&matches, &structure);

        debug!(
            "grammar: {} matches over {} words, rate {:.3}, score {:.3}",
            matches.len(),
            word_count,
            error_rate,
            score
        );

        Ok(ComponentScore::new(
            score,
            GrammarFeedback {
                metrics: GrammarMetrics {
                    error_count: matches.len(),
                    word_count,
                    error_rate,
                },
                analysis: GrammarAnalysis {
                    error_details: matches,
                    sentence_structure: structure,
                },
                suggestions,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::{cats_and_dogs, sentence, OfflineFacts, CATS_AND_DOGS};
    use crate::nlp::{ProviderError, RecordedFacts};
    use crate::scoring::EvalError;

    fn grammar_match(rule_id: &str, offset: usize) -> GrammarMatch {
        GrammarMatch {
            rule_id: rule_id.to_string(),
            message: format!("{} message", rule_id),
            context: "...".to_string(),
            offset,
            length: 3,
        }
    }

    #[test]
    fn test_clean_text_scores_full_marks() {
        let scorer = GrammarScorer::new(Arc::new(cats_and_dogs()));
        let result = scorer.analyze(CATS_AND_DOGS).unwrap();

        assert_eq!(result.score, 1.0);
        assert_eq!(result.feedback.metrics.word_count, 7);
        assert_eq!(result.feedback.metrics.error_count, 0);
        assert_eq!(result.feedback.metrics.error_rate, 0.0);

        let structure = &result.feedback.analysis.sentence_structure;
        assert_eq!(structure.total_sentences, 2);
        assert_eq!(structure.avg_length, 4.5);
        assert_eq!(structure.structure_types.simple, 2);
        assert_eq!(
            result.feedback.suggestions,
            vec!["Try using more complex sentence structures to improve writing style"]
        );
    }

    #[test]
    fn test_matches_lower_score_and_keep_order() {
        let facts = cats_and_dogs().with_matches(
            CATS_AND_DOGS,
            vec![
                grammar_match(UPPERCASE_SENTENCE_START, 13),
                grammar_match(TOO_LONG_SENTENCE, 0),
            ],
        );
        let result = GrammarScorer::new(Arc::new(facts))
            .analyze(CATS_AND_DOGS)
            .unwrap();

        assert!((result.score - (1.0 - 2.0 / 7.0)).abs() < 1e-12);
        let details = &result.feedback.analysis.error_details;
        assert_eq!(details[0].rule_id, UPPERCASE_SENTENCE_START);
        assert_eq!(details[1].offset, 0);
        assert_eq!(
            result.feedback.suggestions,
            vec![
                "Consider breaking down long sentences into shorter ones",
                "Ensure all sentences start with a capital letter",
                "Try using more complex sentence structures to improve writing style",
            ]
        );
    }

    #[test]
    fn test_more_errors_than_words_floors_at_zero() {
        let text = "Go.";
        let facts = RecordedFacts::new()
            .with_document(
                text,
                TaggedDoc::new(vec![sentence(&[("Go", "VERB", "ROOT"), (".", "PUNCT", "punct")])]),
            )
            .with_matches(text, vec![grammar_match("A", 0), grammar_match("B", 1)]);
        let result = GrammarScorer::new(Arc::new(facts)).analyze(text).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.feedback.metrics.error_rate, 2.0);
    }

    #[test]
    fn test_empty_text_saturates_error_rate() {
        let result = GrammarScorer::new(Arc::new(RecordedFacts::new()))
            .analyze("")
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.feedback.metrics.error_rate, 1.0);
        assert_eq!(result.feedback.analysis.sentence_structure.avg_length, 0.0);
        assert!(result.feedback.suggestions.is_empty());
    }

    #[test]
    fn test_sentence_classification() {
        let simple = sentence(&[("Cats", "NOUN", "nsubj"), ("sleep", "VERB", "ROOT")]);
        let compound = sentence(&[
            ("I", "PRON", "nsubj"),
            ("stay", "VERB", "ROOT"),
            ("because", "SCONJ", "mark"),
            ("it", "PRON", "nsubj"),
            ("rains", "VERB", "advcl"),
        ]);
        let complex = sentence(&[
            ("If", "SCONJ", "mark"),
            ("it", "PRON", "nsubj"),
            ("rains", "VERB", "advcl"),
            ("I", "PRON", "nsubj"),
            ("stay", "VERB", "ROOT"),
            ("because", "SCONJ", "mark"),
            ("I", "PRON", "nsubj"),
            ("must", "AUX", "aux"),
        ]);
        assert_eq!(SentenceKind::classify(&simple), SentenceKind::Simple);
        assert_eq!(SentenceKind::classify(&compound), SentenceKind::Compound);
        assert_eq!(SentenceKind::classify(&complex), SentenceKind::Complex);

        let structure = SentenceStructure::from_doc(&TaggedDoc::new(vec![compound, complex]));
        assert_eq!(structure.structure_types.compound, 1);
        assert_eq!(structure.structure_types.complex, 1);
        assert_eq!(structure.structure_types.simple, 0);
    }

    #[test]
    fn test_provider_failure_is_unavailable() {
        let err = GrammarScorer::new(Arc::new(OfflineFacts))
            .analyze(CATS_AND_DOGS)
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::EvaluationUnavailable(ProviderError::Unreachable(
                "connection refused".into()
            ))
        );
    }
}
