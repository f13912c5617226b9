//! Essay scoring
//!
//! Three independent scorers each turn linguistic facts into a score in
//! [0, 1] plus typed feedback. The evaluator combines them into one overall
//! score, maps it to grade bands and synthesizes feedback.
//!
//! # Scoring Formula
//!
//! ```text
//! Overall    = round2(Grammar × 0.4 + Vocabulary × 0.3 + Coherence × 0.3)
//!
//! Grammar    = max(0, 1 - matches / words)          (words = 0 → 0)
//! Vocabulary = clamp(0.4 × density + 0.6 × complexity, 0, 1)
//! Coherence  = 0.3 × transitions + 0.4 × paragraphs + 0.3 × topic_consistency
//! ```
//!
//! Weights do not depend on the essay type.
//!
//! # Grade Bands (inclusive lower bounds)
//!
//! | score | CEFR | grade |
//! |-------|------|-------|
//! | 0.9   | C2   | A     |
//! | 0.8   | C1   | B     |
//! | 0.7   | B2   | C     |
//! | 0.6   | B1   | D     |
//! | 0.5   | A2   | F     |
//! | 0.4   | A1   | F     |

mod coherence;
mod feedback;
mod grade;
mod grammar;
mod vocabulary;

pub use coherence::{
    split_paragraphs, CoherenceAnalysis, CoherenceFeedback, CoherenceMetrics, CoherenceScorer,
    ParagraphStructure, TopicFlow, TransitionCategory, TransitionUsage,
};
pub use feedback::synthesize;
pub use grade::{cefr_level, letter_grade, ComponentGrades, GradeBreakdown, GradeEntry};
pub use grammar::{
    GrammarAnalysis, GrammarFeedback, GrammarMetrics, GrammarScorer, SentenceKind,
    SentenceStructure, StructureTypes, TOO_LONG_SENTENCE, UPPERCASE_SENTENCE_START,
};
pub use vocabulary::{
    count_syllables, VocabularyAnalysis, VocabularyFeedback, VocabularyMetrics, VocabularyScorer,
    WordCount,
};

use thiserror::Error;

use crate::models::ComponentScore;
use crate::nlp::ProviderError;

pub const GRAMMAR_WEIGHT: f64 = 0.4;
pub const VOCABULARY_WEIGHT: f64 = 0.3;
pub const COHERENCE_WEIGHT: f64 = 0.3;

/// Errors that abort an evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("evaluation unavailable: {0}")]
    EvaluationUnavailable(#[from] ProviderError),

    #[error("invalid {component} score: {value}")]
    InvalidScore { component: &'static str, value: f64 },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Contract shared by the grammar, vocabulary and coherence scorers
pub trait Scorer: Send + Sync {
    type Feedback: Send;

    /// Component name used in logs and errors
    fn name(&self) -> &'static str;

    /// Score `text` in [0, 1] with feedback.
    ///
    /// Provider failures propagate as [`EvalError::EvaluationUnavailable`];
    /// scorers never retry and never return a partial score.
    fn analyze(&self, text: &str) -> EvalResult<ComponentScore<Self::Feedback>>;
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted overall score, rounded to two decimals
pub fn overall_score(grammar: f64, vocabulary: f64, coherence: f64) -> f64 {
    round2(
        grammar * GRAMMAR_WEIGHT + vocabulary * VOCABULARY_WEIGHT + coherence * COHERENCE_WEIGHT,
    )
}

/// Reject NaN, infinite and out-of-range scores
pub fn check_score(component: &'static str, value: f64) -> EvalResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EvalError::InvalidScore { component, value })
    }
}

/// Arithmetic mean, 0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
