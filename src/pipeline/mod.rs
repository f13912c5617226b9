//! Evaluation pipeline
//!
//! Orchestrates one evaluation:
//! 1. Wrap the provider in a request-scoped memo
//! 2. Run the grammar, vocabulary and coherence scorers in parallel
//! 3. Validate component scores
//! 4. Combine into the weighted overall score
//! 5. Map to CEFR level and letter grade
//! 6. Synthesize overall feedback

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::{ComponentScore, DetailedAnalysis, EssayType, EvaluationResult};
use crate::nlp::{LinguisticFacts, MemoFacts};
use crate::scoring::{
    cefr_level, check_score, letter_grade, overall_score, synthesize, CoherenceScorer,
    EvalResult, GradeBreakdown, GrammarScorer, Scorer, VocabularyScorer,
};

/// Stateless essay evaluator; safe to share across threads and requests.
pub struct Evaluator {
    facts: Arc<dyn LinguisticFacts>,
}

impl Evaluator {
    pub fn new(facts: Arc<dyn LinguisticFacts>) -> Self {
        Self { facts }
    }

    /// Name of the underlying provider
    pub fn provider(&self) -> &'static str {
        self.facts.name()
    }

    /// Evaluate one essay.
    ///
    /// All three scorers must succeed; the first failure (in the order
    /// grammar, vocabulary, coherence) aborts with no partial result.
    /// `essay_type` is recorded but does not change the weights.
    pub fn evaluate(&self, text: &str, essay_type: EssayType) -> EvalResult<EvaluationResult> {
        let start = Instant::now();
        let memo: Arc<dyn LinguisticFacts> = Arc::new(MemoFacts::new(self.facts.clone()));

        let grammar = GrammarScorer::new(memo.clone());
        let vocabulary = VocabularyScorer::new(memo.clone());
        let coherence = CoherenceScorer::new(memo);

        let (grammar_result, (vocabulary_result, coherence_result)) = rayon::join(
            || run_scorer(&grammar, text),
            || {
                rayon::join(
                    || run_scorer(&vocabulary, text),
                    || run_scorer(&coherence, text),
                )
            },
        );
        let detailed = DetailedAnalysis {
            grammar: grammar_result?,
            vocabulary: vocabulary_result?,
            coherence: coherence_result?,
        };

        let (g, v, c) = (
            detailed.grammar.score,
            detailed.vocabulary.score,
            detailed.coherence.score,
        );
        let overall = overall_score(g, v, c);
        let result = EvaluationResult {
            overall_score: overall,
            cefr_level: cefr_level(overall)?,
            letter_grade: letter_grade(overall)?,
            feedback: synthesize(g, v, c),
            detailed_analysis: detailed,
        };

        info!(
            essay_type = essay_type.as_str(),
            provider = self.facts.name(),
            grammar = g,
            vocabulary = v,
            coherence = c,
            overall = result.overall_score,
            cefr = %result.cefr_level,
            grade = %result.letter_grade,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "essay evaluated"
        );

        Ok(result)
    }

    /// Grade table for the component scores of a finished evaluation
    pub fn breakdown(result: &EvaluationResult) -> EvalResult<GradeBreakdown> {
        let analysis = &result.detailed_analysis;
        GradeBreakdown::from_scores(
            analysis.grammar.score,
            analysis.vocabulary.score,
            analysis.coherence.score,
        )
    }
}

/// Run one scorer and reject non-finite or out-of-range scores
fn run_scorer<S: Scorer>(scorer: &S, text: &str) -> EvalResult<ComponentScore<S::Feedback>> {
    let start = Instant::now();
    let result = scorer.analyze(text)?;
    check_score(scorer.name(), result.score)?;
    debug!(
        "{} scorer finished in {:?}: {:.4}",
        scorer.name(),
        start.elapsed(),
        result.score
    );
    Ok(result)
}
