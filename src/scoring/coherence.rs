//! Coherence scorer
//!
//! Three signals, each in [0, 1]:
//!
//! - transitions: density of transition words per sentence
//! - paragraphs: paragraph length plus an early nominal subject (topic sentence)
//! - topic consistency: noun overlap (Jaccard) between consecutive sentences

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::debug;

use super::{mean, EvalResult, Scorer};
use crate::models::{ComponentScore, ParagraphFact, TaggedDoc, Token};
use crate::nlp::LinguisticFacts;

const TRANSITION_WEIGHT: f64 = 0.3;
const PARAGRAPH_WEIGHT: f64 = 0.4;
const TOPIC_WEIGHT: f64 = 0.3;

/// Transitions expected per sentence for a full transition score
const TRANSITIONS_PER_SENTENCE: f64 = 0.5;
/// Paragraph word count at which the length component saturates
const PARAGRAPH_LENGTH_CAP: f64 = 100.0;
/// Leading tokens searched for a topic-sentence subject
const TOPIC_SUBJECT_WINDOW: usize = 5;

const SUGGESTION_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCategory {
    Addition,
    Contrast,
    CauseEffect,
    Sequence,
    Summary,
}

impl TransitionCategory {
    pub const ALL: [TransitionCategory; 5] = [
        TransitionCategory::Addition,
        TransitionCategory::Contrast,
        TransitionCategory::CauseEffect,
        TransitionCategory::Sequence,
        TransitionCategory::Summary,
    ];

    /// Lowercase entries for this category.
    ///
    /// Matching is per token, so multi-word entries never match.
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            TransitionCategory::Addition => {
                &["furthermore", "moreover", "also", "besides", "in addition"]
            }
            TransitionCategory::Contrast => {
                &["however", "nevertheless", "on the other hand", "conversely"]
            }
            TransitionCategory::CauseEffect => {
                &["therefore", "thus", "consequently", "as a result"]
            }
            TransitionCategory::Sequence => &["first", "second", "finally", "next", "then"],
            TransitionCategory::Summary => {
                &["in conclusion", "to summarize", "overall", "in brief"]
            }
        }
    }

    pub fn of(word: &str) -> Option<TransitionCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.words().contains(&word))
    }
}

/// Transition tokens found per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionUsage {
    pub addition: usize,
    pub contrast: usize,
    pub cause_effect: usize,
    pub sequence: usize,
    pub summary: usize,
}

impl TransitionUsage {
    pub fn from_doc(doc: &TaggedDoc) -> Self {
        let mut usage = Self::default();
        for token in doc.tokens() {
            if let Some(category) = TransitionCategory::of(&token.text.to_lowercase()) {
                *usage.slot(category) += 1;
            }
        }
        usage
    }

    fn slot(&mut self, category: TransitionCategory) -> &mut usize {
        match category {
            TransitionCategory::Addition => &mut self.addition,
            TransitionCategory::Contrast => &mut self.contrast,
            TransitionCategory::CauseEffect => &mut self.cause_effect,
            TransitionCategory::Sequence => &mut self.sequence,
            TransitionCategory::Summary => &mut self.summary,
        }
    }

    pub fn total(&self) -> usize {
        self.addition + self.contrast + self.cause_effect + self.sequence + self.summary
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphStructure {
    pub total_paragraphs: usize,
    pub avg_length: f64,
    /// Population standard deviation of paragraph word counts
    pub length_variation: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopicFlow {
    pub topic_shifts: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoherenceMetrics {
    pub transition_score: f64,
    pub paragraph_score: f64,
    pub topic_consistency: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoherenceAnalysis {
    pub transitions: TransitionUsage,
    pub paragraph_structure: ParagraphStructure,
    pub topic_flow: TopicFlow,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoherenceFeedback {
    pub metrics: CoherenceMetrics,
    pub analysis: CoherenceAnalysis,
    pub suggestions: Vec<String>,
}

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

/// A line break, an optional whitespace-only line, and another line break
fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| {
        Regex::new(r"\n[ \t\r\f\v]*\n").expect("valid paragraph regex")
    })
}

/// Split on blank lines; segments are trimmed and empty ones dropped
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Noun texts of one sentence
fn noun_set(tokens: &[Token]) -> FxHashSet<&str> {
    tokens
        .iter()
        .filter(|t| t.is_noun())
        .map(|t| t.text.as_str())
        .collect()
}

fn transition_score(doc: &TaggedDoc, usage: &TransitionUsage) -> f64 {
    let sentences = doc.sentence_count();
    if sentences == 0 {
        return 0.0;
    }
    (usage.total() as f64 / (sentences as f64 * TRANSITIONS_PER_SENTENCE)).min(1.0)
}

fn paragraph_score(paragraphs: &[ParagraphFact]) -> f64 {
    let scores: Vec<f64> = paragraphs
        .iter()
        .map(|p| {
            let length = (p.word_count as f64 / PARAGRAPH_LENGTH_CAP).min(1.0);
            let has_topic_sentence = p
                .doc
                .tokens()
                .take(TOPIC_SUBJECT_WINDOW)
                .any(|t| t.dep == "nsubj");
            length * 0.4 + if has_topic_sentence { 0.6 } else { 0.0 }
        })
        .collect();
    mean(&scores)
}

fn topic_consistency(doc: &TaggedDoc) -> f64 {
    let topics: Vec<FxHashSet<&str>> = doc
        .sentences
        .iter()
        .map(|s| noun_set(&s.tokens))
        .filter(|set| !set.is_empty())
        .collect();

    let overlaps: Vec<f64> = topics
        .windows(2)
        .map(|pair| {
            let shared = pair[0].intersection(&pair[1]).count();
            let union = pair[0].union(&pair[1]).count();
            shared as f64 / union as f64
        })
        .collect();
    mean(&overlaps)
}

/// Consecutive sentences whose noun sets are both non-empty and disjoint
fn topic_shifts(doc: &TaggedDoc) -> usize {
    let mut shifts = 0;
    let mut previous: FxHashSet<&str> = FxHashSet::default();
    for sentence in &doc.sentences {
        let current = noun_set(&sentence.tokens);
        if !current.is_empty() && !previous.is_empty() && current.is_disjoint(&previous) {
            shifts += 1;
        }
        previous = current;
    }
    shifts
}

fn paragraph_structure(paragraphs: &[ParagraphFact]) -> ParagraphStructure {
    let lengths: Vec<f64> = paragraphs.iter().map(|p| p.word_count as f64).collect();
    let avg_length = mean(&lengths);
    let variance = mean(
        &lengths
            .iter()
            .map(|l| (l - avg_length).powi(2))
            .collect::<Vec<_>>(),
    );
    ParagraphStructure {
        total_paragraphs: paragraphs.len(),
        avg_length,
        length_variation: variance.sqrt(),
    }
}

fn suggestions(metrics: &CoherenceMetrics) -> Vec<String> {
    let gated: [(f64, [&str; 2]); 3] = [
        (
            metrics.transition_score,
            [
                "Use more transition words to connect ideas",
                "Consider adding words like 'however', 'therefore', 'furthermore'",
            ],
        ),
        (
            metrics.paragraph_score,
            [
                "Ensure each paragraph has a clear topic sentence",
                "Maintain consistent paragraph lengths",
            ],
        ),
        (
            metrics.topic_consistency,
            [
                "Work on maintaining better topic flow between sentences",
                "Ensure ideas are logically connected",
            ],
        ),
    ];

    gated
        .iter()
        .filter(|(score, _)| *score < SUGGESTION_THRESHOLD)
        .flat_map(|(_, messages)| messages.iter().map(|m| m.to_string()))
        .collect()
}

pub struct CoherenceScorer {
    facts: Arc<dyn LinguisticFacts>,
}

impl CoherenceScorer {
    pub fn new(facts: Arc<dyn LinguisticFacts>) -> Self {
        Self { facts }
    }

    fn tag_paragraphs(&self, text: &str) -> EvalResult<Vec<ParagraphFact>> {
        split_paragraphs(text)
            .into_iter()
            .map(|p| -> EvalResult<ParagraphFact> {
                Ok(ParagraphFact::new(p, self.facts.tag(p)?))
            })
            .collect()
    }
}

impl Scorer for CoherenceScorer {
    type Feedback = CoherenceFeedback;

    fn name(&self) -> &'static str {
        "coherence"
    }

    fn analyze(&self, text: &str) -> EvalResult<ComponentScore<CoherenceFeedback>> {
        let doc = self.facts.tag(text)?;
        let paragraphs = self.tag_paragraphs(text)?;

        let transitions = TransitionUsage::from_doc(&doc);
        let metrics = CoherenceMetrics {
            transition_score: transition_score(&doc, &transitions),
            paragraph_score: paragraph_score(&paragraphs),
            topic_consistency: topic_consistency(&doc),
        };
        let score = metrics.transition_score * TRANSITION_WEIGHT
            + metrics.paragraph_score * PARAGRAPH_WEIGHT
            + metrics.topic_consistency * TOPIC_WEIGHT;

        debug!(
            "coherence: transitions {:.3}, paragraphs {:.3} ({}), topics {:.3}, score {:.3}",
            metrics.transition_score,
            metrics.paragraph_score,
            paragraphs.len(),
            metrics.topic_consistency,
            score
        );

        let suggestions = suggestions(&metrics);
        Ok(ComponentScore::new(
            score,
            CoherenceFeedback {
                analysis: CoherenceAnalysis {
                    transitions,
                    paragraph_structure: paragraph_structure(&paragraphs),
                    topic_flow: TopicFlow {
                        topic_shifts: topic_shifts(&doc),
                    },
                },
                metrics,
                suggestions,
            },
        ))
    }
}
