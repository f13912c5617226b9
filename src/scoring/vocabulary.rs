//! Vocabulary scorer
//!
//! Combines lexical diversity (distinct words over total words) with a word
//! complexity estimate built from syllables, dictionary sense counts and
//! word length.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{mean, EvalResult, Scorer};
use crate::models::ComponentScore;
use crate::nlp::LinguisticFacts;

const DENSITY_WEIGHT: f64 = 0.4;
const COMPLEXITY_WEIGHT: f64 = 0.6;

const SYLLABLE_WEIGHT: f64 = 0.3;
const SENSE_WEIGHT: f64 = 0.4;
const LENGTH_WEIGHT: f64 = 0.3;
/// Word length at which the length component saturates
const LENGTH_CAP: f64 = 12.0;

const MOST_COMMON_LIMIT: usize = 10;
const HIGH_FREQUENCY_MIN: usize = 4;

const VOWELS: &str = "aeiouy";

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Estimate syllables by counting vowel groups.
///
/// A trailing `e` is silent unless it closes a consonant + `le` ending
/// (`apple`, `table`). Never returns less than 1.
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.to_lowercase().chars().collect();

    let mut count = chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| is_vowel(c) && (i == 0 || !is_vowel(chars[i - 1])))
        .count();

    let n = chars.len();
    if n > 0 && chars[n - 1] == 'e' {
        let consonant_le = n >= 3 && chars[n - 2] == 'l' && !is_vowel(chars[n - 3]);
        if !consonant_le {
            count = count.saturating_sub(1);
        }
    }

    count.max(1)
}

fn word_complexity(word: &str, senses: usize) -> f64 {
    let length = (word.chars().count() as f64 / LENGTH_CAP).min(1.0);
    count_syllables(word) as f64 * SYLLABLE_WEIGHT
        + senses as f64 * SENSE_WEIGHT
        + length * LENGTH_WEIGHT
}

/// A word with its number of occurrences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyMetrics {
    pub total_words: usize,
    pub unique_words: usize,
    pub vocabulary_density: f64,
    /// Mean complexity of words with at least one sense; not clamped
    pub complexity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyAnalysis {
    /// Top words by frequency, ties in first-occurrence order
    pub most_common: Vec<WordCount>,
    pub high_frequency_words: Vec<String>,
    pub unique_word_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyFeedback {
    pub metrics: VocabularyMetrics,
    pub analysis: VocabularyAnalysis,
    pub suggestions: Vec<String>,
}

/// Occurrence counts in first-seen order
fn frequencies(words: &[String]) -> Vec<WordCount> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut counts: Vec<WordCount> = Vec::new();
    for word in words {
        match index.get(word.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(word.as_str(), counts.len());
                counts.push(WordCount {
                    word: word.clone(),
                    count: 1,
                });
            }
        }
    }
    counts
}

pub struct VocabularyScorer {
    facts: Arc<dyn LinguisticFacts>,
}

impl VocabularyScorer {
    pub fn new(facts: Arc<dyn LinguisticFacts>) -> Self {
        Self { facts }
    }
}

impl Scorer for VocabularyScorer {
    type Feedback = VocabularyFeedback;

    fn name(&self) -> &'static str {
        "vocabulary"
    }

    fn analyze(&self, text: &str) -> EvalResult<ComponentScore<VocabularyFeedback>> {
        let doc = self.facts.tag(text)?;
        let words: Vec<String> = doc
            .tokens()
            .filter(|t| t.is_alpha())
            .map(|t| t.text.to_lowercase())
            .collect();

        let mut frequency = frequencies(&words);
        let total_words = words.len();
        let unique_words = frequency.len();
        let density = if total_words == 0 {
            0.0
        } else {
            unique_words as f64 / total_words as f64
        };

        let distinct: Vec<&str> = frequency.iter().map(|wc| wc.word.as_str()).collect();
        let senses = self.facts.sense_counts(&distinct)?;

        let complexities: Vec<f64> = words
            .iter()
            .filter_map(|w| match senses.get(w).copied().unwrap_or(0) {
                0 => None,
                n => Some(word_complexity(w, n)),
            })
            .collect();
        let complexity_score = mean(&complexities);

        let score =
            (density * DENSITY_WEIGHT + complexity_score * COMPLEXITY_WEIGHT).clamp(0.0, 1.0);

        // Stable sort keeps first-occurrence order among equal counts
        frequency.sort_by(|a, b| b.count.cmp(&a.count));
        frequency.truncate(MOST_COMMON_LIMIT);
        let high_frequency_words = frequency
            .iter()
            .filter(|wc| wc.count >= HIGH_FREQUENCY_MIN)
            .map(|wc| wc.word.clone())
            .collect();

        let mut suggestions = Vec::new();
        if score < 0.6 {
            suggestions.push("Try using more diverse vocabulary".to_string());
            suggestions.push("Consider using synonyms to avoid repetition".to_string());
        }
        if density < 0.5 {
            suggestions.push("Work on expanding your vocabulary range".to_string());
        }

        debug!(
            "vocabulary: {} words, {} unique, density {:.3}, complexity {:.3}, score {:.3}",
            total_words, unique_words, density, complexity_score, score
        );

        Ok(ComponentScore::new(
            score,
            VocabularyFeedback {
                metrics: VocabularyMetrics {
                    total_words,
                    unique_words,
                    vocabulary_density: density,
                    complexity_score,
                },
                analysis: VocabularyAnalysis {
                    most_common: frequency,
                    high_frequency_words,
                    unique_word_ratio: density,
                },
                suggestions,
            },
        ))
    }
}
