//! Core data models for essay-eval
//!
//! These models carry linguistic facts from the provider into the scorers,
//! and carry the final evaluation back out to reporters and the server.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::scoring::{CoherenceFeedback, GrammarFeedback, VocabularyFeedback};

/// A single token as tagged by the linguistic facts provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "TokenRecord")]
pub struct Token {
    pub text: String,
    /// Coarse part-of-speech tag (NOUN, VERB, PUNCT, ...)
    pub pos: String,
    /// Dependency label relative to the syntactic head (nsubj, mark, ...)
    pub dep: String,
    /// Set by the provider, or implied by a PUNCT tag
    pub is_punct: bool,
}

/// Token as it arrives on the wire; `is_punct` may be absent
#[derive(Deserialize)]
struct TokenRecord {
    text: String,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    dep: String,
    #[serde(default)]
    is_punct: bool,
}

impl From<TokenRecord> for Token {
    fn from(record: TokenRecord) -> Self {
        let mut token = Token::new(record.text, record.pos, record.dep);
        token.is_punct |= record.is_punct;
        token
    }
}

impl Token {
    pub fn new(text: impl Into<String>, pos: impl Into<String>, dep: impl Into<String>) -> Self {
        let pos = pos.into();
        Self {
            text: text.into(),
            is_punct: pos == "PUNCT",
            pos,
            dep: dep.into(),
        }
    }

    /// Non-empty and made only of alphabetic characters
    pub fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }

    /// Counts toward the word total: not punctuation, not bare whitespace
    pub fn is_word(&self) -> bool {
        !self.is_punct && !self.text.trim().is_empty()
    }

    pub fn is_noun(&self) -> bool {
        self.pos == "NOUN"
    }
}

/// Tagged tokens of one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SentenceFact {
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl SentenceFact {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens carrying the given dependency label
    pub fn count_dep(&self, dep: &str) -> usize {
        self.tokens.iter().filter(|t| t.dep == dep).count()
    }
}

/// Sentence-segmented, tagged view of one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaggedDoc {
    #[serde(default)]
    pub sentences: Vec<SentenceFact>,
}

impl TaggedDoc {
    pub fn new(sentences: Vec<SentenceFact>) -> Self {
        Self { sentences }
    }

    /// All tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Non-punctuation token count
    pub fn word_count(&self) -> usize {
        self.tokens().filter(|t| t.is_word()).count()
    }
}

/// A blank-line separated block of an essay, tagged on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphFact {
    pub text: String,
    /// Whitespace-separated word count of the raw paragraph
    pub word_count: usize,
    pub doc: TaggedDoc,
}

impl ParagraphFact {
    pub fn new(text: &str, doc: TaggedDoc) -> Self {
        Self {
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
            doc,
        }
    }
}

/// One rule violation reported by the grammar checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GrammarMatch {
    pub rule_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
}

/// Classification tag supplied with an essay.
///
/// Any tag is accepted and logged; scoring weights do not depend on it.
/// Blank tags fall back to `general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum EssayType {
    #[default]
    General,
    Academic,
    Creative,
    Other(String),
}

impl EssayType {
    pub fn as_str(&self) -> &str {
        match self {
            EssayType::General => "general",
            EssayType::Academic => "academic",
            EssayType::Creative => "creative",
            EssayType::Other(tag) => tag,
        }
    }
}

impl From<&str> for EssayType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "general" => EssayType::General,
            "academic" => EssayType::Academic,
            "creative" => EssayType::Creative,
            other => EssayType::Other(other.to_string()),
        }
    }
}

impl From<String> for EssayType {
    fn from(s: String) -> Self {
        EssayType::from(s.as_str())
    }
}

impl From<EssayType> for String {
    fn from(essay_type: EssayType) -> Self {
        essay_type.as_str().to_string()
    }
}

impl FromStr for EssayType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EssayType::from(s))
    }
}

impl std::fmt::Display for EssayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common European Framework of Reference band, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl std::fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        f.write_str(label)
    }
}

/// Letter grade, lowest first so that `Ord` follows the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    F,
    D,
    C,
    B,
    A,
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LetterGrade::F => "F",
            LetterGrade::D => "D",
            LetterGrade::C => "C",
            LetterGrade::B => "B",
            LetterGrade::A => "A",
        };
        f.write_str(label)
    }
}

/// Score in [0, 1] with the scorer's typed feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore<F> {
    pub score: f64,
    pub feedback: F,
}

impl<F> ComponentScore<F> {
    pub fn new(score: f64, feedback: F) -> Self {
        Self { score, feedback }
    }
}

/// Per-component results of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub grammar: ComponentScore<GrammarFeedback>,
    pub vocabulary: ComponentScore<VocabularyFeedback>,
    pub coherence: ComponentScore<CoherenceFeedback>,
}

/// Natural-language summary synthesized from the component scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OverallFeedback {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Final, request-scoped evaluation of one essay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Weighted score in [0, 1], rounded to two decimals
    pub overall_score: f64,
    pub cefr_level: CefrLevel,
    pub letter_grade: LetterGrade,
    pub feedback: OverallFeedback,
    pub detailed_analysis: DetailedAnalysis,
}
