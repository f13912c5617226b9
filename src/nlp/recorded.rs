//! Recorded linguistic facts
//!
//! Replays provider output captured in a JSON file, keyed by the exact text
//! that was tagged or checked:
//!
//! ```json
//! {
//!   "documents": { "I like cats.": { "sentences": [ { "tokens": [ ... ] } ] } },
//!   "matches":   { "I like cats.": [ { "rule_id": "...", "message": "..." } ] },
//!   "senses":    { "cats": 8 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{LinguisticFacts, ProviderError, ProviderResult};
use crate::models::{GrammarMatch, TaggedDoc};

/// Provider backed by previously captured facts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFacts {
    #[serde(default)]
    documents: HashMap<String, TaggedDoc>,
    #[serde(default)]
    matches: HashMap<String, Vec<GrammarMatch>>,
    #[serde(default)]
    senses: HashMap<String, usize>,
}

impl RecordedFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load recorded facts from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read facts file: {}", path.display()))?;
        let facts: RecordedFacts = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse facts file: {}", path.display()))?;
        debug!(
            "Loaded recorded facts: {} documents, {} grammar entries, {} sense counts",
            facts.documents.len(),
            facts.matches.len(),
            facts.senses.len()
        );
        Ok(facts)
    }

    pub fn with_document(mut self, text: impl Into<String>, doc: TaggedDoc) -> Self {
        self.documents.insert(text.into(), doc);
        self
    }

    pub fn with_matches(mut self, text: impl Into<String>, matches: Vec<GrammarMatch>) -> Self {
        self.matches.insert(text.into(), matches);
        self
    }

    pub fn with_senses(mut self, word: impl Into<String>, count: usize) -> Self {
        self.senses.insert(word.into(), count);
        self
    }

    fn lookup<'a, T>(map: &'a HashMap<String, T>, text: &str) -> Option<&'a T> {
        map.get(text).or_else(|| map.get(text.trim()))
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 40;
    let mut snippet: String = text.chars().take(MAX).collect();
    if text.chars().count() > MAX {
        snippet.push_str("...");
    }
    format!("text \"{}\"", snippet)
}

impl LinguisticFacts for RecordedFacts {
    fn name(&self) -> &'static str {
        "recorded"
    }

    fn tag(&self, text: &str) -> ProviderResult<TaggedDoc> {
        if text.trim().is_empty() {
            return Ok(TaggedDoc::default());
        }
        Self::lookup(&self.documents, text)
            .cloned()
            .ok_or_else(|| ProviderError::MissingFacts(preview(text)))
    }

    fn check_grammar(&self, text: &str) -> ProviderResult<Vec<GrammarMatch>> {
        Ok(Self::lookup(&self.matches, text).cloned().unwrap_or_default())
    }

    fn sense_count(&self, word: &str) -> ProviderResult<usize> {
        Ok(self.senses.get(word).copied().unwrap_or(0))
    }
}
