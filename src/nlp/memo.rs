//! Request-scoped memo over a linguistic facts provider
//!
//! The three scorers of one evaluation all ask for the same tagging of the
//! same text. The memo lives for a single evaluation and makes sure each
//! distinct request reaches the underlying provider once, even when the
//! scorers ask concurrently.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;

use super::{LinguisticFacts, ProviderResult};
use crate::models::{GrammarMatch, TaggedDoc};

pub struct MemoFacts {
    inner: Arc<dyn LinguisticFacts>,
    docs: DashMap<String, TaggedDoc>,
    matches: DashMap<String, Vec<GrammarMatch>>,
    senses: DashMap<String, usize>,
}

impl MemoFacts {
    pub fn new(inner: Arc<dyn LinguisticFacts>) -> Self {
        Self {
            inner,
            docs: DashMap::new(),
            matches: DashMap::new(),
            senses: DashMap::new(),
        }
    }

    /// Return the cached value for `key`, or compute and cache it.
    ///
    /// The entry lock is held while `fetch` runs, so concurrent callers for
    /// the same key wait for the first one instead of repeating the call.
    fn get_or_fetch<V: Clone>(
        map: &DashMap<String, V>,
        key: &str,
        fetch: impl FnOnce() -> ProviderResult<V>,
    ) -> ProviderResult<V> {
        if let Some(hit) = map.get(key) {
            return Ok(hit.value().clone());
        }
        match map.entry(key.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(slot) => {
                let value = fetch()?;
                slot.insert(value.clone());
                Ok(value)
            }
        }
    }
}

impl LinguisticFacts for MemoFacts {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn tag(&self, text: &str) -> ProviderResult<TaggedDoc> {
        Self::get_or_fetch(&self.docs, text, || {
            trace!("memo miss: tag ({} bytes)", text.len());
            self.inner.tag(text)
        })
    }

    fn check_grammar(&self, text: &str) -> ProviderResult<Vec<GrammarMatch>> {
        Self::get_or_fetch(&self.matches, text, || self.inner.check_grammar(text))
    }

    fn sense_count(&self, word: &str) -> ProviderResult<usize> {
        Self::get_or_fetch(&self.senses, word, || self.inner.sense_count(word))
    }

    fn sense_counts(&self, words: &[&str]) -> ProviderResult<FxHashMap<String, usize>> {
        let missing: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| !self.senses.contains_key(*w))
            .collect();
        if !missing.is_empty() {
            for (word, count) in self.inner.sense_counts(&missing)? {
                self.senses.insert(word, count);
            }
        }
        Ok(words
            .iter()
            .map(|w| {
                let count = self.senses.get(*w).map(|c| *c.value()).unwrap_or(0);
                ((*w).to_string(), count)
            })
            .collect())
    }

    fn health(&self) -> ProviderResult<()> {
        self.inner.health()
    }
}
