//! HTTP client for a remote linguistic facts service
//!
//! Uses ureq (sync HTTP) with a global per-request timeout. Timeouts and
//! connection failures are reported as-is; nothing is retried.
//!
//! # Wire format
//!
//! ```text
//! POST {base}/tag     {"text": ...}                    -> {"sentences": [{"tokens": [...]}]}
//! POST {base}/check   {"text": ..., "language": ...}   -> {"matches": [...]}
//! POST {base}/senses  {"words": [...]}                 -> {"senses": {"word": n}}
//! GET  {base}/health                                   -> 2xx
//! ```

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::{LinguisticFacts, ProviderError, ProviderResult};
use crate::models::{GrammarMatch, SentenceFact, TaggedDoc};

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Remote provider speaking JSON over HTTP
pub struct HttpFacts {
    base_url: String,
    language: String,
    timeout: Duration,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to ProviderError::Api below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl HttpFacts {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout,
            agent: make_agent(timeout),
        }
    }

    /// Language code passed to the grammar checker
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn transport_error(&self, err: ureq::Error) -> ProviderError {
        match err {
            ureq::Error::Timeout(_) => ProviderError::Timeout(self.timeout),
            other => ProviderError::Unreachable(other.to_string()),
        }
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ProviderResult<R> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        response.into_body().read_json().map_err(|e| match e {
            ureq::Error::Timeout(_) => ProviderError::Timeout(self.timeout),
            other => ProviderError::Parse(other.to_string()),
        })
    }
}

impl LinguisticFacts for HttpFacts {
    fn name(&self) -> &'static str {
        "http"
    }

    fn tag(&self, text: &str) -> ProviderResult<TaggedDoc> {
        let resp: TagResponse = self.post("tag", &TextRequest { text })?;
        Ok(TaggedDoc::new(resp.sentences))
    }

    fn check_grammar(&self, text: &str) -> ProviderResult<Vec<GrammarMatch>> {
        let resp: CheckResponse = self.post(
            "check",
            &CheckRequest {
                text,
                language: &self.language,
            },
        )?;
        Ok(resp.matches)
    }

    fn sense_count(&self, word: &str) -> ProviderResult<usize> {
        let counts = self.sense_counts(&[word])?;
        Ok(counts.get(word).copied().unwrap_or(0))
    }

    fn sense_counts(&self, words: &[&str]) -> ProviderResult<FxHashMap<String, usize>> {
        if words.is_empty() {
            return Ok(FxHashMap::default());
        }
        let resp: SensesResponse = self.post("senses", &SensesRequest { words })?;
        Ok(words
            .iter()
            .map(|w| {
                let count = resp.senses.get(*w).copied().unwrap_or(0);
                ((*w).to_string(), count)
            })
            .collect())
    }

    fn health(&self) -> ProviderResult<()> {
        let response = self
            .agent
            .get(self.endpoint("health"))
            .call()
            .map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(ProviderError::Api {
                status,
                message: "health check failed".to_string(),
            });
        }
        Ok(())
    }
}

// Wire types
#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct CheckRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct SensesRequest<'a> {
    words: &'a [&'a str],
}

#[derive(Deserialize)]
struct TagResponse {
    #[serde(default)]
    sentences: Vec<SentenceFact>,
}

#[derive(Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<GrammarMatch>,
}

#[derive(Deserialize)]
struct SensesResponse {
    #[serde(default)]
    senses: HashMap<String, usize>,
}
