//! essay-eval - English essay evaluation
//!
//! Scores an essay on grammar, vocabulary and coherence using linguistic
//! facts (tags, dependency labels, grammar matches, word senses) from an
//! external provider, then maps the weighted score to a CEFR level and a
//! letter grade with structured feedback.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use essay_eval::models::EssayType;
//! use essay_eval::nlp::RecordedFacts;
//! use essay_eval::pipeline::Evaluator;
//!
//! let facts = RecordedFacts::load("facts.json".as_ref())?;
//! let result = Evaluator::new(Arc::new(facts)).evaluate(text, EssayType::General)?;
//! println!("{} {}", result.cefr_level, result.letter_grade);
//! ```

pub mod cli;
pub mod config;
pub mod models;
pub mod nlp;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod server;
