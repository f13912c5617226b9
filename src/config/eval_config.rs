//! Layered configuration for essay-eval
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. User config (`~/.config/essay-eval/config.toml`)
//! 3. Project config (`essay-eval.toml` in the working directory)
//! 4. Environment (`ESSAY_EVAL_PROVIDER_URL`, `ESSAY_EVAL_TIMEOUT_SECS`)
//!
//! CLI flags are applied on top by the caller.
//!
//! # Configuration Format
//!
//! ```toml
//! [provider]
//! url = "http://localhost:8010"
//! timeout_secs = 30
//! language = "en-US"
//!
//! [output]
//! format = "text"
//!
//! [evaluation]
//! essay_type = "general"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::nlp::DEFAULT_LANGUAGE;

pub const PROJECT_CONFIG_FILE: &str = "essay-eval.toml";
pub const ENV_PROVIDER_URL: &str = "ESSAY_EVAL_PROVIDER_URL";
pub const ENV_TIMEOUT_SECS: &str = "ESSAY_EVAL_TIMEOUT_SECS";

pub const DEFAULT_PROVIDER_URL: &str = "http://localhost:8010";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the linguistic facts service
    pub url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Language code for the grammar checker
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// "text" or "json"
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Default essay type when none is given
    pub essay_type: Option<String>,
}

impl EvalConfig {
    /// Load config from all file and environment sources
    pub fn load(project_dir: &Path) -> Self {
        let mut config = EvalConfig::default();
        if let Some(user) = Self::user_config_path().and_then(|p| Self::read_file(&p)) {
            config.merge(user);
        }
        if let Some(project) = Self::read_file(&project_dir.join(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("essay-eval").join("config.toml"))
    }

    /// Parse one TOML file; missing or invalid files are skipped
    fn read_file(path: &Path) -> Option<EvalConfig> {
        if !path.exists() {
            return None;
        }
        match Self::parse_file(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("Ignoring config {}: {:#}", path.display(), e);
                None
            }
        }
    }

    fn parse_file(path: &Path) -> Result<EvalConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: EvalConfig) {
        if other.provider.url.is_some() {
            self.provider.url = other.provider.url;
        }
        if other.provider.timeout_secs.is_some() {
            self.provider.timeout_secs = other.provider.timeout_secs;
        }
        if other.provider.language.is_some() {
            self.provider.language = other.provider.language;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.evaluation.essay_type.is_some() {
            self.evaluation.essay_type = other.evaluation.essay_type;
        }
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_PROVIDER_URL).filter(|u| !u.trim().is_empty()) {
            self.provider.url = Some(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.provider.timeout_secs = Some(secs),
                _ => warn!("Ignoring {}={:?}: expected a positive integer", ENV_TIMEOUT_SECS, raw),
            }
        }
    }

    pub fn provider_url(&self) -> &str {
        self.provider.url.as_deref().unwrap_or(DEFAULT_PROVIDER_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider
                .timeout_secs
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn language(&self) -> &str {
        self.provider.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn output_format(&self) -> &str {
        self.output.format.as_deref().unwrap_or("text")
    }

    pub fn essay_type(&self) -> &str {
        self.evaluation.essay_type.as_deref().unwrap_or("general")
    }

    /// Write an example project config into `dir` unless one exists
    pub fn init_project_config(dir: &Path) -> Result<PathBuf> {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if !config_path.exists() {
            let example = format!(
                r#"# essay-eval project configuration

[provider]
# Linguistic facts service (tagging, grammar checking, word senses)
url = "{DEFAULT_PROVIDER_URL}"
timeout_secs = {DEFAULT_TIMEOUT_SECS}
# language = "{DEFAULT_LANGUAGE}"

[output]
# "text" or "json"
format = "text"

[evaluation]
# "general", "academic", "creative" or any other tag
essay_type = "general"
"#
            );
            std::fs::write(&config_path, example)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
        }
        Ok(config_path)
    }
}
