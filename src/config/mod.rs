//! Configuration module for essay-eval
//!
//! This module handles:
//! - User and project config files (TOML)
//! - Environment overrides
//! - Defaults for the provider, output and evaluation settings

mod eval_config;

pub use eval_config::{
    EvalConfig, EvaluationConfig, OutputConfig, ProviderConfig, DEFAULT_PROVIDER_URL,
    DEFAULT_TIMEOUT_SECS, ENV_PROVIDER_URL, ENV_TIMEOUT_SECS, PROJECT_CONFIG_FILE,
};
