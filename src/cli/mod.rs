//! CLI command definitions and handlers

mod breakdown;
mod doctor;
mod evaluate;
mod init;
mod serve;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::EvalConfig;
use crate::nlp::{HttpFacts, LinguisticFacts, RecordedFacts};

/// essay-eval - English essay evaluation
///
/// Scores grammar, vocabulary and coherence, then reports a CEFR level,
/// a letter grade and feedback.
#[derive(Parser, Debug)]
#[command(name = "essay-eval")]
#[command(
    version,
    about = "Evaluate English essays: grammar, vocabulary and coherence scores with CEFR level and letter grade",
    after_help = "\
Examples:
  essay-eval evaluate essay.txt                       Evaluate a file
  cat essay.txt | essay-eval evaluate                 Evaluate stdin
  essay-eval evaluate essay.txt --format json         JSON output for scripting
  essay-eval evaluate essay.txt --facts facts.json    Offline, from recorded facts
  essay-eval breakdown 0.9 0.75 0.6                   Grade table for component scores
  essay-eval serve                                    JSON-RPC server on stdio"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where linguistic facts come from
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Replay recorded linguistic facts from a JSON file instead of calling the service
    #[arg(long)]
    pub facts: Option<PathBuf>,

    /// Base URL of the linguistic facts service
    #[arg(long)]
    pub provider_url: Option<String>,

    /// Provider request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl ProviderArgs {
    /// Apply flags on top of file and environment config
    pub fn apply(&self, config: &mut EvalConfig) {
        if let Some(url) = &self.provider_url {
            config.provider.url = Some(url.clone());
        }
        if let Some(secs) = self.timeout {
            config.provider.timeout_secs = Some(secs);
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one essay (file path, or stdin when omitted or "-")
    Evaluate {
        /// Essay file; "-" or nothing reads stdin
        file: Option<PathBuf>,

        /// Essay type: general, academic, creative
        #[arg(long, short = 't')]
        essay_type: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Serve evaluations as JSON-RPC 2.0 over stdin/stdout
    Serve {
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Show CEFR level and letter grade for component scores
    Breakdown {
        /// Grammar score in [0, 1]
        grammar: f64,
        /// Vocabulary score in [0, 1]
        vocabulary: f64,
        /// Coherence score in [0, 1]
        coherence: f64,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,
    },

    /// Create an essay-eval.toml config file with example settings
    Init,

    /// Check configuration and provider connectivity
    Doctor {
        #[command(flatten)]
        provider: ProviderArgs,
    },
}

/// Resolve configuration: files and environment, then CLI flags
fn load_config(provider: &ProviderArgs) -> Result<EvalConfig> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut config = EvalConfig::load(&cwd);
    provider.apply(&mut config);
    Ok(config)
}

/// Build the linguistic facts provider selected by flags and config
pub fn build_provider(
    provider: &ProviderArgs,
    config: &EvalConfig,
) -> Result<Arc<dyn LinguisticFacts>> {
    if let Some(path) = &provider.facts {
        debug!("Using recorded facts from {}", path.display());
        return Ok(Arc::new(RecordedFacts::load(path)?));
    }
    debug!(
        "Using facts service at {} (timeout {:?})",
        config.provider_url(),
        config.timeout()
    );
    Ok(Arc::new(
        HttpFacts::new(config.provider_url(), config.timeout()).with_language(config.language()),
    ))
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            file,
            essay_type,
            format,
            output,
            provider,
        } => {
            let config = load_config(&provider)?;
            let facts = build_provider(&provider, &config)?;
            evaluate::run(
                facts,
                &config,
                file.as_deref(),
                essay_type.as_deref(),
                format.as_deref(),
                output.as_deref(),
            )
        }

        Commands::Serve { provider } => {
            let config = load_config(&provider)?;
            serve::run(build_provider(&provider, &config)?)
        }

        Commands::Breakdown {
            grammar,
            vocabulary,
            coherence,
            format,
        } => {
            let config = load_config(&ProviderArgs::default())?;
            let format = format.as_deref().unwrap_or(config.output_format());
            breakdown::run(grammar, vocabulary, coherence, format)
        }

        Commands::Init => {
            let cwd = std::env::current_dir().context("Failed to determine working directory")?;
            init::run(&cwd)
        }

        Commands::Doctor { provider } => {
            let config = load_config(&provider)?;
            let facts = build_provider(&provider, &config)?;
            doctor::run(&config, facts.as_ref())
        }
    }
}
