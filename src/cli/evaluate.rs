//! Evaluate command - score one essay

use anyhow::{Context, Result};
use console::style;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::EvalConfig;
use crate::models::EssayType;
use crate::nlp::LinguisticFacts;
use crate::pipeline::Evaluator;
use crate::reporters::{self, OutputFormat};
use crate::scoring::EvalError;

/// Read the essay from a file, or stdin for `None` / `-`
fn read_essay(file: Option<&Path>) -> Result<String> {
    let bytes = match file {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read essay: {}", path.display()))?,
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read essay from stdin")?;
            bytes
        }
    };
    decode_essay(bytes)
}

/// Essays must be UTF-8 text
fn decode_essay(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| EvalError::MalformedInput(format!("essay is not UTF-8 text: {}", e)).into())
}

pub fn run(
    facts: Arc<dyn LinguisticFacts>,
    config: &EvalConfig,
    file: Option<&Path>,
    essay_type: Option<&str>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let essay_type = EssayType::from(essay_type.unwrap_or(config.essay_type()));
    let format = OutputFormat::from_str(format.unwrap_or(config.output_format()))?;
    let text = read_essay(file)?;

    let result = Evaluator::new(facts)
        .evaluate(&text, essay_type)
        .context("Evaluation failed")?;
    let rendered = reporters::report(&result, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!("Report written to {}", path.display());
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
