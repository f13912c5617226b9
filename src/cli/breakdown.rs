//! Breakdown command - grade table for component scores

use anyhow::{Context, Result};
use std::str::FromStr;

use crate::reporters::{self, OutputFormat};
use crate::scoring::GradeBreakdown;

pub fn run(grammar: f64, vocabulary: f64, coherence: f64, format: &str) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    let breakdown = GradeBreakdown::from_scores(grammar, vocabulary, coherence)
        .context("Scores must be numbers between 0 and 1")?;
    println!("{}", reporters::report_breakdown(&breakdown, format)?);
    Ok(())
}
