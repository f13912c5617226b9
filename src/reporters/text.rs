//! Text (terminal) reporter with colors and formatting

use crate::models::{EvaluationResult, LetterGrade};
use crate::pipeline::Evaluator;
use crate::scoring::{GradeBreakdown, GradeEntry};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: LetterGrade) -> &'static str {
    match grade {
        LetterGrade::A => "\x1b[32m", // Green
        LetterGrade::B => "\x1b[92m", // Light green
        LetterGrade::C => "\x1b[33m", // Yellow
        LetterGrade::D => "\x1b[91m", // Light red
        LetterGrade::F => "\x1b[31m", // Red
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render an evaluation as formatted terminal output
pub fn render(result: &EvaluationResult) -> Result<String> {
    let mut out = String::new();
    let grade_c = grade_color(result.letter_grade);

    out.push_str(&format!("\n{BOLD}Essay Evaluation{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.2}{RESET}  Level: {BOLD}{}{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n\n",
        result.overall_score, result.cefr_level, result.letter_grade
    ));

    let breakdown = Evaluator::breakdown(result)?;
    out.push_str(&format!("{BOLD}SCORES{RESET}\n"));
    out.push_str(&table_header());
    for (name, entry) in component_rows(&breakdown) {
        out.push_str(&format_row(name, entry));
    }

    let analysis = &result.detailed_analysis;

    let grammar = &analysis.grammar.feedback;
    let vocabulary = &analysis.vocabulary.feedback;
    let coherence = &analysis.coherence.feedback;
    out.push_str(&format!(
        "  {DIM}{} grammar issues in {} words, {} sentences; {} unique of {} words; {} paragraphs, {} topic shifts{RESET}\n\n",
        grammar.metrics.error_count,
        grammar.metrics.word_count,
        grammar.analysis.sentence_structure.total_sentences,
        vocabulary.metrics.unique_words,
        vocabulary.metrics.total_words,
        coherence.analysis.paragraph_structure.total_paragraphs,
        coherence.analysis.topic_flow.topic_shifts,
    ));

    push_list(&mut out, "STRENGTHS", &result.feedback.strengths);
    push_list(
        &mut out,
        "AREAS FOR IMPROVEMENT",
        &result.feedback.areas_for_improvement,
    );
    push_list(&mut out, "RECOMMENDATIONS", &result.feedback.recommendations);

    let details: Vec<String> = grammar
        .analysis
        .error_details
        .iter()
        .take(10)
        .map(|m| format!("{} {DIM}[{} @{}]{RESET}", m.message, m.rule_id, m.offset))
        .collect();
    push_list(&mut out, "GRAMMAR ISSUES", &details);

    let suggestions: Vec<String> = grammar
        .suggestions
        .iter()
        .chain(&vocabulary.suggestions)
        .chain(&coherence.suggestions)
        .cloned()
        .collect();
    push_list(&mut out, "SUGGESTIONS", &suggestions);

    Ok(out)
}

/// Render a grade breakdown table
pub fn render_breakdown(breakdown: &GradeBreakdown) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}Grade Breakdown{RESET}\n"));
    out.push_str(&table_header());
    for (name, entry) in component_rows(breakdown) {
        out.push_str(&format_row(name, entry));
    }
    out.push_str(&format_row("Overall", &breakdown.overall));
    out
}

fn table_header() -> String {
    format!("{DIM}  COMPONENT     SCORE  CEFR  GRADE{RESET}\n")
}

fn component_rows(breakdown: &GradeBreakdown) -> [(&'static str, &GradeEntry); 3] {
    [
        ("Grammar", &breakdown.components.grammar),
        ("Vocabulary", &breakdown.components.vocabulary),
        ("Coherence", &breakdown.components.coherence),
    ]
}

// Scores lie in 0..=1, so the colored value is always four columns wide
fn format_row(name: &str, entry: &GradeEntry) -> String {
    let grade_c = grade_color(entry.letter_grade);
    format!(
        "  {:<12}   {}  {:<4}  {grade_c}{}{RESET}\n",
        name,
        format_score(entry.score),
        entry.cefr_level.to_string(),
        entry.letter_grade
    )
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{BOLD}{title}{RESET}\n"));
    for item in items {
        out.push_str(&format!("  • {}\n", item));
    }
    out.push('\n');
}

fn format_score(score: f64) -> String {
    let color = if score >= 0.8 {
        "\x1b[32m"
    } else if score >= 0.6 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:.2}{RESET}", score)
}
