//! Score to CEFR level and letter grade mapping

use serde::{Deserialize, Serialize};

use super::{check_score, overall_score, EvalResult};
use crate::models::{CefrLevel, LetterGrade};

/// Inclusive lower bounds, highest first
const CEFR_THRESHOLDS: [(f64, CefrLevel); 6] = [
    (0.9, CefrLevel::C2),
    (0.8, CefrLevel::C1),
    (0.7, CefrLevel::B2),
    (0.6, CefrLevel::B1),
    (0.5, CefrLevel::A2),
    (0.4, CefrLevel::A1),
];

const GRADE_THRESHOLDS: [(f64, LetterGrade); 5] = [
    (0.9, LetterGrade::A),
    (0.8, LetterGrade::B),
    (0.7, LetterGrade::C),
    (0.6, LetterGrade::D),
    (0.0, LetterGrade::F),
];

/// CEFR band for a score in [0, 1]; anything below 0.4 is A1
pub fn cefr_level(score: f64) -> EvalResult<CefrLevel> {
    let score = check_score("overall", score)?;
    Ok(CEFR_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(CefrLevel::A1))
}

pub fn letter_grade(score: f64) -> EvalResult<LetterGrade> {
    let score = check_score("overall", score)?;
    Ok(GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F))
}

/// A score with its level and grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub score: f64,
    pub cefr_level: CefrLevel,
    pub letter_grade: LetterGrade,
}

impl GradeEntry {
    pub fn from_score(score: f64) -> EvalResult<Self> {
        Ok(Self {
            score,
            cefr_level: cefr_level(score)?,
            letter_grade: letter_grade(score)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentGrades {
    pub grammar: GradeEntry,
    pub vocabulary: GradeEntry,
    pub coherence: GradeEntry,
}

/// Overall and per-component grades for a set of component scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    pub overall: GradeEntry,
    pub components: ComponentGrades,
}

impl GradeBreakdown {
    pub fn from_scores(grammar: f64, vocabulary: f64, coherence: f64) -> EvalResult<Self> {
        let components = ComponentGrades {
            grammar: GradeEntry::from_score(check_score("grammar", grammar)?)?,
            vocabulary: GradeEntry::from_score(check_score("vocabulary", vocabulary)?)?,
            coherence: GradeEntry::from_score(check_score("coherence", coherence)?)?,
        };
        Ok(Self {
            overall: GradeEntry::from_score(overall_score(grammar, vocabulary, coherence))?,
            components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::EvalError;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_cefr_boundaries() {
        assert_eq!(cefr_level(1.0).unwrap(), CefrLevel::C2);
        assert_eq!(cefr_level(0.9).unwrap(), CefrLevel::C2);
        assert_eq!(cefr_level(0.89).unwrap(), CefrLevel::C1);
        assert_eq!(cefr_level(0.8).unwrap(), CefrLevel::C1);
        assert_eq!(cefr_level(0.7).unwrap(), CefrLevel::B2);
        assert_eq!(cefr_level(0.6).unwrap(), CefrLevel::B1);
        assert_eq!(cefr_level(0.5).unwrap(), CefrLevel::A2);
        assert_eq!(cefr_level(0.4).unwrap(), CefrLevel::A1);
        assert_eq!(cefr_level(0.39).unwrap(), CefrLevel::A1);
        assert_eq!(cefr_level(0.0).unwrap(), CefrLevel::A1);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(letter_grade(0.95).unwrap(), LetterGrade::A);
        assert_eq!(letter_grade(0.9).unwrap(), LetterGrade::A);
        assert_eq!(letter_grade(0.8).unwrap(), LetterGrade::B);
        assert_eq!(letter_grade(0.79).unwrap(), LetterGrade::C);
        assert_eq!(letter_grade(0.6).unwrap(), LetterGrade::D);
        assert_eq!(letter_grade(0.59).unwrap(), LetterGrade::F);
        assert_eq!(letter_grade(0.0).unwrap(), LetterGrade::F);
    }

    #[test]
    fn test_invalid_scores_are_rejected() {
        for bad in [f64::NAN, f64::NEG_INFINITY, -0.1, 1.5] {
            assert!(matches!(
                cefr_level(bad),
                Err(EvalError::InvalidScore { .. })
            ));
            assert!(matches!(
                letter_grade(bad),
                Err(EvalError::InvalidScore { .. })
            ));
        }
    }

    #[test]
    fn test_levels_and_grades_are_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10_000 {
            let a: f64 = rng.random_range(0.0..=1.0);
            let b: f64 = rng.random_range(0.0..=1.0);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            assert!(cefr_level(low).unwrap() <= cefr_level(high).unwrap());
            assert!(letter_grade(low).unwrap() <= letter_grade(high).unwrap());
        }
    }

    #[test]
    fn test_breakdown() {
        let breakdown = GradeBreakdown::from_scores(1.0, 0.75, 0.25).unwrap();
        assert_eq!(breakdown.overall.score, 0.7);
        assert_eq!(breakdown.overall.cefr_level, CefrLevel::B2);
        assert_eq!(breakdown.overall.letter_grade, LetterGrade::C);
        assert_eq!(breakdown.components.grammar.cefr_level, CefrLevel::C2);
        assert_eq!(breakdown.components.vocabulary.letter_grade, LetterGrade::C);
        assert_eq!(breakdown.components.coherence.cefr_level, CefrLevel::A1);
    }

    #[test]
    fn test_breakdown_names_invalid_component() {
        let err = GradeBreakdown::from_scores(0.5, 1.2, 0.5).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InvalidScore {
                component: "vocabulary",
                ..
            }
        ));
    }
}
