//! Overall feedback synthesized from component scores

use crate::models::OverallFeedback;

const STRENGTH_MIN: f64 = 0.8;
const IMPROVEMENT_BELOW: f64 = 0.6;
const RECOMMENDATION_BELOW: f64 = 0.7;

struct Messages {
    strength: &'static str,
    improvement: &'static str,
    recommendation: &'static str,
}

const GRAMMAR: Messages = Messages {
    strength: "Strong grammatical foundation",
    improvement: "Focus on improving grammar accuracy",
    recommendation: "Review basic grammar rules and practice sentence structure",
};

const VOCABULARY: Messages = Messages {
    strength: "Rich and varied vocabulary",
    improvement: "Work on expanding vocabulary range",
    recommendation: "Read more diverse materials to expand vocabulary",
};

const COHERENCE: Messages = Messages {
    strength: "Excellent text organization and flow",
    improvement: "Improve paragraph structure and transitions",
    recommendation: "Practice writing with clear topic sentences and logical transitions",
};

/// Build strengths, improvement areas and recommendations.
///
/// Components are visited in the order grammar, vocabulary, coherence, so
/// each list keeps that order.
pub fn synthesize(grammar: f64, vocabulary: f64, coherence: f64) -> OverallFeedback {
    let mut feedback = OverallFeedback::default();
    for (score, messages) in [
        (grammar, &GRAMMAR),
        (vocabulary, &VOCABULARY),
        (coherence, &COHERENCE),
    ] {
        if score >= STRENGTH_MIN {
            feedback.strengths.push(messages.strength.to_string());
        }
        if score < IMPROVEMENT_BELOW {
            feedback
                .areas_for_improvement
                .push(messages.improvement.to_string());
        }
        if score < RECOMMENDATION_BELOW {
            feedback
                .recommendations
                .push(messages.recommendation.to_string());
        }
    }
    feedback
}
