//! The four category scorers.

use super::patterns::{self, AnswerText};
use super::result::{
    ComparativeScores, EvaluationResult, FactualScores, ProceduralScores, RecommendationScores,
};
use super::{Scorer, WeightedScore, ratio, round3};
use crate::category::QuestionCategory;

/// Factual answers should be short, concrete and committed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactualScorer;

impl Scorer for FactualScorer {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::Factual
    }

    fn score(&self, text: &AnswerText<'_>) -> EvaluationResult {
        let answer_length = text.char_len();
        // Terse answers win; longer ones drop in bands.
        let length = match answer_length {
            0..=150 => 1.0,
            151..=300 => 0.8,
            _ => 0.5,
        };

        let has_number = patterns::has_number(text);
        let has_url = patterns::has_url(text);
        let has_name = patterns::has_specific_name(text);
        let specificity = if has_number { 0.4 } else { 0.0 }
            + if has_url { 0.3 } else { 0.0 }
            + if has_name { 0.3 } else { 0.0 };

        let clarity = if patterns::has_vague_language(text) { 0.0 } else { 1.0 };

        let mut total = WeightedScore::new();
        let length = total.add(0.3, length);
        let specificity = total.add(0.4, specificity);
        let clarity = total.add(0.3, clarity);

        EvaluationResult::Factual(FactualScores {
            length_score: round3(length),
            specificity_score: round3(specificity),
            clarity_score: round3(clarity),
            total_score: round3(total.total()),
            answer_length,
            has_specific_info: has_number || has_url || has_name,
        })
    }
}

/// Procedural answers should walk through ordered, actionable steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralScorer;

impl Scorer for ProceduralScorer {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::Procedural
    }

    fn score(&self, text: &AnswerText<'_>) -> EvaluationResult {
        let step_markers = patterns::step_marker_count(text);
        let connectors = patterns::connector_count(text);
        let actions = patterns::action_verb_count(text);

        let mut total = WeightedScore::new();
        let step = total.add(0.4, ratio(step_markers, 3.0));
        let logic = total.add(0.3, ratio(connectors, 3.0));
        let action = total.add(0.3, ratio(actions, 4.0));

        EvaluationResult::Procedural(ProceduralScores {
            step_score: round3(step),
            logic_score: round3(logic),
            action_score: round3(action),
            total_score: round3(total.total()),
            step_markers_found: step_markers,
            connectors_found: connectors,
            actions_found: actions,
        })
    }
}

/// Comparative answers should contrast several dimensions at some length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparativeScorer;

impl Scorer for ComparativeScorer {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::Comparative
    }

    fn score(&self, text: &AnswerText<'_>) -> EvaluationResult {
        let comparison_words = patterns::comparison_word_count(text);
        let dimensions = patterns::dimension_count(text);
        // Unstructured prose is only mildly penalized.
        let structure = if patterns::has_structure(text) { 1.0 } else { 0.5 };
        let length = match text.char_len() {
            n if n >= 200 => 1.0,
            n if n >= 100 => 0.7,
            _ => 0.4,
        };

        let mut total = WeightedScore::new();
        let comparison = total.add(0.3, ratio(comparison_words, 3.0));
        let dimension = total.add(0.3, ratio(dimensions, 2.0));
        let structure = total.add(0.2, structure);
        let length = total.add(0.2, length);

        EvaluationResult::Comparative(ComparativeScores {
            comparison_score: round3(comparison),
            dimension_score: round3(dimension),
            structure_score: round3(structure),
            length_score: round3(length),
            total_score: round3(total.total()),
            comparison_words_found: comparison_words,
            dimensions_found: dimensions,
        })
    }
}

/// Recommendation answers should commit to a choice, justify it against the
/// asker's constraints, and ideally offer alternatives.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationScorer;

impl Scorer for RecommendationScorer {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::Recommendation
    }

    fn score(&self, text: &AnswerText<'_>) -> EvaluationResult {
        let has_recommendation = patterns::has_recommendation_language(text);
        let reasoning_words = patterns::reasoning_word_count(text);
        let constraint_words = patterns::constraint_word_count(text);
        let options = patterns::option_marker_count(text);

        let mut total = WeightedScore::new();
        let recommendation = total.add(0.3, if has_recommendation { 1.0 } else { 0.0 });
        let reasoning = total.add(0.3, ratio(reasoning_words, 2.0));
        let constraint = total.add(0.25, ratio(constraint_words, 2.0));
        let diversity = total.add(0.15, ratio(options, 2.0));

        EvaluationResult::Recommendation(RecommendationScores {
            recommendation_score: round3(recommendation),
            reasoning_score: round3(reasoning),
            constraint_score: round3(constraint),
            diversity_score: round3(diversity),
            total_score: round3(total.total()),
            has_recommendation,
            reasoning_indicators: reasoning_words,
            constraint_awareness: constraint_words,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score<S: Scorer>(scorer: S, answer: &str) -> EvaluationResult {
        scorer.score(&AnswerText::new(answer))
    }

    #[test]
    fn test_factual_length_bands() {
        let length_of = |n: usize| match score(FactualScorer, &"a".repeat(n)) {
            EvaluationResult::Factual(s) => s.length_score,
            other => panic!("unexpected result {other:?}"),
        };
        assert_eq!(length_of(150), 1.0);
        assert_eq!(length_of(151), 0.8);
        assert_eq!(length_of(300), 0.8);
        assert_eq!(length_of(301), 0.5);
    }

    #[test]
    fn test_factual_full_marks() {
        let EvaluationResult::Factual(s) =
            score(FactualScorer, "Central Library opens at 8am, see https://nus.edu.sg")
        else {
            panic!("expected factual result");
        };
        assert_eq!(s.specificity_score, 1.0);
        assert_eq!(s.clarity_score, 1.0);
        assert_eq!(s.total_score, 1.0);
        assert!(s.has_specific_info);
    }

    #[test]
    fn test_factual_number_only() {
        let EvaluationResult::Factual(s) = score(FactualScorer, "there are 12 colleges") else {
            panic!("expected factual result");
        };
        assert_eq!(s.specificity_score, 0.4);
        // 0.3 + 0.16 + 0.3
        assert_eq!(s.total_score, 0.76);
        assert_eq!(s.answer_length, 21);
    }

    #[test]
    fn test_procedural_partial_credit() {
        let EvaluationResult::Procedural(s) =
            score(ProceduralScorer, "First click apply, then submit.")
        else {
            panic!("expected procedural result");
        };
        // "first" + "then"
        assert_eq!(s.step_markers_found, 2);
        assert_eq!(s.connectors_found, 2);
        assert_eq!(s.actions_found, 2);
        assert_eq!(s.step_score, 0.667);
        assert_eq!(s.logic_score, 0.667);
        assert_eq!(s.action_score, 0.5);
        assert_eq!(s.total_score, 0.617);
    }

    #[test]
    fn test_comparative_unstructured_short_answer() {
        let EvaluationResult::Comparative(s) = score(ComparativeScorer, "Both are fine.") else {
            panic!("expected comparative result");
        };
        assert_eq!(s.comparison_words_found, 1);
        assert_eq!(s.structure_score, 0.5);
        assert_eq!(s.length_score, 0.4);
        // 0.1 + 0 + 0.1 + 0.08
        assert_eq!(s.total_score, 0.28);
    }

    #[test]
    fn test_comparative_length_bands() {
        let length_of = |n: usize| match score(ComparativeScorer, &"a".repeat(n)) {
            EvaluationResult::Comparative(s) => s.length_score,
            other => panic!("unexpected result {other:?}"),
        };
        assert_eq!(length_of(99), 0.4);
        assert_eq!(length_of(100), 0.7);
        assert_eq!(length_of(199), 0.7);
        assert_eq!(length_of(200), 1.0);
    }

    #[test]
    fn test_recommendation_without_recommending() {
        let EvaluationResult::Recommendation(s) =
            score(RecommendationScorer, "Hall A is near the faculty.")
        else {
            panic!("expected recommendation result");
        };
        assert!(!s.has_recommendation);
        assert_eq!(s.recommendation_score, 0.0);
        assert_eq!(s.constraint_awareness, 1);
        assert_eq!(s.diversity_score, 0.0);
    }

    #[test]
    fn test_empty_answers_are_scored() {
        for scorer in [
            &FactualScorer as &dyn Scorer,
            &ProceduralScorer,
            &ComparativeScorer,
            &RecommendationScorer,
        ] {
            let total = scorer.score(&AnswerText::new("")).total_score();
            assert!((0.0..=1.0).contains(&total));
        }
    }
}
