//! Evaluation result records.

use crate::category::QuestionCategory;
use serde::{Deserialize, Serialize};

/// Sub-scores and counters for a factual answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactualScores {
    pub length_score: f64,
    pub specificity_score: f64,
    pub clarity_score: f64,
    pub total_score: f64,
    /// Answer length in characters.
    pub answer_length: usize,
    /// Whether a number, URL or proper-noun-like name was found.
    pub has_specific_info: bool,
}

/// Sub-scores and counters for a procedural answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralScores {
    pub step_score: f64,
    pub logic_score: f64,
    pub action_score: f64,
    pub total_score: f64,
    pub step_markers_found: usize,
    pub connectors_found: usize,
    pub actions_found: usize,
}

/// Sub-scores and counters for a comparative answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeScores {
    pub comparison_score: f64,
    pub dimension_score: f64,
    pub structure_score: f64,
    pub length_score: f64,
    pub total_score: f64,
    pub comparison_words_found: usize,
    pub dimensions_found: usize,
}

/// Sub-scores and counters for a recommendation answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationScores {
    pub recommendation_score: f64,
    pub reasoning_score: f64,
    pub constraint_score: f64,
    pub diversity_score: f64,
    pub total_score: f64,
    pub has_recommendation: bool,
    pub reasoning_indicators: usize,
    pub constraint_awareness: usize,
}

/// The outcome of scoring one answer.
///
/// Serialized as a flat object tagged by `category`; sub-scores and
/// `total_score` are already rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum EvaluationResult {
    Factual(FactualScores),
    Procedural(ProceduralScores),
    Comparative(ComparativeScores),
    Recommendation(RecommendationScores),
}

impl EvaluationResult {
    pub fn category(&self) -> QuestionCategory {
        match self {
            EvaluationResult::Factual(_) => QuestionCategory::Factual,
            EvaluationResult::Procedural(_) => QuestionCategory::Procedural,
            EvaluationResult::Comparative(_) => QuestionCategory::Comparative,
            EvaluationResult::Recommendation(_) => QuestionCategory::Recommendation,
        }
    }

    pub fn total_score(&self) -> f64 {
        match self {
            EvaluationResult::Factual(s) => s.total_score,
            EvaluationResult::Procedural(s) => s.total_score,
            EvaluationResult::Comparative(s) => s.total_score,
            EvaluationResult::Recommendation(s) => s.total_score,
        }
    }

    /// Named sub-scores in reporting order, excluding the total.
    pub fn sub_scores(&self) -> Vec<(&'static str, f64)> {
        match self {
            EvaluationResult::Factual(s) => vec![
                ("length_score", s.length_score),
                ("specificity_score", s.specificity_score),
                ("clarity_score", s.clarity_score),
            ],
            EvaluationResult::Procedural(s) => vec![
                ("step_score", s.step_score),
                ("logic_score", s.logic_score),
                ("action_score", s.action_score),
            ],
            EvaluationResult::Comparative(s) => vec![
                ("comparison_score", s.comparison_score),
                ("dimension_score", s.dimension_score),
                ("structure_score", s.structure_score),
                ("length_score", s.length_score),
            ],
            EvaluationResult::Recommendation(s) => vec![
                ("recommendation_score", s.recommendation_score),
                ("reasoning_score", s.reasoning_score),
                ("constraint_score", s.constraint_score),
                ("diversity_score", s.diversity_score),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedural() -> EvaluationResult {
        EvaluationResult::Procedural(ProceduralScores {
            step_score: 1.0,
            logic_score: 0.333,
            action_score: 0.5,
            total_score: 0.65,
            step_markers_found: 4,
            connectors_found: 1,
            actions_found: 2,
        })
    }

    #[test]
    fn test_serialized_shape_is_flat_and_tagged() {
        let value = serde_json::to_value(procedural()).unwrap();
        assert_eq!(value["category"], "procedural");
        assert_eq!(value["step_score"], 1.0);
        assert_eq!(value["total_score"], 0.65);
        assert_eq!(value["step_markers_found"], 4);
    }

    #[test]
    fn test_deserializes_saved_record() {
        let json = r#"{"category":"procedural","step_score":1.0,"logic_score":0.333,
            "action_score":0.5,"total_score":0.65,"step_markers_found":4,
            "connectors_found":1,"actions_found":2}"#;
        let parsed: EvaluationResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, procedural());
    }

    #[test]
    fn test_accessors() {
        let result = procedural();
        assert_eq!(result.category(), QuestionCategory::Procedural);
        assert_eq!(result.total_score(), 0.65);
        let names: Vec<_> = result.sub_scores().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["step_score", "logic_score", "action_score"]);
    }
}
