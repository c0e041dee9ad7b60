//! Heuristic answer evaluation.
//!
//! Each question category has its own [`Scorer`]. A scorer derives a handful
//! of bounded sub-scores from lexical signals in the answer and combines them
//! with fixed weights through [`WeightedScore`]. No scorer looks at meaning:
//! the evaluation is purely pattern based.
//!
//! ```
//! use rag_category_eval::evaluator::evaluate;
//!
//! let result = evaluate("Central Library is at 12 Kent Ridge Crescent.", "factual").unwrap();
//! assert!(result.total_score() > 0.8);
//! ```

pub mod patterns;
mod result;
mod scorers;

pub use patterns::AnswerText;
pub use result::{
    ComparativeScores, EvaluationResult, FactualScores, ProceduralScores, RecommendationScores,
};
pub use scorers::{ComparativeScorer, FactualScorer, ProceduralScorer, RecommendationScorer};

use crate::category::QuestionCategory;
use crate::error::Result;

/// A category-specific answer scoring strategy.
pub trait Scorer: Send + Sync {
    /// The category this scorer is calibrated for.
    fn category(&self) -> QuestionCategory;

    /// Score an answer. Must be total over every input, including "".
    fn score(&self, text: &AnswerText<'_>) -> EvaluationResult;
}

/// Fixed-weight linear combination of sub-scores.
///
/// Every component is clamped into `[0, 1]` before it is weighted, so a
/// scorer whose weights sum to 1.0 always yields a total in `[0, 1]`.
#[derive(Debug, Default)]
pub struct WeightedScore {
    total: f64,
}

impl WeightedScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a weighted component and return its clamped value.
    pub fn add(&mut self, weight: f64, value: f64) -> f64 {
        let value = value.clamp(0.0, 1.0);
        self.total += weight * value;
        value
    }

    pub fn total(&self) -> f64 {
        self.total.clamp(0.0, 1.0)
    }
}

/// `count / target`, capped at 1.0.
pub fn ratio(count: usize, target: f64) -> f64 {
    (count as f64 / target).min(1.0)
}

/// Round to three decimals, the precision results are reported with.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Routes an answer to the scorer for its category.
pub struct Evaluator;

impl Evaluator {
    /// The scorer registered for a category.
    pub fn scorer(category: QuestionCategory) -> &'static dyn Scorer {
        match category {
            QuestionCategory::Factual => &FactualScorer,
            QuestionCategory::Procedural => &ProceduralScorer,
            QuestionCategory::Comparative => &ComparativeScorer,
            QuestionCategory::Recommendation => &RecommendationScorer,
        }
    }

    /// Score an answer for an already validated category.
    pub fn evaluate_category(answer: &str, category: QuestionCategory) -> EvaluationResult {
        Self::scorer(category).score(&AnswerText::new(answer))
    }

    /// Score an answer for a category given by name.
    ///
    /// Fails with [`RagEvalError::InvalidCategory`](crate::error::RagEvalError::InvalidCategory)
    /// when the name is not one of the four categories. There is no fallback scorer.
    pub fn evaluate(answer: &str, category: &str) -> Result<EvaluationResult> {
        let category: QuestionCategory = category.parse()?;
        Ok(Self::evaluate_category(answer, category))
    }
}

/// Shorthand for [`Evaluator::evaluate`].
pub fn evaluate(answer: &str, category: &str) -> Result<EvaluationResult> {
    Evaluator::evaluate(answer, category)
}
