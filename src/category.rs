//! Question categories.

use crate::error::RagEvalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four question archetypes the harness specializes for.
///
/// The category decides both the prompt instruction sent to the model and the
/// scorer applied to its answer. Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Factual,
    Procedural,
    Comparative,
    Recommendation,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 4] = [
        QuestionCategory::Factual,
        QuestionCategory::Procedural,
        QuestionCategory::Comparative,
        QuestionCategory::Recommendation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Factual => "factual",
            QuestionCategory::Procedural => "procedural",
            QuestionCategory::Comparative => "comparative",
            QuestionCategory::Recommendation => "recommendation",
        }
    }

    /// Answer-style instruction appended to the prompt for this category.
    pub fn instruction(&self) -> &'static str {
        match self {
            QuestionCategory::Factual => {
                "Answer with a short, precise response. Include specific details like numbers, dates, or locations."
            }
            QuestionCategory::Procedural => {
                "Provide a step-by-step guide. Number each step clearly."
            }
            QuestionCategory::Comparative => {
                "Compare the options mentioned. Discuss similarities and differences across multiple dimensions."
            }
            QuestionCategory::Recommendation => {
                "Give personalized recommendations based on the constraints mentioned. Explain your reasoning."
            }
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionCategory {
    type Err = RagEvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factual" => Ok(QuestionCategory::Factual),
            "procedural" => Ok(QuestionCategory::Procedural),
            "comparative" => Ok(QuestionCategory::Comparative),
            "recommendation" => Ok(QuestionCategory::Recommendation),
            _ => Err(RagEvalError::InvalidCategory(s.to_string())),
        }
    }
}
