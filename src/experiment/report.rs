//! Experiment result records, aggregation and persistence.

use crate::category::QuestionCategory;
use crate::error::{RagEvalError, Result};
use crate::evaluator::{EvaluationResult, round3};
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One answered and scored question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
    pub retrieved_docs_count: usize,
    pub evaluation: EvaluationResult,
}

/// All scored answers of one model for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub questions_count: usize,
    /// Mean `total_score`, rounded to three decimals.
    pub average_score: f64,
    pub details: Vec<QuestionRecord>,
}

impl CategoryReport {
    /// Aggregate records; `None` when there is nothing to average.
    pub fn from_records(details: Vec<QuestionRecord>) -> Option<Self> {
        if details.is_empty() {
            return None;
        }

        let sum: f64 = details.iter().map(|r| r.evaluation.total_score()).sum();
        Some(Self {
            questions_count: details.len(),
            average_score: round3(sum / details.len() as f64),
            details,
        })
    }
}

/// A model's results keyed by category.
pub type ModelReport = BTreeMap<QuestionCategory, CategoryReport>;

/// Per-category count and average, without the answer details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub questions_count: usize,
    pub average_score: f64,
}

/// The `summary.json` written at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub timestamp: DateTime<Local>,
    /// Keyed by model, in the order the models were tested.
    pub models: IndexMap<String, BTreeMap<QuestionCategory, CategorySummary>>,
}

/// Results of a full run, in the order the models were tested.
#[derive(Debug, Clone, Default)]
pub struct ExperimentResults {
    pub models: Vec<(String, ModelReport)>,
}

impl ExperimentResults {
    pub fn summary(&self, timestamp: DateTime<Local>) -> ExperimentSummary {
        let models = self
            .models
            .iter()
            .map(|(model, report)| {
                let categories = report
                    .iter()
                    .map(|(category, data)| {
                        (
                            *category,
                            CategorySummary {
                                questions_count: data.questions_count,
                                average_score: data.average_score,
                            },
                        )
                    })
                    .collect();
                (model.clone(), categories)
            })
            .collect();

        ExperimentSummary { timestamp, models }
    }
}

/// File name for a model's results; `:` is not portable in file names.
pub fn model_file_name(model: &str) -> String {
    format!("{}.json", model.replace(':', "_"))
}

/// A timestamped directory holding one experiment's output.
#[derive(Debug, Clone)]
pub struct ResultsDir {
    pub path: PathBuf,
}

impl ResultsDir {
    /// Create `<root>/experiment_<YYYYmmdd_HHMMSS>`.
    pub fn create(root: &Path, started: DateTime<Local>) -> Result<Self> {
        let path = root.join(format!("experiment_{}", started.format("%Y%m%d_%H%M%S")));
        fs::create_dir_all(&path).map_err(|e| RagEvalError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn save_model(&self, model: &str, report: &ModelReport) -> Result<PathBuf> {
        let path = self.path.join(model_file_name(model));
        write_json(&path, report)?;
        Ok(path)
    }

    pub fn save_summary(&self, summary: &ExperimentSummary) -> Result<PathBuf> {
        let path = self.path.join("summary.json");
        write_json(&path, summary)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| RagEvalError::Serialization(e.to_string()))?;
    fs::write(path, json).map_err(|e| RagEvalError::io(path, e))
}

/// Read a `summary.json` (or the directory that contains one).
pub fn load_summary(path: &Path) -> Result<ExperimentSummary> {
    let path = if path.is_dir() {
        path.join("summary.json")
    } else {
        path.to_path_buf()
    };
    let content = fs::read_to_string(&path).map_err(|e| RagEvalError::io(&path, e))?;
    serde_json::from_str(&content).map_err(|e| RagEvalError::Serialization(e.to_string()))
}

/// Render the summary as a fixed-width table.
pub fn format_summary_table(summary: &ExperimentSummary) -> String {
    let rule = "-".repeat(80);
    let mut out = format!(
        "{:<20} {:<20} {:<12} {:<12}\n{}\n",
        "Model", "Type", "Questions", "Avg Score", rule
    );

    for (model, categories) in &summary.models {
        for (category, data) in categories {
            out.push_str(&format!(
                "{:<20} {:<20} {:<12} {:<12.3}\n",
                model,
                category.as_str(),
                data.questions_count,
                data.average_score
            ));
        }
        out.push_str(&rule);
        out.push('\n');
    }

    out
}
