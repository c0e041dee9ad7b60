//! Multi-model experiments.
//!
//! This module provides:
//! - Question set loading (one file per category)
//! - The runner that queries every model and scores each answer
//! - Per-model reports and the run summary written to disk

pub mod questions;
pub mod report;
pub mod runner;

pub use questions::{QuestionSet, load_questions, write_example_questions};
pub use report::{
    CategoryReport, CategorySummary, ExperimentResults, ExperimentSummary, ModelReport,
    QuestionRecord, ResultsDir, format_summary_table, load_summary,
};
pub use runner::ExperimentRunner;
