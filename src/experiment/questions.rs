//! Question set loading.
//!
//! Questions live in `<dir>/<category>.txt`, one question per line.

use crate::category::QuestionCategory;
use crate::error::{RagEvalError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Questions grouped by category, in category order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionSet {
    pub by_category: BTreeMap<QuestionCategory, Vec<String>>,
}

impl QuestionSet {
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    /// Non-empty categories with their questions.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionCategory, &[String])> {
        self.by_category
            .iter()
            .filter(|(_, qs)| !qs.is_empty())
            .map(|(c, qs)| (*c, qs.as_slice()))
    }
}

/// Parse a question file: trimmed, non-blank lines.
pub fn parse_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Load the question set from `dir`.
///
/// When `dir` does not exist it is created, seeded with example question
/// files for every category, and `None` is returned so the caller can stop
/// and let the user edit them.
pub fn load_questions(dir: &Path) -> Result<Option<QuestionSet>> {
    if !dir.exists() {
        tracing::info!("Creating questions directory: {}", dir.display());
        write_example_questions(dir)?;
        return Ok(None);
    }

    let mut set = QuestionSet::default();
    for category in QuestionCategory::ALL {
        let path = dir.join(format!("{}.txt", category));
        let questions = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| RagEvalError::io(&path, e))?;
            let questions = parse_questions(&content);
            tracing::info!("Loaded {} {} questions", questions.len(), category);
            questions
        } else {
            tracing::warn!("File not found: {}", path.display());
            Vec::new()
        };
        set.by_category.insert(category, questions);
    }

    tracing::info!("Total questions: {}", set.total());
    Ok(Some(set))
}

/// Example questions written when no question directory exists yet.
pub fn example_questions(category: QuestionCategory) -> &'static [&'static str] {
    match category {
        QuestionCategory::Factual => &[
            "What is the address of NUS Central Library?",
            "How many residential colleges does NUS have?",
            "What are the operating hours of MPSH gym?",
        ],
        QuestionCategory::Procedural => &[
            "How do I apply for on-campus accommodation?",
            "What is the process for module registration?",
            "How do I book a study room in the library?",
        ],
        QuestionCategory::Comparative => &[
            "What are the differences between Halls and Residential Colleges?",
            "Compare UTown Residence and PGPR.",
            "Compare Central Library and Science Library.",
        ],
        QuestionCategory::Recommendation => &[
            "Which hall should I choose if I want an active social life?",
            "I'm on a budget. What accommodation do you recommend?",
            "Where should I eat if I'm vegetarian?",
        ],
    }
}

/// Write one example file per category into `dir`.
pub fn write_example_questions(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| RagEvalError::io(dir, e))?;

    for category in QuestionCategory::ALL {
        let path = dir.join(format!("{}.txt", category));
        fs::write(&path, example_questions(category).join("\n"))
            .map_err(|e| RagEvalError::io(&path, e))?;
        tracing::info!("Created example file: {}", path.display());
    }

    Ok(())
}
