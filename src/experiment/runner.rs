//! Runs every question through every model and scores the answers.

use super::questions::QuestionSet;
use super::report::{CategoryReport, ExperimentResults, ModelReport, QuestionRecord, ResultsDir};
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::llm::Generator;
use crate::rag::RagSystem;

/// Sequences RAG queries and evaluation across models.
pub struct ExperimentRunner<'a, G> {
    rag: &'a RagSystem<G>,
    top_k: usize,
}

impl<'a, G: Generator> ExperimentRunner<'a, G> {
    pub fn new(rag: &'a RagSystem<G>, top_k: usize) -> Self {
        Self { rag, top_k }
    }

    /// Run all models over the question set.
    ///
    /// Each model's report is written to `output` as soon as it finishes.
    pub async fn run(
        &self,
        models: &[String],
        questions: &QuestionSet,
        output: Option<&ResultsDir>,
    ) -> Result<ExperimentResults> {
        let mut results = ExperimentResults::default();

        for model in models {
            tracing::info!("Testing model: {}", model);
            let report = self.run_model(model, questions).await?;

            if let Some(dir) = output {
                let path = dir.save_model(model, &report)?;
                tracing::info!("Saved: {}", path.display());
            }
            results.models.push((model.clone(), report));
        }

        Ok(results)
    }

    /// Run one model over every non-empty category.
    pub async fn run_model(&self, model: &str, questions: &QuestionSet) -> Result<ModelReport> {
        let mut report = ModelReport::new();

        for (category, category_questions) in questions.iter() {
            tracing::info!("Question type: {}", category.as_str().to_uppercase());
            let mut records = Vec::with_capacity(category_questions.len());

            for (i, question) in category_questions.iter().enumerate() {
                tracing::debug!("[{}/{}] {}", i + 1, category_questions.len(), question);
                let result = self.rag.query(question, model, category, self.top_k).await?;

                if !result.success {
                    tracing::warn!(
                        "Failed: {}",
                        result.error.as_deref().unwrap_or("Unknown error")
                    );
                    continue;
                }

                let evaluation = Evaluator::evaluate_category(&result.answer, category);
                records.push(QuestionRecord {
                    question: result.question,
                    answer: result.answer,
                    retrieved_docs_count: result.retrieved_docs.len(),
                    evaluation,
                });
            }

            if let Some(category_report) = CategoryReport::from_records(records) {
                tracing::info!("Average score: {:.3}", category_report.average_score);
                report.insert(category, category_report);
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::QuestionCategory;
    use crate::rag::tests::{ScriptedGenerator, rag};
    use chrono::Local;
    use tempfile::TempDir;

    fn questions() -> QuestionSet {
        let mut set = QuestionSet::default();
        set.by_category.insert(
            QuestionCategory::Factual,
            vec!["When does the library open?".to_string(), "Where is it?".to_string()],
        );
        set.by_category
            .insert(QuestionCategory::Procedural, Vec::new());
        set
    }

    #[tokio::test]
    async fn test_run_scores_each_model() {
        let system = rag(ScriptedGenerator::new(&[
            ("good", "Central Library opens at 8am."),
            ("vague", "It might open in the morning, unclear."),
        ]));
        let runner = ExperimentRunner::new(&system, 2);
        let models = vec!["good".to_string(), "vague".to_string()];

        let results = runner.run(&models, &questions(), None).await.unwrap();

        assert_eq!(results.models.len(), 2);
        let good = &results.models[0].1[&QuestionCategory::Factual];
        let vague = &results.models[1].1[&QuestionCategory::Factual];
        assert_eq!(good.questions_count, 2);
        assert_eq!(good.details[0].retrieved_docs_count, 2);
        assert!(good.average_score > vague.average_score);
        // Empty categories produce no entry.
        assert!(!results.models[0].1.contains_key(&QuestionCategory::Procedural));
    }

    #[tokio::test]
    async fn test_failed_generations_are_skipped() {
        let system = rag(ScriptedGenerator::default());
        let runner = ExperimentRunner::new(&system, 1);

        let report = runner.run_model("offline", &questions()).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_model_reports_are_saved() {
        let dir = TempDir::new().unwrap();
        let output = ResultsDir::create(dir.path(), Local::now()).unwrap();
        let system = rag(ScriptedGenerator::new(&[("phi3:mini", "8am")]));
        let runner = ExperimentRunner::new(&system, 1);

        runner
            .run(&["phi3:mini".to_string()], &questions(), Some(&output))
            .await
            .unwrap();

        assert!(output.path.join("phi3_mini.json").is_file());
    }
}
