//! RAG Category Eval CLI
//!
//! Build the document store, run multi-model experiments and score answers.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use rag_category_eval::{
    category::QuestionCategory,
    chunker::ChunkConfig,
    config::{Config, parse_model_list},
    document::Corpus,
    embedding::load_embedder,
    evaluator::Evaluator,
    experiment::{
        ExperimentRunner, ResultsDir, format_summary_table, load_questions, load_summary,
    },
    llm::{LlmClient, PromptBuilder},
    persistence::{SaveFormat, load_store, save_store, store_size},
    rag::RagSystem,
    store::build_store,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// RAG Category Eval - compare LLMs with heuristic, category-aware answer scoring
#[derive(Parser)]
#[command(name = "rag-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreFormat {
    Json,
    Bincode,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector store from the documents directory
    Build {
        /// Documents directory (.txt and .md files)
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// On-disk format of the collection
        #[arg(long, value_enum, default_value = "json")]
        format: StoreFormat,
    },

    /// Run the experiment over all configured models
    Run {
        /// Comma-separated model list (overrides config)
        #[arg(short, long)]
        models: Option<String>,

        /// Number of chunks retrieved per question (overrides config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Ask one question with one model and score the answer
    Query {
        /// The question
        question: String,

        /// Model to answer with
        #[arg(short, long)]
        model: String,

        /// Question category
        #[arg(long)]
        category: String,

        /// Print the retrieved chunks
        #[arg(long)]
        show_context: bool,
    },

    /// Score an answer without calling any model
    Evaluate {
        /// Question category
        #[arg(long)]
        category: String,

        /// Answer text (use --file to read it from a file instead)
        answer: Option<String>,

        /// Read the answer from a file
        #[arg(short, long, conflicts_with = "answer")]
        file: Option<PathBuf>,
    },

    /// Print the summary table of a finished experiment
    Summary {
        /// Experiment directory or summary.json
        path: PathBuf,
    },

    /// Test LLM connection
    Test {
        /// Model to test (defaults to the first configured model)
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("rag_category_eval=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rag_category_eval=info,warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Build { docs, format } => cmd_build(load_config(config_path)?, docs, format),
        Commands::Run { models, top_k } => {
            cmd_run(load_config(config_path)?, models, top_k).await
        }
        Commands::Query {
            question,
            model,
            category,
            show_context,
        } => {
            let config = load_config(config_path)?;
            cmd_query(config, question, model, category, show_context).await
        }
        Commands::Evaluate {
            category,
            answer,
            file,
        } => cmd_evaluate(category, answer, file),
        Commands::Summary { path } => cmd_summary(path),
        Commands::Test { model } => cmd_test(load_config(config_path)?, model).await,
    }
}

/// Only commands that index, retrieve or call a model read the configuration.
fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load configuration")
}

fn cmd_build(config: Config, docs: Option<PathBuf>, format: StoreFormat) -> Result<()> {
    config.retrieval.validate().context("Invalid configuration")?;
    let docs_dir = docs.unwrap_or(config.experiment.docs_dir);
    let db_path = config.experiment.db_path;

    println!("Building vector store from: {}", docs_dir.display());
    println!("Store will be saved to: {}", db_path.display());

    let start = Instant::now();
    let corpus = Corpus::load(&docs_dir).context("Failed to load documents")?;
    if corpus.is_empty() {
        println!("No documents found in {}", docs_dir.display());
        println!("Please add .txt or .md files and run build again.");
        return Ok(());
    }
    println!("Found {} documents", corpus.len());

    let chunk_config = ChunkConfig {
        chunk_size: config.retrieval.chunk_size,
        chunk_overlap: config.retrieval.chunk_overlap,
    };
    let embedder = load_embedder(&config.retrieval).context("Failed to load embedder")?;
    let (store, report) = build_store(
        &corpus,
        &config.retrieval.collection,
        &chunk_config,
        embedder.as_ref(),
    )
    .context("Failed to build vector store")?;

    let format = match format {
        StoreFormat::Json => SaveFormat::Json,
        StoreFormat::Bincode => SaveFormat::Bincode,
    };
    let path = save_store(&store, &db_path, format).context("Failed to save vector store")?;
    let size = store_size(&path)?;

    println!();
    for doc in &report.documents {
        println!("  {}: {} chunks", doc.source, doc.chunks);
    }
    println!("\nStore built:");
    println!("  Embedder:    {}", store.embedder);
    println!("  Chunks:      {}", report.total_chunks);
    if report.replaced_chunks > 0 {
        println!(
            "  Replaced:    {} (files sharing a name overwrite each other)",
            report.replaced_chunks
        );
    }
    println!("  Build time:  {:.2?}", start.elapsed());
    println!("  Saved to:    {}", path.display());
    println!("  File size:   {:.1} KB", size as f64 / 1024.0);

    Ok(())
}

fn open_rag(config: &Config) -> Result<RagSystem<LlmClient>> {
    let store = load_store(&config.experiment.db_path, &config.retrieval.collection)
        .context("Failed to open vector store. Run the 'build' command first")?;
    let client = LlmClient::new(config.llm.clone()).context("Failed to create LLM client")?;
    let embedder = load_embedder(&config.retrieval).context("Failed to load embedder")?;

    let rag = RagSystem::new(
        store,
        embedder,
        client,
        PromptBuilder::new(config.experiment.persona.clone()),
        config.llm.temperature,
    )?;
    Ok(rag)
}

async fn cmd_run(mut config: Config, models: Option<String>, top_k: Option<usize>) -> Result<()> {
    if let Some(models) = models {
        config.experiment.models = parse_model_list(&models);
    }
    if let Some(top_k) = top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate().context("Invalid configuration")?;

    let Some(questions) =
        load_questions(&config.experiment.questions_dir).context("Failed to load questions")?
    else {
        println!(
            "Example question files written to {}.",
            config.experiment.questions_dir.display()
        );
        println!("Edit them (one question per line) and run again.");
        return Ok(());
    };

    let rag = open_rag(&config)?;

    println!("Models to test: {}", config.experiment.models.join(", "));
    println!("Questions:      {}", questions.total());

    let started = Local::now();
    let output = ResultsDir::create(&config.experiment.results_dir, started)
        .context("Failed to create results directory")?;
    println!("Results will be saved to: {}", output.path.display());

    let start = Instant::now();
    let results = ExperimentRunner::new(&rag, config.retrieval.top_k)
        .run(&config.experiment.models, &questions, Some(&output))
        .await
        .context("Experiment failed")?;

    let summary = results.summary(Local::now());
    let summary_path = output.save_summary(&summary)?;

    println!("\n{}", "=".repeat(80));
    println!("EXPERIMENT SUMMARY");
    println!("{}\n", "=".repeat(80));
    print!("{}", format_summary_table(&summary));
    println!("\nSummary saved to: {}", summary_path.display());
    println!("Completed in {:.1?}", start.elapsed());

    Ok(())
}

async fn cmd_query(
    config: Config,
    question: String,
    model: String,
    category: String,
    show_context: bool,
) -> Result<()> {
    let category: QuestionCategory = category.parse()?;
    config.retrieval.validate().context("Invalid configuration")?;
    let rag = open_rag(&config)?;

    let result = rag
        .query(&question, &model, category, config.retrieval.top_k)
        .await
        .context("Query failed")?;

    if show_context {
        println!("Retrieved:");
        println!("{}", "─".repeat(60));
        for (i, doc) in result.retrieved_docs.iter().enumerate() {
            let preview: String = doc.content.chars().take(200).collect();
            println!(
                "{:>2}. {} #{} (distance {:.3})",
                i + 1,
                doc.metadata.source,
                doc.metadata.chunk_idx,
                doc.distance.unwrap_or_default()
            );
            println!("    {}", preview);
        }
        println!("{}", "─".repeat(60));
    }

    if !result.success {
        anyhow::bail!(
            "Generation failed: {}",
            result.error.as_deref().unwrap_or("Unknown error")
        );
    }

    println!("Answer ({}):\n{}\n", model, result.answer);
    let evaluation = Evaluator::evaluate_category(&result.answer, category);
    println!("{}", serde_json::to_string_pretty(&evaluation)?);

    Ok(())
}

fn cmd_evaluate(category: String, answer: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let answer = match (answer, file) {
        (Some(answer), _) => answer,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read answer from {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide the answer text or --file"),
    };

    let evaluation = Evaluator::evaluate(&answer, &category)?;
    println!("{}", serde_json::to_string_pretty(&evaluation)?);

    Ok(())
}

fn cmd_summary(path: PathBuf) -> Result<()> {
    let summary = load_summary(&path).context("Failed to load summary")?;

    println!("Experiment from {}", summary.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!();
    print!("{}", format_summary_table(&summary));

    Ok(())
}

async fn cmd_test(config: Config, model: Option<String>) -> Result<()> {
    println!("Testing LLM connection...\n");

    let Some(model) = model.or_else(|| config.experiment.models.first().cloned()) else {
        anyhow::bail!("No model given and none configured");
    };

    println!("Configuration:");
    println!("  Backend:   {:?}", config.llm.backend);
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", model);
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm)?;

    println!("Sending test request...");
    match client.test_connection(&model).await {
        Ok(()) => println!("Connection successful!"),
        Err(e) => println!("Connection failed: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_category_eval::experiment::ExperimentResults;
    use tempfile::TempDir;

    #[test]
    fn test_offline_commands_ignore_broken_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "llm: [not, a, map]").unwrap();
        assert!(load_config(Some(&config_path)).is_err());

        let cli = Cli::try_parse_from([
            "rag-eval",
            "--config",
            config_path.to_str().unwrap(),
            "evaluate",
            "--category",
            "factual",
            "Central Library opens at 8am.",
        ])
        .unwrap();
        let Commands::Evaluate {
            category,
            answer,
            file,
        } = cli.command
        else {
            panic!("expected the evaluate command");
        };
        assert!(cmd_evaluate(category, answer, file).is_ok());

        let results_dir = ResultsDir::create(dir.path(), Local::now()).unwrap();
        let summary = ExperimentResults::default().summary(Local::now());
        results_dir.save_summary(&summary).unwrap();
        assert!(cmd_summary(results_dir.path.clone()).is_ok());
    }

    #[test]
    fn test_evaluate_rejects_capitalised_category() {
        let result = cmd_evaluate("Factual".to_string(), Some("8am".to_string()), None);
        assert!(result.is_err());
    }
}
