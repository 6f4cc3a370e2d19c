use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use safecheck_rs::analysis::category_breakdown;
use safecheck_rs::dataset::{load_dataset, Domain};
use safecheck_rs::llm::openai::LlmClient;
use safecheck_rs::retrieve::{DenseSearcher, Retriever};
use safecheck_rs::scoring::score_log_file;
use safecheck_rs::{ArtifactPaths, CheckConfig, Mode, RetryPolicy, Verifier};

#[derive(Parser)]
#[command(name = "safecheck", version, about = "Unified language safety checking with LLMs")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Directory holding {task}_claims.jsonl files
    #[arg(long, default_value = "./ulsc_data")]
    data_dir: PathBuf,
    /// Directory for check logs and auxiliary artifacts
    #[arg(long, default_value = "./log")]
    log_dir: PathBuf,
}

#[derive(Subcommand)]
enum Cmd {
    /// Live evaluation: query the judge per claim, write the check log,
    /// print accuracy and recomputed F1.
    Run {
        #[arg(short, long)]
        task: Domain,
        #[arg(short, long)]
        mode: Mode,
        /// Index of the first sample to process
        #[arg(short, long, default_value_t = 0)]
        start_idx: usize,
        /// Name tag for the experiment log file
        #[arg(short = 'n', long, default_value = "joint")]
        exp_name: String,
        /// Print the first claim's full exchange and stop
        #[arg(short, long)]
        verbose: bool,
        #[arg(long, default_value = "gpt-3.5-turbo")]
        model: String,
        /// OpenAI-compatible endpoint override
        #[arg(long)]
        base_url: Option<String>,
        /// Dense-retrieval service for probe background context
        #[arg(long)]
        search_url: Option<String>,
        /// Directory holding exemplar prompt files
        #[arg(long, default_value = "./general_prompts")]
        prompt_dir: PathBuf,
    },
    /// Offline REFUTES-class F1 over an existing check log.
    Score {
        #[arg(short, long)]
        task: Domain,
        #[arg(short, long)]
        mode: Mode,
        #[arg(short = 'n', long, default_value = "joint")]
        exp_name: String,
    },
    /// Per-category accuracy breakdown over an existing check log, as JSON.
    Analyze {
        #[arg(short, long)]
        task: Domain,
        #[arg(short, long)]
        mode: Mode,
        #[arg(short = 'n', long, default_value = "joint")]
        exp_name: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run {
            task,
            mode,
            start_idx,
            exp_name,
            verbose,
            model,
            base_url,
            search_url,
            prompt_dir,
        } => {
            let cfg = CheckConfig::new(model).load_exemplars(&prompt_dir);
            let api_key = std::env::var("OPENAI_API_KEY").ok();
            let llm = Arc::new(LlmClient::new(
                cfg.model_id.clone(),
                base_url,
                api_key,
                RetryPolicy::default(),
            ));
            let retriever: Option<Arc<dyn Retriever>> = match search_url {
                Some(url) => Some(Arc::new(DenseSearcher::new(url, 5, 10_000)?)),
                None => None,
            };

            let dataset = load_dataset(task, &cli.data_dir)?;
            let dataset = &dataset[start_idx.min(dataset.len())..];

            std::fs::create_dir_all(&cli.log_dir)?;
            let out = ArtifactPaths::new(&cli.log_dir, &task.to_string(), mode, &exp_name);

            let verifier = Verifier::new(llm, retriever, cfg);
            let summary = verifier.verify_dataset(dataset, mode, &out, verbose).await?;
            if summary.debug_stopped {
                return Ok(());
            }

            let f1 = score_log_file(&out.log)?;
            println!("\nAcc = {}\nF1 = {}\n", summary.accuracy, f1.f1);
        }
        Cmd::Score { task, mode, exp_name } => {
            let out = ArtifactPaths::new(&cli.log_dir, &task.to_string(), mode, &exp_name);
            let s = score_log_file(&out.log)?;
            println!("Recall = {}\nPrecision = {}\nF1 = {}", s.recall, s.precision, s.f1);
        }
        Cmd::Analyze { task, mode, exp_name, top } => {
            let out = ArtifactPaths::new(&cli.log_dir, &task.to_string(), mode, &exp_name);
            let text = std::fs::read_to_string(&out.log)?;
            let buckets = category_breakdown(&text, top);
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
    }
    Ok(())
}
