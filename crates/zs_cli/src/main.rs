use clap::Parser;
use dialoguer::Input;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, Level};
use zs_archive::prelude::*;
use zs_archive::article_text;
use zs_inference::chunker::DEFAULT_CHUNK_COUNT;
use zs_inference::client::DEFAULT_MAX_RETRIES;
use zs_inference::prelude::*;
use zs_inference::reduce::DEFAULT_MAX_CONCURRENCY;

mod session;

const RULE: &str = "───────────────────────────────";

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be longer than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Search an offline encyclopedia dump and summarize an article", long_about = None)]
pub struct Cli {
    /// Directory holding the extracted archive (one HTML file per entry)
    #[arg(long, env = "ZS_ARCHIVE")]
    archive: PathBuf,
    /// Build a full-text index when opening the archive instead of searching titles only
    #[arg(long)]
    fulltext: bool,
    #[arg(long, env = "ZS_MODEL", default_value = "openrouter", help = "Completion backend. Available models: openrouter (default), ollama, dummy")]
    model: ModelKind,
    /// Backend model identifier, overrides the backend default
    #[arg(long, env = "ZS_MODEL_NAME")]
    model_name: Option<String>,
    /// Ollama endpoint, e.g. http://localhost:11434/gemma3:12b
    #[arg(long, env = "ZS_MODEL_URL")]
    model_url: Option<String>,
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Do not request reasoning tokens from OpenRouter
    #[arg(long)]
    no_reasoning: bool,
    /// Per-request timeout (e.g. 300s, 5m, 1m30s)
    #[arg(long, default_value = "300s")]
    timeout: HumanDuration,
    /// Retries after a timed-out request, each on half the text
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    retries: u32,
    #[arg(long, default_value_t = DEFAULT_CHUNK_COUNT)]
    chunks: usize,
    /// Maximum backend requests in flight
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    concurrency: usize,
    #[arg(long, default_value_t = MAX_RESULTS)]
    results: usize,
    /// Search query; prompted for when missing
    #[arg(long)]
    query: Option<String>,
    /// Result number to summarize; prompted for when missing
    #[arg(long)]
    pick: Option<String>,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            kind: self.model,
            api_key: self.api_key.clone(),
            model_name: self.model_name.clone(),
            model_url: self.model_url.clone(),
            reasoning: !self.no_reasoning,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: self.timeout.0,
            retry: RetryPolicy::halving(self.retries),
        }
    }

    fn reduction_config(&self) -> ReductionConfig {
        ReductionConfig {
            chunk_count: self.chunks,
            max_concurrency: self.concurrency,
            ..ReductionConfig::default()
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| Error::External(anyhow::Error::new(e)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });

    let archive = DirectoryArchive::open(ArchiveConfig::new(&cli.archive).with_fulltext(cli.fulltext)).await?;
    println!("✅ Loaded archive {} successfully!", cli.archive.display());
    if let Some(main_entry) = archive.main_entry() {
        println!("Main entry: {}\n", main_entry);
    }

    let model = create_model(&cli.inference_config()).await?;
    let model_name = model.name().to_string();
    info!("🧠 Inference model initialized successfully (using {})", model_name);
    let engine = ReductionEngine::new(SummaryClient::new(model, cli.client_config()), cli.reduction_config());

    let query = match &cli.query {
        Some(query) => query.clone(),
        None => prompt("🔍 Enter your search query")?,
    };
    let query = query.trim();
    if query.is_empty() {
        println!("⚠️ Empty query.");
        return Ok(());
    }

    let results = find_articles(&archive, query, cli.results).await?;
    if results.is_empty() {
        println!("❌ No matches found.");
        return Ok(());
    }

    println!("Found {} matches. Showing top {}:\n", results.estimated_total, results.hits.len());
    for line in session::listing(&results) {
        println!("{}", line);
    }

    let choice = match &cli.pick {
        Some(choice) => choice.clone(),
        None => prompt(&format!("\n👉 Enter article number to open (1–{})", results.hits.len()))?,
    };
    let hit = match session::select(&results.hits, &choice) {
        Ok(hit) => hit,
        Err(e) => {
            println!("⚠️ {}", e);
            return Ok(());
        }
    };

    println!("\n📄 Loading '{}' ...\n", hit);
    let article = archive.fetch(&hit.path).await?;
    let text = article_text(&article);
    info!("📝 Extracted {} chars of text from {}", text.chars().count(), article.path);

    println!("{}", RULE);
    println!("✨ Summary (parallel, {}):\n", model_name);
    let summary = engine.reduce(&text).await;
    println!("✨ Detailed Final Summary:\n");
    println!("{}", summary);
    println!("\n{}", RULE);

    Ok(())
}
