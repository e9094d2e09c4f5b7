// src/main.rs
mod analysis;
mod batch;
mod dom;
mod extractors;
mod models;
mod source;
mod storage;
mod utils;

use clap::{Parser, Subcommand};
use extractors::ProfileExtractor;
use source::client::{DEFAULT_DELAY_MS, DEFAULT_USER_AGENT};
use source::{HttpSource, SnapshotSource};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::StorageManager;
use utils::AppError;

const DELAY_ENV: &str = "PROFILE_FETCH_DELAY_MS";
const USER_AGENT_ENV: &str = "PROFILE_USER_AGENT";

/// Command Line Interface for the profile extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log strategy decisions (debug level) unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch profile documents and extract one record per subject
    Scrape {
        /// File with one profile URL per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Profile URL to process (repeatable)
        #[arg(short, long = "subject")]
        subjects: Vec<String>,

        /// Read saved pages from this directory instead of fetching over HTTP
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// Output directory for rows and metadata
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,

        /// Delay before each HTTP request in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Debug mode - save fetched and annotated pages
        #[arg(short, long)]
        debug: bool,
    },
    /// Summarize previously extracted rows
    Analyze {
        /// Rows file written by `scrape`
        #[arg(short, long, default_value = "./output/profiles.jsonl")]
        input: PathBuf,

        /// Print the summary as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    match args.command {
        Command::Scrape { input, subjects, snapshots, output_dir, delay_ms, debug } => {
            let subjects = collect_subjects(input.as_deref(), subjects)?;
            run_scrape(&subjects, snapshots, &output_dir, delay_ms, debug).await
        }
        Command::Analyze { input, json } => run_analyze(&input, json),
    }
}

fn collect_subjects(input: Option<&Path>, mut subjects: Vec<String>) -> Result<Vec<String>, AppError> {
    if let Some(path) = input {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read subject list '{}': {}", path.display(), e)))?;
        let listed = batch::parse_subject_list(&text);
        tracing::info!("Loaded {} profiles from {}", listed.len(), path.display());
        subjects.extend(listed);
    }
    if subjects.is_empty() {
        tracing::info!("Using fallback profile URL for testing");
        subjects.push(batch::FALLBACK_PROFILE_URL.to_string());
    }
    Ok(subjects)
}

// Flag first, then environment, then the built-in default.
fn resolve_delay(flag: Option<u64>) -> Result<Duration, AppError> {
    let millis = match flag {
        Some(ms) => ms,
        None => match std::env::var(DELAY_ENV) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{} must be a number of milliseconds, got '{}'", DELAY_ENV, value)))?,
            Err(_) => DEFAULT_DELAY_MS,
        },
    };
    tracing::debug!("Using fetch delay of {} ms", millis);
    Ok(Duration::from_millis(millis))
}

async fn run_scrape(
    subjects: &[String],
    snapshots: Option<PathBuf>,
    output_dir: &Path,
    delay_ms: Option<u64>,
    debug: bool,
) -> Result<(), AppError> {
    let storage = StorageManager::new(output_dir)?;
    let extractor = ProfileExtractor::new();
    let debug_storage = debug.then_some(&storage);

    let records = match snapshots {
        Some(dir) => {
            tracing::info!("Reading saved pages from {}", dir.display());
            let source = SnapshotSource::new(dir);
            batch::scrape_profiles(&source, subjects, &extractor, debug_storage).await
        }
        None => {
            let user_agent = std::env::var(USER_AGENT_ENV).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
            let source = HttpSource::new(&user_agent, resolve_delay(delay_ms)?)?;
            batch::scrape_profiles(&source, subjects, &extractor, debug_storage).await
        }
    };

    let path = storage.save_records(&records)?;
    storage.save_batch_metadata(&records)?;

    let extracted = records.iter().filter(|r| !r.is_empty()).count();
    tracing::info!(
        "Processing finished. Extracted: {}, Empty: {}. Data saved to {}",
        extracted,
        records.len() - extracted,
        path.display()
    );

    if extracted == 0 {
        return Err(AppError::Processing(format!(
            "No profile data could be extracted from {} subjects",
            records.len()
        )));
    }
    Ok(())
}

fn run_analyze(input: &Path, json: bool) -> Result<(), AppError> {
    let rows = storage::load_rows(input)?;
    let summary = analysis::summarize(&rows);

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::Processing(format!("Failed to encode summary: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", analysis::render_report(&summary, analysis::REPORT_TOP_N));
    }
    Ok(())
}
