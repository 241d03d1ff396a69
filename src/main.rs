//! Pagesift main entry point
//!
//! Command-line interface for the paginated crawl-and-extract pipeline.

use clap::Parser;
use pagesift::config::{load_config_with_hash, Config};
use pagesift::crawler::spawn_crawl;
use pagesift::output::persist_results;
use pagesift::summarize::Summarizer;
use pagesift::SiftError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pagesift: crawl paginated pages, extract content, summarize, persist
///
/// Pagesift walks a chain of pages from a seed URL, extracts text, links,
/// tables and image text, optionally summarizes the text through a
/// language model, and writes document and CSV outputs.
#[derive(Parser, Debug)]
#[command(name = "pagesift")]
#[command(version)]
#[command(about = "Paginated crawl-and-extract pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Skip the language-model pass and persist extracted text as-is
    #[arg(long)]
    no_summary: bool,

    /// Append log output to this file instead of standard output
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The guard flushes buffered log lines on drop; keep it for the whole run.
    let _log_guard = setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("run failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Sets up the tracing subscriber based on verbosity and log destination
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesift=info,warn"),
            1 => EnvFilter::new("pagesift=debug,info"),
            2 => EnvFilter::new("pagesift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("pagesift.log"));

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .init();

            None
        }
    }
}

async fn run(cli: Cli) -> Result<(), SiftError> {
    tracing::info!("loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    // Built before the crawl starts: a missing credential is a
    // configuration error and must fail before any network activity.
    let summarizer = if cli.no_summary {
        None
    } else {
        match &config.llm {
            Some(llm) => Some(Summarizer::from_config(llm)?),
            None => None,
        }
    };

    // The crawl gets its own task; this loop just waits for the handle.
    let report = spawn_crawl(config.clone()).await??;
    tracing::info!(
        "crawl visited {} pages, stopped: {}",
        report.pages_visited,
        report.stop
    );

    let aggregate = report.aggregate;

    let document_blocks = match &summarizer {
        Some(summarizer) => {
            tracing::info!("summarizing {} text blocks", aggregate.texts.len());
            let mut blocks = Vec::new();
            for text in &aggregate.texts {
                blocks.push(summarizer.summarize(text).await);
            }
            for text in aggregate.image_texts.iter().filter(|t| !t.is_empty()) {
                blocks.push(summarizer.summarize(text).await);
            }
            blocks
        }
        None => aggregate
            .texts
            .iter()
            .cloned()
            .chain(
                aggregate
                    .image_texts
                    .iter()
                    .filter(|t| !t.is_empty())
                    .cloned(),
            )
            .collect(),
    };

    let written = persist_results(
        &config.output,
        &document_blocks,
        &aggregate.tables,
        &aggregate.links,
    );

    println!(
        "Crawl complete: {} pages visited ({}).",
        report.pages_visited, report.stop
    );
    if written.is_empty() {
        println!("Nothing to write.");
    } else {
        println!("Files written:");
        for path in &written {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

/// Handles --dry-run: validates config and shows what would be crawled
fn print_plan(config: &Config) {
    println!("=== Pagesift Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.crawl.seed_url);
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Retries per page: {}", config.crawl.retries);
    println!("  Image OCR workers: {}", config.crawl.workers);
    match &config.crawl.proxy {
        Some(proxy) => println!("  Proxy: {}", proxy),
        None => println!("  Proxy: none"),
    }

    println!("\nOutput:");
    println!("  Document: {}", config.output.document_path);
    println!(
        "  Tables: {}_table<N>.csv",
        config.output.tabular_prefix
    );
    println!("  Links: {}_links.csv", config.output.tabular_prefix);

    match &config.llm {
        Some(llm) => println!(
            "\nSummarization: model {}, chunks of {} chars",
            llm.model, llm.max_chunk_chars
        ),
        None => println!("\nSummarization: disabled (no [llm] section)"),
    }

    match &config.ocr {
        Some(ocr) => println!("Image OCR: {}", ocr.endpoint),
        None => println!("Image OCR: disabled (no [ocr] section)"),
    }

    println!("\n✓ Configuration is valid");
}
