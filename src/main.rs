//! kb-harvest main entry point
//!
//! This is the command-line interface for the kb-harvest content harvester.

use anyhow::Context;
use clap::Parser;
use kb_harvest::config::{load_config_with_hash, validate, Config};
use kb_harvest::crawler::{parse_seed_list, run_crawl};
use kb_harvest::extract::PdfDocument;
use kb_harvest::output::{print_statistics, write_json, write_json_file, RunReport};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// kb-harvest: turn blogs, index pages and PDFs into knowledgebase records
///
/// Seeds may be single articles or index pages; index pages are expanded
/// into their article links. Every item becomes one JSON record with the
/// given team and user ids attached.
#[derive(Parser, Debug)]
#[command(name = "kb-harvest")]
#[command(version)]
#[command(about = "A knowledgebase content harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated seed URLs
    #[arg(short, long, value_name = "URLS", default_value = "")]
    seeds: String,

    /// Team identifier attached to every record
    #[arg(long, value_name = "ID")]
    team_id: Option<String>,

    /// User identifier attached to every record
    #[arg(long, value_name = "ID")]
    user_id: Option<String>,

    /// PDF document to ingest (repeatable)
    #[arg(long = "pdf", value_name = "FILE")]
    pdfs: Vec<PathBuf>,

    /// Write records here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write per-item failures as JSON here
    #[arg(long, value_name = "FILE")]
    diagnostics: Option<PathBuf>,

    /// Override the maximum expansion depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Override the maximum number of records
    #[arg(long, value_name = "N")]
    item_budget: Option<usize>,

    /// Crawl each seed in its own task
    #[arg(long)]
    parallel: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let seeds = parse_seed_list(&cli.seeds);

    if cli.dry_run {
        handle_dry_run(&config, &seeds, &cli.pdfs);
        return Ok(());
    }

    let documents = cli
        .pdfs
        .iter()
        .map(|path| {
            PdfDocument::from_path(path)
                .with_context(|| format!("Failed to read PDF {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    tracing::info!(
        "Harvesting {} seed(s) and {} document(s)",
        seeds.len(),
        documents.len()
    );

    let report = match run_crawl(&config, &seeds, &documents, cli.parallel, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    write_outputs(&cli, &report)?;
    print_statistics(&report.stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the JSON records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_harvest=info,warn"),
            1 => EnvFilter::new("kb_harvest=debug,info"),
            2 => EnvFilter::new("kb_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(budget) = cli.item_budget {
        config.crawler.item_budget = Some(budget);
    }
    if let Some(team_id) = &cli.team_id {
        config.attribution.team_id = team_id.clone();
    }
    if let Some(user_id) = &cli.user_id {
        config.attribution.user_id = user_id.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Cancels the run on Ctrl-C so gathered records are still written
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing with what was gathered");
            cancel.cancel();
        }
    });
}

/// Writes records to the output file or stdout, and diagnostics if requested
fn write_outputs(cli: &Cli, report: &RunReport) -> anyhow::Result<()> {
    match &cli.output {
        Some(path) => {
            write_json_file(&report.records, path)
                .with_context(|| format!("Failed to write records to {}", path.display()))?;
            tracing::info!("Wrote {} records to {}", report.records.len(), path.display());
        }
        None => {
            write_json(&report.records, std::io::stdout().lock())
                .context("Failed to write records to stdout")?;
        }
    }

    if let Some(path) = &cli.diagnostics {
        write_json_file(&report.diagnostics, path)
            .with_context(|| format!("Failed to write diagnostics to {}", path.display()))?;
        tracing::info!(
            "Wrote {} diagnostics to {}",
            report.diagnostics.len(),
            path.display()
        );
    }

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config, seeds: &[String], pdfs: &[PathBuf]) {
    println!("=== kb-harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Politeness interval: {}ms",
        config.crawler.politeness_interval
    );
    match config.crawler.item_budget {
        Some(budget) => println!("  Item budget: {}", budget),
        None => println!("  Item budget: unlimited"),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nClassifier:");
    println!(
        "  Extra denied paths: {:?}",
        config.classifier.extra_denied_paths
    );
    println!(
        "  Extra denied extensions: {:?}",
        config.classifier.extra_denied_extensions
    );

    println!("\nAttribution:");
    println!("  Team: {}", config.attribution.team_id);
    println!("  User: {}", config.attribution.user_id);
    println!(
        "  Default content type: {}",
        config.output.default_content_type
    );

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\nDocuments ({}):", pdfs.len());
    for pdf in pdfs {
        println!("  - {}", pdf.display());
    }

    println!("\n✓ Configuration is valid");
}
