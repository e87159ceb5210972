//! Crawler module for fetching, traversal and record production
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link extraction
//! - The deduplicated breadth-first frontier
//! - The single-run driver and the parallel pool
//! - Ingestion of uploaded PDF documents

mod driver;
mod fetcher;
mod frontier;
mod parser;
mod pool;

pub use driver::{CrawlDriver, DriverSettings};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::extract_links;
pub use pool::run_parallel;

use crate::config::Config;
use crate::extract::{ExtractedContent, PdfDocument, PdfExtractor};
use crate::output::{ContentType, Diagnostic, FailureKind, OutputRecord, RecordAssembler, RunReport};
use crate::state::RunState;
use crate::{HarvestError, Result};
use tokio_util::sync::CancellationToken;

/// Splits a comma-separated seed string into trimmed, non-empty seeds
pub fn parse_seed_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns uploaded PDFs into `book` records
///
/// Each record's `source_url` is the document's file name and its title is
/// derived from that name. Documents that yield no text become
/// `extraction_failure` diagnostics.
pub fn ingest_documents(
    documents: &[PdfDocument],
    extractor: &dyn PdfExtractor,
    assembler: &RecordAssembler,
) -> (Vec<OutputRecord>, Vec<Diagnostic>) {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for doc in documents {
        match extractor.extract_pdf_text(&doc.bytes) {
            Ok(body) => {
                let extracted = ExtractedContent {
                    title: doc.title(),
                    body,
                    author: None,
                };
                tracing::info!("Ingested document {}", doc.name);
                records.push(assembler.assemble(extracted, &doc.name, Some(ContentType::Book)));
            }
            Err(e) => {
                let diagnostic =
                    Diagnostic::new(&doc.name, FailureKind::ExtractionFailure, e.to_string());
                tracing::warn!("Skipping {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    (records, diagnostics)
}

/// Runs a complete harvest
///
/// This is the main entry point used by the binary. It will:
/// 1. Build the HTTP client and default extractors from `config`
/// 2. Ingest any uploaded PDF documents
/// 3. Crawl the seeds, sequentially or one task per seed when `parallel`
/// 4. Merge everything into one report
///
/// Fails with [`HarvestError::NoSeeds`] only when there is nothing at all to
/// harvest.
///
/// # Example
///
/// ```no_run
/// use kb_harvest::config::Config;
/// use kb_harvest::crawler::run_crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://example.com/blog".to_string()];
/// let report = run_crawl(&Config::default(), &seeds, &[], false, &CancellationToken::new()).await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    seeds: &[String],
    documents: &[PdfDocument],
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<RunReport> {
    if seeds.is_empty() && documents.is_empty() {
        return Err(HarvestError::NoSeeds);
    }

    let driver = CrawlDriver::from_config(config)?;

    let (records, diagnostics) =
        ingest_documents(documents, &crate::extract::PdfTextExtractor::new(), driver.assembler());

    let mut report = RunReport::empty(RunState::Drained);
    report.stats.records = records.len() as u64;
    report.stats.failures = diagnostics.len() as u64;
    report.records = records;
    report.diagnostics = diagnostics;

    if seeds.is_empty() {
        return Ok(report);
    }

    let crawled = if parallel {
        run_parallel(&driver, seeds, config.crawler.channel_capacity, cancel).await?
    } else {
        driver.run(seeds, cancel).await?
    };
    report.absorb(crawled);

    Ok(report)
}
