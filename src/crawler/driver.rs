//! Crawl driver - orchestration of a single run
//!
//! This module contains the main crawl loop that coordinates:
//! - Seeding the frontier and reporting invalid seeds
//! - Politeness waits between fetches
//! - Fetching, classifying and expanding pages
//! - Extracting content items into records
//! - The run state machine, cancellation and the item budget

use crate::classifier::{LinkClassifier, PageClassification};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::extract::{
    title_from_file_name, ContentExtractor, ExtractedContent, ExtractionError, HtmlExtractor,
    PdfExtractor, PdfTextExtractor,
};
use crate::output::{
    Attribution, ContentType, Diagnostic, FailureKind, OutputRecord, RecordAssembler, RunReport,
};
use crate::state::{HostGate, ItemBudget, PolitenessState, RunState};
use crate::url::{normalize_url, CanonicalUrl};
use crate::{HarvestError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Traversal limits for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Pages at this depth or deeper are never expanded
    pub max_depth: u32,

    /// Minimum gap between the end of one fetch and the start of the next
    pub politeness_interval: Duration,

    /// Stop after this many records
    pub item_budget: Option<usize>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for DriverSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            politeness_interval: Duration::from_millis(config.politeness_interval),
            item_budget: config.item_budget,
        }
    }
}

/// Mutable state owned by one invocation of [`CrawlDriver::run`]
struct RunContext {
    state: RunState,
    frontier: Frontier,
    politeness: PolitenessState,
    report: RunReport,
}

impl RunContext {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
            frontier: Frontier::new(),
            politeness: PolitenessState::new(),
            report: RunReport::empty(RunState::Idle),
        }
    }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Run state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn budget_reached(&self, budget: Option<usize>) -> bool {
        budget.is_some_and(|budget| self.report.stats.records as usize >= budget)
    }

    fn fail(&mut self, url: &str, kind: FailureKind, reason: impl Into<String>) {
        let diagnostic = Diagnostic::new(url, kind, reason);
        tracing::warn!("Skipping {}", diagnostic);
        self.report.stats.failures += 1;
        self.report.diagnostics.push(diagnostic);
    }

    fn finish(mut self, started: Instant) -> RunReport {
        self.report.state = self.state;
        self.report.stats.elapsed_ms = started.elapsed().as_millis() as u64;
        self.report
    }
}

/// Orchestrates one crawl run from seeds to records
///
/// Fetching and extraction are injected as trait objects; the driver itself
/// holds no per-run state, so one driver can be cloned into many tasks.
#[derive(Clone)]
pub struct CrawlDriver {
    settings: DriverSettings,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn ContentExtractor>,
    pdf_extractor: Arc<dyn PdfExtractor>,
    classifier: Arc<LinkClassifier>,
    assembler: RecordAssembler,
    host_gate: Option<HostGate>,
    shared_budget: Option<ItemBudget>,
    sink: Option<mpsc::Sender<OutputRecord>>,
}

impl CrawlDriver {
    pub fn new(
        settings: DriverSettings,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn ContentExtractor>,
        pdf_extractor: Arc<dyn PdfExtractor>,
        classifier: LinkClassifier,
        assembler: RecordAssembler,
    ) -> Self {
        Self {
            settings,
            fetcher,
            extractor,
            pdf_extractor,
            classifier: Arc::new(classifier),
            assembler,
            host_gate: None,
            shared_budget: None,
            sink: None,
        }
    }

    /// Builds a driver with the stock HTTP fetcher and extractors
    ///
    /// Fails only if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.crawler.request_timeout);
        let fetcher = HttpFetcher::from_config(&config.user_agent, timeout)?;

        Ok(Self::new(
            DriverSettings::from(&config.crawler),
            Arc::new(fetcher),
            Arc::new(HtmlExtractor::new()),
            Arc::new(PdfTextExtractor::new()),
            LinkClassifier::from_config(&config.classifier),
            RecordAssembler::new(
                Attribution::from(&config.attribution),
                config.output.default_content_type,
            ),
        ))
    }

    /// Shares a per-host gate with other drivers
    pub fn with_host_gate(mut self, gate: HostGate) -> Self {
        self.host_gate = Some(gate);
        self
    }

    /// Counts records against a budget shared with other drivers
    pub fn with_shared_budget(mut self, budget: ItemBudget) -> Self {
        self.shared_budget = Some(budget);
        self
    }

    /// Sends records to `sink` as they are produced instead of keeping them
    pub fn with_sink(mut self, sink: mpsc::Sender<OutputRecord>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    pub fn assembler(&self) -> &RecordAssembler {
        &self.assembler
    }

    /// Runs a crawl from `seeds` until the frontier drains, the item budget
    /// is reached, or `cancel` fires
    ///
    /// Invalid seeds become `invalid_url` diagnostics. The only error is an
    /// empty seed list.
    pub async fn run(&self, seeds: &[String], cancel: &CancellationToken) -> Result<RunReport> {
        if seeds.is_empty() {
            return Err(HarvestError::NoSeeds);
        }

        let started = Instant::now();
        let mut ctx = RunContext::new();

        for seed in seeds {
            match normalize_url(seed, None) {
                Ok(url) => {
                    if !ctx.frontier.push(FrontierEntry::seed(url)) {
                        tracing::debug!("Duplicate seed {}", seed);
                    }
                }
                Err(e) => ctx.fail(seed, FailureKind::InvalidUrl, e.to_string()),
            }
        }

        if cancel.is_cancelled() {
            tracing::info!("Run cancelled before start");
            ctx.transition(RunState::Aborted)?;
            return Ok(ctx.finish(started));
        }

        ctx.transition(RunState::Running)?;
        tracing::info!("Starting run with {} seed(s)", ctx.frontier.len());

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Run cancelled, stopping");
                ctx.transition(RunState::Aborted)?;
                break;
            }

            if ctx.budget_reached(self.settings.item_budget) || self.shared_budget_spent() {
                tracing::info!("Item budget reached, stopping");
                ctx.transition(RunState::Drained)?;
                break;
            }

            let entry = match ctx.frontier.pop() {
                Some(entry) => entry,
                None => {
                    tracing::info!("Frontier is empty, run complete");
                    ctx.transition(RunState::Drained)?;
                    break;
                }
            };

            if !self.wait_turn(&ctx.politeness, &entry.url, cancel).await {
                tracing::info!("Run cancelled during politeness wait");
                ctx.transition(RunState::Aborted)?;
                break;
            }

            self.process_entry(&mut ctx, entry).await;

            let visited = ctx.frontier.visited_count();
            if visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} records",
                    visited,
                    ctx.frontier.len(),
                    ctx.report.stats.records
                );
            }
        }

        let report = ctx.finish(started);
        tracing::info!(
            "Run {}: {} records, {} failures in {}ms",
            report.state,
            report.stats.records,
            report.stats.failures,
            report.stats.elapsed_ms
        );
        Ok(report)
    }

    fn shared_budget_spent(&self) -> bool {
        self.shared_budget
            .as_ref()
            .is_some_and(ItemBudget::is_exhausted)
    }

    /// Sleeps until both the politeness interval and the host gate allow a
    /// fetch to `url`
    ///
    /// Returns false if cancelled while waiting.
    async fn wait_turn(
        &self,
        politeness: &PolitenessState,
        url: &CanonicalUrl,
        cancel: &CancellationToken,
    ) -> bool {
        let interval = self.settings.politeness_interval;
        let mut wait = politeness
            .time_until_next_request(interval, Instant::now())
            .unwrap_or_default();

        if let (Some(gate), Some(host)) = (&self.host_gate, url.host()) {
            wait = gate.reserve_after(host, interval, wait);
        }

        if wait.is_zero() {
            return true;
        }

        tracing::trace!("Waiting {:?} before fetching {}", wait, url);
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(wait) => true,
        }
    }

    /// Fetches, classifies and handles one frontier entry
    async fn process_entry(&self, ctx: &mut RunContext, entry: FrontierEntry) {
        tracing::debug!("Processing {} (depth {})", entry.url, entry.depth);

        let fetched = self.fetcher.fetch(entry.url.as_url()).await;
        ctx.politeness.record_fetch_end(Instant::now());

        let page_url = match &fetched {
            Ok(page) => {
                ctx.report.stats.pages_fetched += 1;
                normalize_url(page.final_url.as_str(), None).unwrap_or_else(|_| entry.url.clone())
            }
            Err(_) => entry.url.clone(),
        };

        match self.classify(&ctx.frontier, &entry, &page_url, &fetched) {
            PageClassification::Unreachable(reason) => {
                ctx.fail(entry.url.as_str(), FailureKind::FetchFailure, reason);
            }
            PageClassification::IndexPage(candidates) => {
                ctx.report.stats.index_pages += 1;
                let mut queued = 0;
                for url in candidates {
                    if ctx.frontier.push(FrontierEntry::child(url, &entry)) {
                        queued += 1;
                    }
                }
                ctx.report.stats.links_discovered += queued;
                tracing::info!("Index page {}: queued {} links", entry.url, queued);
            }
            PageClassification::ContentItem => {
                if let Ok(page) = &fetched {
                    ctx.report.stats.content_items += 1;
                    self.harvest_item(ctx, &entry, &page_url, page).await;
                }
            }
        }
    }

    /// Decides how a fetched page is handled
    ///
    /// Only HTML pages above `max_depth` are offered to the classifier for
    /// expansion; everything else is a content item.
    fn classify(
        &self,
        frontier: &Frontier,
        entry: &FrontierEntry,
        page_url: &CanonicalUrl,
        fetched: &std::result::Result<FetchedPage, FetchError>,
    ) -> PageClassification {
        let page = match fetched {
            Ok(page) => page,
            Err(e) => return PageClassification::Unreachable(e.to_string()),
        };

        if entry.depth < self.settings.max_depth && page.is_html() {
            self.classifier.classify(page_url, &page.text(), frontier)
        } else {
            PageClassification::ContentItem
        }
    }

    async fn harvest_item(
        &self,
        ctx: &mut RunContext,
        entry: &FrontierEntry,
        page_url: &CanonicalUrl,
        page: &FetchedPage,
    ) {
        let (extracted, hint) = match self.extract(page_url, page) {
            Ok(result) => result,
            Err(e) => {
                ctx.fail(entry.url.as_str(), FailureKind::ExtractionFailure, e.to_string());
                return;
            }
        };

        if let Some(budget) = &self.shared_budget {
            if !budget.try_reserve() {
                tracing::debug!("Item budget spent, dropping {}", entry.url);
                return;
            }
        }

        let record = self.assembler.assemble(extracted, entry.url.as_str(), hint);
        tracing::info!("Harvested \"{}\" from {}", record.title, record.source_url);
        self.emit(ctx, record).await;
    }

    fn extract(
        &self,
        page_url: &CanonicalUrl,
        page: &FetchedPage,
    ) -> std::result::Result<(ExtractedContent, Option<ContentType>), ExtractionError> {
        if page.is_pdf() {
            let body = self.pdf_extractor.extract_pdf_text(&page.body)?;
            let title = page_url
                .last_segment()
                .map(title_from_file_name)
                .unwrap_or_default();
            let extracted = ExtractedContent {
                title,
                body,
                author: None,
            };
            return Ok((extracted, Some(ContentType::Book)));
        }

        if page.is_html() {
            let extracted = self.extractor.extract(page_url, &page.text())?;
            return Ok((extracted, None));
        }

        Err(ExtractionError::UnsupportedContentType(
            page.content_type.clone(),
        ))
    }

    async fn emit(&self, ctx: &mut RunContext, record: OutputRecord) {
        ctx.report.stats.records += 1;

        let Some(sink) = &self.sink else {
            ctx.report.records.push(record);
            return;
        };

        if let Err(e) = sink.send(record).await {
            tracing::warn!("Record collector closed, keeping record locally");
            ctx.report.records.push(e.0);
        }
    }
}

impl std::fmt::Debug for CrawlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlDriver")
            .field("settings", &self.settings)
            .field("classifier", &self.classifier)
            .field("assembler", &self.assembler)
            .field("host_gate", &self.host_gate.is_some())
            .field("shared_budget", &self.shared_budget)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
