//! Parallel crawl mode
//!
//! One [`CrawlDriver`] per seed runs as its own tokio task with its own
//! frontier. Records flow through a bounded channel to a single collector,
//! a shared [`HostGate`] keeps drivers from crowding the same host, and a
//! shared [`ItemBudget`] caps the total number of records.

use crate::crawler::driver::CrawlDriver;
use crate::output::RunReport;
use crate::state::{HostGate, ItemBudget, RunState};
use crate::{HarvestError, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Runs one driver per seed concurrently and merges their reports
///
/// Records from different seeds interleave in arrival order; each driver's
/// own records keep their relative order. The item budget applies to the
/// merged output. The merged state is `Aborted` if any run was aborted.
pub async fn run_parallel(
    driver: &CrawlDriver,
    seeds: &[String],
    channel_capacity: usize,
    cancel: &CancellationToken,
) -> Result<RunReport> {
    if seeds.is_empty() {
        return Err(HarvestError::NoSeeds);
    }

    let gate = HostGate::new();
    let budget = driver.settings().item_budget.map(ItemBudget::new);
    let (tx, mut rx) = mpsc::channel(channel_capacity.max(1));

    tracing::info!("Starting {} parallel runs", seeds.len());

    let mut handles = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let mut driver = driver
            .clone()
            .with_host_gate(gate.clone())
            .with_sink(tx.clone());
        if let Some(budget) = &budget {
            driver = driver.with_shared_budget(budget.clone());
        }
        let seeds = vec![seed.clone()];
        let cancel = cancel.clone();

        handles.push(tokio::spawn(
            async move { driver.run(&seeds, &cancel).await },
        ));
    }
    drop(tx);

    let mut report = RunReport::empty(RunState::Drained);
    while let Some(record) = rx.recv().await {
        report.records.push(record);
    }

    for handle in handles {
        let run = handle
            .await
            .map_err(|e| HarvestError::Task(e.to_string()))??;
        report.absorb(run);
    }

    tracing::info!(
        "Parallel runs finished: {} records from {} hosts",
        report.records.len(),
        gate.host_count()
    );

    Ok(report)
}
