//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: Lifecycle of a single crawl run (idle, running, drained, aborted)
//! - `PolitenessState`: A driver's fetch timeline for the politeness interval
//! - `HostGate`: Per-host request spacing shared between parallel drivers
//! - `ItemBudget`: Record cap shared between parallel drivers

mod budget;
mod politeness;
mod run_state;

// Re-export main types
pub use budget::ItemBudget;
pub use politeness::{HostGate, PolitenessState};
pub use run_state::RunState;
