use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Tracks the request timeline used to enforce the politeness interval
///
/// A driver keeps one of these for its whole run: the interval is measured
/// from the end of the previous fetch to the start of the next one, whatever
/// host either fetch went to.
#[derive(Debug, Clone, Default)]
pub struct PolitenessState {
    /// When the most recent fetch finished
    pub last_fetch_end: Option<Instant>,

    /// Number of fetches recorded
    pub request_count: u32,
}

impl PolitenessState {
    /// Creates a new PolitenessState with no recorded fetches
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next request can start
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_fetch_end?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < interval {
            Some(interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a fetch finished at `now`
    pub fn record_fetch_end(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_fetch_end = Some(now);
    }
}

/// Spaces out request start times per host across concurrent drivers
///
/// Each call reserves the next free slot for a host under a short lock and
/// returns how long the caller must sleep before starting its request. The
/// lock is released before the caller sleeps or touches the network.
#[derive(Debug, Clone, Default)]
pub struct HostGate {
    next_slots: Arc<Mutex<HashMap<String, Instant>>>,
}

impl HostGate {
    /// Creates an empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a request slot for `host`
    ///
    /// # Arguments
    ///
    /// * `host` - The lowercase host the request targets
    /// * `interval` - Minimum spacing between request starts to that host
    ///
    /// # Returns
    ///
    /// How long to wait before the reserved slot begins
    pub fn reserve(&self, host: &str, interval: Duration) -> Duration {
        self.reserve_after(host, interval, Duration::ZERO)
    }

    /// Reserves a request slot for `host` no sooner than `min_wait` from now
    pub fn reserve_after(&self, host: &str, interval: Duration, min_wait: Duration) -> Duration {
        let now = Instant::now();
        let earliest = now + min_wait;
        let mut slots = self
            .next_slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let slot = match slots.get(host) {
            Some(next) if *next > earliest => *next,
            _ => earliest,
        };
        slots.insert(host.to_string(), slot + interval);

        slot - now
    }

    /// Returns the number of hosts the gate has seen
    pub fn host_count(&self) -> usize {
        self.next_slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
