use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Caps the total number of records across concurrent drivers
///
/// Drivers reserve a slot before emitting each record; once `limit` slots
/// are taken every further reservation fails.
#[derive(Debug, Clone)]
pub struct ItemBudget {
    limit: usize,
    used: Arc<AtomicUsize>,
}

impl ItemBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Takes one slot, returning false if the budget is spent
    pub fn try_reserve(&self) -> bool {
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                (used < self.limit).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn is_exhausted(&self) -> bool {
        self.used() >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
