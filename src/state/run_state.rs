/// Run state definitions for a single crawl run
///
/// A run moves `Idle → Running → Drained | Aborted` and never leaves a
/// terminal state.
use serde::Serialize;
use std::fmt;

/// Represents the lifecycle state of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Driver constructed, nothing fetched yet
    Idle,

    /// Frontier is being processed
    Running,

    /// Frontier exhausted or item budget reached
    Drained,

    /// Stopped by an external cancellation signal
    Aborted,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drained | Self::Aborted)
    }

    /// Returns true if the run may move from `self` to `next`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Aborted)
                | (Self::Running, Self::Drained)
                | (Self::Running, Self::Aborted)
        )
    }

    /// Returns the lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Drained => "drained",
            Self::Aborted => "aborted",
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
