//! Search configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tt::DEFAULT_TT_MB;

/// Deepest iteration the search will attempt.
pub const MAX_DEPTH: u32 = 64;

/// Thread count used by the host application when none is given:
/// available cores divided by 1.2, at least one.
#[must_use]
pub fn default_threads() -> usize {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    ((cores as f64 / 1.2) as usize).max(1)
}

/// Configuration for a [`Searcher`](super::Searcher).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Allotted wall-clock time per search (`None` = unlimited)
    pub time: Option<Duration>,
    /// Maximum iterative-deepening depth
    pub max_depth: u32,
    /// Number of Lazy SMP worker threads
    pub threads: usize,
    /// Transposition table size in megabytes
    pub tt_mb: usize,
    /// Probe and store the transposition table during search
    pub use_transposition_table: bool,
    /// Resolve captures at the horizon instead of evaluating directly
    pub quiescence: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time: None,
            max_depth: MAX_DEPTH,
            threads: 1,
            tt_mb: DEFAULT_TT_MB,
            use_transposition_table: true,
            quiescence: true,
        }
    }
}

impl SearchConfig {
    /// Create config with specified thread count
    #[must_use]
    pub fn with_threads(threads: usize) -> Self {
        SearchConfig {
            threads: threads.max(1),
            ..Default::default()
        }
    }

    /// Set thread count
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set max depth (capped at [`MAX_DEPTH`])
    #[must_use]
    pub fn depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH);
        self
    }

    /// Set the allotted time
    #[must_use]
    pub fn time(mut self, allotted: Duration) -> Self {
        self.time = Some(allotted);
        self
    }

    /// Remove the time limit
    #[must_use]
    pub fn unlimited_time(mut self) -> Self {
        self.time = None;
        self
    }

    /// Set transposition table size
    #[must_use]
    pub fn table_mb(mut self, tt_mb: usize) -> Self {
        self.tt_mb = tt_mb;
        self
    }

    #[must_use]
    pub fn transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }

    #[must_use]
    pub fn quiescence(mut self, enabled: bool) -> Self {
        self.quiescence = enabled;
        self
    }
}
