//! Search limits for Tinyhouse engines.
//!
//! Limits are fixed when a search starts: a maximum depth and an optional
//! time budget. There is no external stop signal.

use std::time::{Duration, Instant};

/// Search limits that control when an engine should stop searching.
///
/// Engines stop at whichever limit is reached first. When the time budget
/// runs out the engine returns the best move of the last finished iteration.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum search depth in plies
    pub depth: u8,
    /// Clock for the time budget
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            time_control: TimeControl::new(None),
        }
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Start the clock. Call this when search begins.
    pub fn start(&mut self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Tracks elapsed time against an optional budget.
#[derive(Debug, Clone)]
pub struct TimeControl {
    start_time: Option<Instant>,
    time_limit: Option<Duration>,
    /// How often to check the clock (in nodes)
    check_interval: u64,
    expired: bool,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            start_time: None,
            time_limit,
            check_interval: 1024,
            expired: false,
        }
    }

    /// Start the clock. Should be called when search begins.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.expired = false;
    }

    /// The time budget, `None` when unlimited.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Reads the clock and latches the expired flag once the budget is spent.
    pub fn check_time(&mut self) -> bool {
        if self.expired {
            return true;
        }
        if let (Some(limit), Some(start)) = (self.time_limit, self.start_time) {
            if start.elapsed() >= limit {
                self.expired = true;
            }
        }
        self.expired
    }

    /// Returns true every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes % self.check_interval == 0
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
