//! Solve-attempt scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State shared between the search and its termination conditions for one
/// solve attempt.
#[derive(Debug, Default)]
pub struct SolveScope {
    start_time: Option<Instant>,
    nodes_explored: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl SolveScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a caller-owned cancellation flag.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.nodes_explored = 0;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    #[inline]
    pub fn increment_nodes(&mut self) {
        self.nodes_explored += 1;
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    /// Returns true if the caller requested cancellation.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
