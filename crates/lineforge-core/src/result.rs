//! Batch results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::lineup::Lineup;
use crate::player::PlayerId;

/// Terminal state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every requested lineup was generated.
    Completed,
    /// Fewer lineups than requested; `failure_reason` explains why.
    PartialCompleted,
}

/// Counters collected while running a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Solve attempts, including the one that ended the batch.
    pub attempts: usize,
    /// Search nodes explored across all attempts.
    pub nodes_explored: u64,
    pub elapsed_ms: u64,
}

/// Output of one `generate_lineups` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub lineups: Vec<Lineup>,
    pub requested: usize,
    pub generated: usize,
    pub failure_reason: Option<String>,
    pub status: BatchStatus,
    #[serde(default)]
    pub statistics: BatchStatistics,
}

impl OptimizationResult {
    pub fn completed(lineups: Vec<Lineup>, statistics: BatchStatistics) -> Self {
        let generated = lineups.len();
        Self {
            lineups,
            requested: generated,
            generated,
            failure_reason: None,
            status: BatchStatus::Completed,
            statistics,
        }
    }

    pub fn partial(
        lineups: Vec<Lineup>,
        requested: usize,
        reason: impl Into<String>,
        statistics: BatchStatistics,
    ) -> Self {
        let generated = lineups.len();
        Self {
            lineups,
            requested,
            generated,
            failure_reason: Some(reason.into()),
            status: BatchStatus::PartialCompleted,
            statistics,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == BatchStatus::Completed
    }

    /// Number of distinct Showdown captains across the batch.
    pub fn distinct_captains(&self) -> usize {
        self.lineups
            .iter()
            .filter_map(|l| l.captain().map(|c| c.player_id))
            .collect::<BTreeSet<PlayerId>>()
            .len()
    }
}
