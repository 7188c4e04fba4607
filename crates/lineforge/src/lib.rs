//! LineForge - DFS lineup optimization in Rust
//!
//! Generates salary-legal, pairwise distinct lineups for Main Slate and
//! Showdown contests from a scored player pool.
//!
//! # Example
//!
//! ```rust
//! use lineforge::prelude::*;
//!
//! let mut players = Vec::new();
//! for (team, shift) in [("KC", 0u32), ("BUF", 300)] {
//!     for (i, position) in [Position::QB, Position::RB, Position::WR, Position::WR, Position::TE]
//!         .into_iter()
//!         .enumerate()
//!     {
//!         let salary = 4_000 + 1_000 * i as u32 + shift;
//!         players.push(Player::new(format!("{team}-{i}"), team, position, salary, salary as f64 / 400.0));
//!     }
//! }
//!
//! let settings = OptimizationSettings::new(3);
//! let result = generate_lineups(&players, ContestFormat::Showdown, &settings).unwrap();
//! assert_eq!(result.generated, 3);
//! assert!(result.lineups.iter().all(|l| l.total_salary() <= 50_000.0));
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

pub use lineforge_config::{BounderType, ConfigError, OptimizerConfig};
pub use lineforge_core::{
    BatchStatistics, BatchStatus, CaptainAssignment, ConstraintError, ContestFormat, Lineup,
    LineupSlot, OptimizationResult, OptimizationSettings, OptimizerError, Player, PlayerId,
    Position, Result, RosterTemplate, StackRule, CAPTAIN_MULTIPLIER, SALARY_CAP,
};
pub use lineforge_solver::{BatchOrchestrator, BatchState, CaptainValueCache};

#[cfg(feature = "console")]
pub mod console;

/// Generates `settings.lineup_count` lineups with the default engine
/// configuration.
///
/// Performs no I/O: the configuration is not read from disk.
pub fn generate_lineups(
    players: &[Player],
    format: ContestFormat,
    settings: &OptimizationSettings,
) -> Result<OptimizationResult> {
    generate_lineups_with_config(players, format, settings, &OptimizerConfig::default())
}

/// Generates lineups with an explicit engine configuration.
pub fn generate_lineups_with_config(
    players: &[Player],
    format: ContestFormat,
    settings: &OptimizationSettings,
    config: &OptimizerConfig,
) -> Result<OptimizationResult> {
    #[cfg(feature = "console")]
    console::init();

    BatchOrchestrator::new(config.clone()).run(players, format, settings)
}

/// One independent optimization request.
#[derive(Debug, Clone)]
pub struct LineupRequest {
    pub players: Vec<Player>,
    pub format: ContestFormat,
    pub settings: OptimizationSettings,
}

impl LineupRequest {
    pub fn new(players: Vec<Player>, format: ContestFormat, settings: OptimizationSettings) -> Self {
        Self {
            players,
            format,
            settings,
        }
    }
}

/// Runs independent requests in parallel.
///
/// Requests share nothing but the captain value cache, which is keyed by
/// pool fingerprint. Results are returned in request order.
pub fn generate_lineups_many(
    requests: &[LineupRequest],
    config: &OptimizerConfig,
) -> Vec<Result<OptimizationResult>> {
    #[cfg(feature = "console")]
    console::init();

    let cache = Arc::new(CaptainValueCache::new());
    let results: Vec<Result<OptimizationResult>> = requests
        .par_iter()
        .map(|request| {
            BatchOrchestrator::new(config.clone())
                .with_cache(Arc::clone(&cache))
                .run(&request.players, request.format, &request.settings)
        })
        .collect();
    debug!(
        requests = requests.len(),
        cached_pools = cache.len(),
        "Independent requests finished"
    );
    results
}

pub mod prelude {
    pub use super::{
        generate_lineups, generate_lineups_many, generate_lineups_with_config, LineupRequest,
    };
    pub use super::{
        BatchStatus, ContestFormat, Lineup, LineupSlot, OptimizationResult, OptimizationSettings,
        OptimizerConfig, OptimizerError, Player, PlayerId, Position, StackRule,
    };
}
