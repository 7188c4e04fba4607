//! LineForge Core - data model for DFS lineup optimization
//!
//! This crate provides the types shared by every LineForge crate:
//! - Players, positions and contest formats with their roster templates
//! - Strongly-typed optimization settings (validated once at the boundary)
//! - Lineups, captain assignments and batch results
//! - The error taxonomy reported by the optimizer

pub mod contest;
pub mod error;
pub mod lineup;
pub mod player;
pub mod result;
pub mod settings;

pub use contest::{
    ContestFormat, PositionBounds, RosterSlot, RosterTemplate, SlotKind, CAPTAIN_MULTIPLIER,
    SALARY_CAP,
};
pub use error::{ConstraintError, OptimizerError, Result};
pub use lineup::{CaptainAssignment, Lineup, LineupSlot};
pub use player::{Player, PlayerId, Position};
pub use result::{BatchStatistics, BatchStatus, OptimizationResult};
pub use settings::{OptimizationSettings, StackRule};
