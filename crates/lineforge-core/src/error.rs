//! Error types for LineForge

use std::time::Duration;

use thiserror::Error;

use crate::player::{PlayerId, Position};

/// A user setting that is self-contradictory or infeasible before any solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("Unknown player in settings: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} is both locked and excluded")]
    LockedAndExcluded(PlayerId),

    #[error("Locked player {player} is not eligible: {reason}")]
    LockedIneligible { player: PlayerId, reason: String },

    #[error("Too many locked players: {locked} locked for {slots} roster slots")]
    TooManyLocked { locked: usize, slots: usize },

    #[error("Locked players exceed salary cap: {salary} > {cap}")]
    LockedPlayersExceedCap { salary: f64, cap: u32 },

    #[error("Fewer eligible players than roster slots for position {position}: {available} available, {required} required")]
    InsufficientPlayers {
        position: Position,
        required: usize,
        available: usize,
    },

    #[error("Fewer eligible players than roster slots: {available} available, {required} required")]
    InsufficientPool { required: usize, available: usize },

    #[error("Cheapest legal roster exceeds salary cap: {salary} > {cap}")]
    CheapestRosterExceedsCap { salary: f64, cap: u32 },

    #[error("Team limit conflict for {team}: {reason}")]
    TeamLimitConflict { team: String, reason: String },

    #[error("Eligible players span {available} team(s), lineups require {required}")]
    InsufficientTeams { required: usize, available: usize },

    #[error("Stacking rules apply to MainSlate only")]
    StackingNotSupported,

    #[error("A locked captain applies to Showdown only")]
    CaptainLockNotSupported,

    #[error("Stack rule cannot be satisfied: {0}")]
    UnsatisfiableStack(String),

    #[error("Duplicate player in pool: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Main error type for LineForge operations
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// User settings rejected before solving
    #[error("Constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    /// No captain assignment permits a complete legal Showdown roster
    #[error("Captain infeasible: {reason}")]
    CaptainInfeasible { reason: String },

    /// The integer program has no solution under current constraints and exclusions
    #[error("No feasible lineup remains under current constraints")]
    NoFeasibleLineup,

    /// The search exceeded its time or node budget before proving a lineup optimal
    #[error("Solver timed out after {elapsed:?}")]
    SolverTimeout { elapsed: Duration },

    /// The caller cancelled the optimization
    #[error("Optimization was cancelled")]
    Cancelled,

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OptimizerError {
    /// Errors reported to the caller before any lineup is solved.
    pub fn is_pre_solve(&self) -> bool {
        matches!(
            self,
            OptimizerError::Constraint(_) | OptimizerError::CaptainInfeasible { .. }
        )
    }

    /// Errors that end a batch attempt and become a partial result.
    pub fn is_attempt_terminal(&self) -> bool {
        matches!(
            self,
            OptimizerError::NoFeasibleLineup
                | OptimizerError::SolverTimeout { .. }
                | OptimizerError::Cancelled
        )
    }
}

/// Result type alias for LineForge operations
pub type Result<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err: OptimizerError = ConstraintError::StackingNotSupported.into();
        assert!(err.is_pre_solve());
        assert!(!err.is_attempt_terminal());

        let err = OptimizerError::SolverTimeout {
            elapsed: Duration::from_secs(30),
        };
        assert!(err.is_attempt_terminal());
        assert!(!err.is_pre_solve());
    }

    #[test]
    fn test_messages_name_the_rule() {
        let err = ConstraintError::InsufficientPlayers {
            position: Position::TE,
            required: 1,
            available: 0,
        };
        assert!(err.to_string().contains("position TE"));

        let err = ConstraintError::LockedPlayersExceedCap {
            salary: 52_000.0,
            cap: 50_000,
        };
        assert!(err.to_string().starts_with("Locked players exceed salary cap"));
    }
}
