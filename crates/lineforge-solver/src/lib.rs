//! LineForge Solver Engine
//!
//! This crate provides the lineup optimization engine:
//! - Constraint model builder (settings to linear constraints)
//! - Captain candidate selection and the captain value cache
//! - Branch-and-bound lineup solver with pluggable score bounders
//! - Diversity cuts and captain rotation
//! - Batch orchestration with streaming and cancellation
//! - Termination conditions

pub mod batch;
pub mod captain;
pub mod diversity;
pub mod model;
pub mod scope;
pub mod search;
pub mod termination;

pub use batch::{BatchOrchestrator, BatchState, EXHAUSTED_REASON};
pub use captain::{
    rank_captain_values, CaptainCandidateSelector, CaptainValue, CaptainValueCache,
    PoolFingerprint,
};
pub use diversity::{CaptainRotation, DiversityEnforcer};
pub use model::{
    CheapestRoster, Comparison, ConstraintModel, ConstraintModelBuilder, LinearConstraint,
};
pub use scope::SolveScope;
pub use search::{
    assign_slots, BoundCandidate, BoundInput, LagrangianBounder, LineupSolver, ScoreBounder,
    SolvedLineup, TopScoreBounder,
};
pub use termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};
