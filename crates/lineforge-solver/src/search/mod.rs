//! Branch-and-bound lineup search.
//!
//! The [`LineupSolver`] solves the 0/1 selection problem for one lineup:
//! maximize total score subject to the salary cap, the roster's position
//! bounds, every [`LinearConstraint`](crate::model::LinearConstraint) of the
//! model, and the exclusion cuts accumulated by the batch.

mod assign;
mod bounder;
mod solver;

#[cfg(test)]
mod solver_tests;

pub use assign::assign_slots;
pub use bounder::{
    BoundCandidate, BoundInput, LagrangianBounder, ScoreBounder, TopScoreBounder,
};
pub use solver::{LineupSolver, SolvedLineup};
