//! Constraint model for lineup optimization.
//!
//! A [`ConstraintModel`] is the validated, solver-ready form of a player pool
//! plus user settings: the eligible players in canonical order, the lock set,
//! the position bounds of the roster template, and every user rule expressed
//! as a [`LinearConstraint`] over player selection variables.

mod builder;
mod feasibility;


use std::collections::HashMap;

use lineforge_core::{ContestFormat, Player, PlayerId, PositionBounds, RosterTemplate};

pub use builder::ConstraintModelBuilder;
pub use feasibility::CheapestRoster;

/// Tolerance for floating-point constraint and score comparisons.
pub const EPSILON: f64 = 1e-9;

/// Direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `lhs <= rhs`
    AtMost,
    /// `lhs >= rhs`
    AtLeast,
}

/// A linear inequality over player selection variables.
///
/// Terms are `(player index, coefficient)` pairs sorted by index; a player
/// absent from `terms` has coefficient zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    name: String,
    terms: Vec<(usize, f64)>,
    comparison: Comparison,
    rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        comparison: Comparison,
        rhs: f64,
    ) -> Self {
        let mut terms: Vec<(usize, f64)> = terms.into_iter().filter(|(_, a)| *a != 0.0).collect();
        terms.sort_by_key(|(i, _)| *i);
        Self {
            name: name.into(),
            terms,
            comparison,
            rhs,
        }
    }

    pub fn at_most(
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        rhs: f64,
    ) -> Self {
        Self::new(name, terms, Comparison::AtMost, rhs)
    }

    pub fn at_least(
        name: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        rhs: f64,
    ) -> Self {
        Self::new(name, terms, Comparison::AtLeast, rhs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(usize, f64)] {
        &self.terms
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn coefficient(&self, player: usize) -> f64 {
        self.terms
            .binary_search_by_key(&player, |(i, _)| *i)
            .map(|pos| self.terms[pos].1)
            .unwrap_or(0.0)
    }

    /// Left-hand side for a selection of player indices.
    pub fn lhs(&self, selection: &[usize]) -> f64 {
        selection.iter().map(|&i| self.coefficient(i)).sum()
    }

    pub fn is_satisfied_by(&self, selection: &[usize]) -> bool {
        self.holds_for(self.lhs(selection))
    }

    /// Whether a left-hand side value satisfies the inequality.
    #[inline]
    pub fn holds_for(&self, lhs: f64) -> bool {
        match self.comparison {
            Comparison::AtMost => lhs <= self.rhs + EPSILON,
            Comparison::AtLeast => lhs >= self.rhs - EPSILON,
        }
    }
}

/// Validated constraint set for one optimization run.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    format: ContestFormat,
    roster: RosterTemplate,
    bounds: PositionBounds,
    salary_cap: u32,
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
    team_of: Vec<usize>,
    teams: Vec<String>,
    locked: Vec<usize>,
    locked_captain: Option<usize>,
    constraints: Vec<LinearConstraint>,
    lineup_count: usize,
    min_unique_players: usize,
}

impl ConstraintModel {
    pub fn format(&self) -> ContestFormat {
        self.format
    }

    pub fn roster(&self) -> &RosterTemplate {
        &self.roster
    }

    /// Position bounds over the standard (non-captain) slots.
    pub fn bounds(&self) -> &PositionBounds {
        &self.bounds
    }

    pub fn salary_cap(&self) -> u32 {
        self.salary_cap
    }

    /// Salary cap in half-dollar units.
    pub fn cap_half_units(&self) -> u64 {
        2 * self.salary_cap as u64
    }

    /// Eligible players, sorted by score descending, then salary ascending,
    /// then identity.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn team_index(&self, player: usize) -> usize {
        self.team_of[player]
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// Locked players, excluding a locked captain.
    pub fn locked(&self) -> &[usize] {
        &self.locked
    }

    pub fn locked_captain(&self) -> Option<usize> {
        self.locked_captain
    }

    pub fn is_locked(&self, player: usize) -> bool {
        self.locked.contains(&player) || self.locked_captain == Some(player)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn lineup_count(&self) -> usize {
        self.lineup_count
    }

    pub fn min_unique_players(&self) -> usize {
        self.min_unique_players
    }
}
