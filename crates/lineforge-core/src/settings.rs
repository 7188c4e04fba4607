//! User-supplied optimization settings.
//!
//! Request payloads are deserialized straight into [`OptimizationSettings`]
//! with serde defaults, then checked once by [`OptimizationSettings::validate`].
//! Format-specific checks (stacking, captain lock) happen in the constraint
//! model builder, which also knows the player pool.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::contest::SALARY_CAP;
use crate::error::ConstraintError;
use crate::player::{PlayerId, Position};

/// A stacking rule (Main Slate only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StackRule {
    /// When a `primary` player from a team is rostered, roster at least
    /// `min_count` `secondary` players from the same team.
    Pair {
        primary: Position,
        secondary: Vec<Position>,
        min_count: usize,
        /// Restrict the rule to one team; `None` applies it to every team.
        #[serde(default)]
        team: Option<String>,
    },
    /// Roster at least `min_players` from `team`.
    Team { team: String, min_players: usize },
}

impl StackRule {
    /// QB paired with at least `min_receivers` WR/TE from the same team.
    pub fn qb_stack(min_receivers: usize) -> Self {
        StackRule::Pair {
            primary: Position::QB,
            secondary: vec![Position::WR, Position::TE],
            min_count: min_receivers,
            team: None,
        }
    }

    pub fn team(team: impl Into<String>, min_players: usize) -> Self {
        StackRule::Team {
            team: team.into(),
            min_players,
        }
    }
}

fn default_salary_cap() -> u32 {
    SALARY_CAP
}

fn default_lineup_count() -> usize {
    1
}

fn default_min_unique_players() -> usize {
    1
}

/// Strongly-typed optimization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizationSettings {
    #[serde(default = "default_salary_cap")]
    pub salary_cap: u32,

    /// Number of lineups requested.
    #[serde(default = "default_lineup_count")]
    pub lineup_count: usize,

    /// Players projected above this ownership are not eligible.
    #[serde(default)]
    pub max_ownership: Option<f64>,

    /// Cap on the summed projected ownership of a lineup.
    #[serde(default)]
    pub max_total_ownership: Option<f64>,

    #[serde(default)]
    pub max_players_per_team: Option<usize>,

    #[serde(default)]
    pub stacks: Vec<StackRule>,

    #[serde(default)]
    pub locked: BTreeSet<PlayerId>,

    #[serde(default)]
    pub excluded: BTreeSet<PlayerId>,

    /// Showdown only.
    #[serde(default)]
    pub locked_captain: Option<PlayerId>,

    /// Every pair of lineups in a batch differs by at least this many players.
    #[serde(default = "default_min_unique_players")]
    pub min_unique_players: usize,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            salary_cap: SALARY_CAP,
            lineup_count: 1,
            max_ownership: None,
            max_total_ownership: None,
            max_players_per_team: None,
            stacks: Vec::new(),
            locked: BTreeSet::new(),
            excluded: BTreeSet::new(),
            locked_captain: None,
            min_unique_players: 1,
        }
    }
}

impl OptimizationSettings {
    pub fn new(lineup_count: usize) -> Self {
        Self {
            lineup_count,
            ..Self::default()
        }
    }

    pub fn with_salary_cap(mut self, cap: u32) -> Self {
        self.salary_cap = cap;
        self
    }

    pub fn with_max_ownership(mut self, ceiling: f64) -> Self {
        self.max_ownership = Some(ceiling);
        self
    }

    pub fn with_max_total_ownership(mut self, cap: f64) -> Self {
        self.max_total_ownership = Some(cap);
        self
    }

    pub fn with_max_players_per_team(mut self, max: usize) -> Self {
        self.max_players_per_team = Some(max);
        self
    }

    pub fn with_stack(mut self, rule: StackRule) -> Self {
        self.stacks.push(rule);
        self
    }

    pub fn with_lock(mut self, id: impl Into<PlayerId>) -> Self {
        self.locked.insert(id.into());
        self
    }

    pub fn with_exclusion(mut self, id: impl Into<PlayerId>) -> Self {
        self.excluded.insert(id.into());
        self
    }

    pub fn with_locked_captain(mut self, id: impl Into<PlayerId>) -> Self {
        self.locked_captain = Some(id.into());
        self
    }

    pub fn with_min_unique_players(mut self, count: usize) -> Self {
        self.min_unique_players = count;
        self
    }

    /// Rejects self-contradictory values.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if self.salary_cap == 0 {
            return Err(invalid("salary_cap", "must be positive"));
        }
        if self.lineup_count == 0 {
            return Err(invalid("lineup_count", "at least one lineup must be requested"));
        }
        if let Some(ceiling) = self.max_ownership {
            if !(0.0..=1.0).contains(&ceiling) {
                return Err(invalid("max_ownership", format!("{ceiling} is outside 0..=1")));
            }
        }
        if let Some(cap) = self.max_total_ownership {
            if !cap.is_finite() || cap < 0.0 {
                return Err(invalid("max_total_ownership", format!("{cap} is negative")));
            }
        }
        if self.max_players_per_team == Some(0) {
            return Err(invalid("max_players_per_team", "must be at least 1"));
        }
        if self.min_unique_players == 0 {
            return Err(invalid("min_unique_players", "must be at least 1"));
        }
        if let Some(id) = self.locked.intersection(&self.excluded).next() {
            return Err(ConstraintError::LockedAndExcluded(id.clone()));
        }
        if let Some(captain) = &self.locked_captain {
            if self.excluded.contains(captain) {
                return Err(ConstraintError::LockedAndExcluded(captain.clone()));
            }
        }
        for rule in &self.stacks {
            match rule {
                StackRule::Pair {
                    secondary,
                    min_count,
                    ..
                } => {
                    if secondary.is_empty() || *min_count == 0 {
                        return Err(invalid(
                            "stacks",
                            "pair stacks need secondary positions and a positive count",
                        ));
                    }
                }
                StackRule::Team { min_players, .. } => {
                    if *min_players == 0 {
                        return Err(invalid("stacks", "team stacks need a positive count"));
                    }
                }
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConstraintError {
    ConstraintError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}
