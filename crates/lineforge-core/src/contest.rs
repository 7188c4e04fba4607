//! Contest formats and roster templates.
//!
//! A [`RosterTemplate`] is the ordered list of slots a lineup must fill.
//! Per-position minimum and maximum counts are derived from the template
//! rather than hard-coded, so slot assignment and the solver agree on the
//! shape of a legal roster.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::Position;

/// Salary cap shared by both contest formats.
pub const SALARY_CAP: u32 = 50_000;

/// Salary and score multiplier applied to the Showdown captain.
pub const CAPTAIN_MULTIPLIER: f64 = 1.5;

const FLEX_MAIN: &[Position] = &[Position::RB, Position::WR, Position::TE];
const ANY: &[Position] = &[
    Position::QB,
    Position::RB,
    Position::WR,
    Position::TE,
    Position::K,
    Position::DST,
];

/// Contest format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestFormat {
    /// Full multi-game slate: QB, 2 RB, 3 WR, TE, FLEX, DST.
    #[default]
    MainSlate,
    /// Single game: 1 Captain + 5 FLEX from any position.
    Showdown,
}

impl ContestFormat {
    pub fn roster(self) -> RosterTemplate {
        match self {
            ContestFormat::MainSlate => RosterTemplate {
                format: self,
                slots: vec![
                    RosterSlot::standard("QB", &[Position::QB]),
                    RosterSlot::standard("RB", &[Position::RB]),
                    RosterSlot::standard("RB", &[Position::RB]),
                    RosterSlot::standard("WR", &[Position::WR]),
                    RosterSlot::standard("WR", &[Position::WR]),
                    RosterSlot::standard("WR", &[Position::WR]),
                    RosterSlot::standard("TE", &[Position::TE]),
                    RosterSlot::standard("FLEX", FLEX_MAIN),
                    RosterSlot::standard("DST", &[Position::DST]),
                ],
            },
            ContestFormat::Showdown => RosterTemplate {
                format: self,
                slots: vec![
                    RosterSlot::captain("CPT", ANY),
                    RosterSlot::standard("FLEX", ANY),
                    RosterSlot::standard("FLEX", ANY),
                    RosterSlot::standard("FLEX", ANY),
                    RosterSlot::standard("FLEX", ANY),
                    RosterSlot::standard("FLEX", ANY),
                ],
            },
        }
    }

    /// Number of roster slots in a complete lineup.
    pub fn roster_size(self) -> usize {
        match self {
            ContestFormat::MainSlate => 9,
            ContestFormat::Showdown => 6,
        }
    }

    #[inline]
    pub fn has_captain(self) -> bool {
        matches!(self, ContestFormat::Showdown)
    }

    #[inline]
    pub fn supports_stacking(self) -> bool {
        matches!(self, ContestFormat::MainSlate)
    }

    /// Lineups must draw from at least this many teams.
    #[inline]
    pub fn min_distinct_teams(self) -> usize {
        2
    }
}

impl fmt::Display for ContestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestFormat::MainSlate => write!(f, "MainSlate"),
            ContestFormat::Showdown => write!(f, "Showdown"),
        }
    }
}

/// How a slot prices and scores the player placed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Standard,
    Captain,
}

impl SlotKind {
    /// Effective salary in half-dollar units.
    ///
    /// Salary arithmetic stays in integers: a captain costs `3 * base` half
    /// dollars, everyone else `2 * base`.
    #[inline]
    pub fn salary_half_units(self, base: u32) -> u64 {
        match self {
            SlotKind::Standard => 2 * base as u64,
            SlotKind::Captain => 3 * base as u64,
        }
    }

    #[inline]
    pub fn effective_salary(self, base: u32) -> f64 {
        self.salary_half_units(base) as f64 / 2.0
    }

    #[inline]
    pub fn effective_score(self, base: f64) -> f64 {
        match self {
            SlotKind::Standard => base,
            SlotKind::Captain => base * CAPTAIN_MULTIPLIER,
        }
    }
}

/// One roster slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlot {
    pub label: &'static str,
    pub eligible: &'static [Position],
    pub kind: SlotKind,
}

impl RosterSlot {
    pub const fn standard(label: &'static str, eligible: &'static [Position]) -> Self {
        Self {
            label,
            eligible,
            kind: SlotKind::Standard,
        }
    }

    pub const fn captain(label: &'static str, eligible: &'static [Position]) -> Self {
        Self {
            label,
            eligible,
            kind: SlotKind::Captain,
        }
    }

    pub fn accepts(&self, position: Position) -> bool {
        self.eligible.contains(&position)
    }
}

/// Ordered roster shape for a contest format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTemplate {
    format: ContestFormat,
    slots: Vec<RosterSlot>,
}

impl RosterTemplate {
    pub fn format(&self) -> ContestFormat {
        self.format
    }

    pub fn slots(&self) -> &[RosterSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn captain_slot(&self) -> Option<&RosterSlot> {
        self.slots.iter().find(|s| s.kind == SlotKind::Captain)
    }

    /// Count bounds over the standard (non-captain) slots.
    pub fn standard_bounds(&self) -> PositionBounds {
        let mut bounds = PositionBounds::default();
        for slot in self.slots.iter().filter(|s| s.kind == SlotKind::Standard) {
            bounds.total += 1;
            if let [only] = slot.eligible {
                bounds.min[only.index()] += 1;
                bounds.max[only.index()] += 1;
            } else {
                for position in slot.eligible {
                    bounds.max[position.index()] += 1;
                }
            }
        }
        bounds
    }

    /// Whether a player of this position can fill any slot.
    pub fn is_eligible(&self, position: Position) -> bool {
        self.slots.iter().any(|s| s.accepts(position))
    }
}

/// Per-position count bounds derived from a roster template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionBounds {
    pub min: [usize; Position::COUNT],
    pub max: [usize; Position::COUNT],
    pub total: usize,
}

impl PositionBounds {
    #[inline]
    pub fn min(&self, position: Position) -> usize {
        self.min[position.index()]
    }

    #[inline]
    pub fn max(&self, position: Position) -> usize {
        self.max[position.index()].min(self.total)
    }
}
