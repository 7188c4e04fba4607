//! Generated lineups.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::contest::{ContestFormat, SlotKind};
use crate::player::{Player, PlayerId, Position};

/// A filled roster slot.
///
/// Salary and score are reported both as base values and as effective values
/// after the slot multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub slot: String,
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub base_salary: u32,
    pub effective_salary: f64,
    pub base_score: f64,
    pub effective_score: f64,
    /// Present for Showdown lineups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_captain: Option<bool>,
}

impl LineupSlot {
    pub fn new(label: &str, kind: SlotKind, player: &Player, format: ContestFormat) -> Self {
        Self {
            slot: label.to_string(),
            player_id: player.id.clone(),
            name: player.name.clone(),
            team: player.team.clone(),
            position: player.position,
            base_salary: player.salary,
            effective_salary: kind.effective_salary(player.salary),
            base_score: player.score,
            effective_score: kind.effective_score(player.score),
            is_captain: format
                .has_captain()
                .then_some(kind == SlotKind::Captain),
        }
    }

    #[inline]
    pub fn is_captain(&self) -> bool {
        self.is_captain.unwrap_or(false)
    }
}

/// The Showdown captain of a lineup.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptainAssignment {
    pub player_id: PlayerId,
    pub base_salary: u32,
    pub base_score: f64,
}

impl CaptainAssignment {
    pub fn effective_salary(&self) -> f64 {
        SlotKind::Captain.effective_salary(self.base_salary)
    }

    pub fn effective_score(&self) -> f64 {
        SlotKind::Captain.effective_score(self.base_score)
    }
}

/// A complete, salary-legal lineup. Read-only once produced by the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    format: ContestFormat,
    slots: SmallVec<[LineupSlot; 9]>,
    total_salary: f64,
    total_score: f64,
}

impl Lineup {
    pub fn new(format: ContestFormat, slots: impl IntoIterator<Item = LineupSlot>) -> Self {
        let slots: SmallVec<[LineupSlot; 9]> = slots.into_iter().collect();
        let total_salary = slots.iter().map(|s| s.effective_salary).sum();
        let total_score = slots.iter().map(|s| s.effective_score).sum();
        Self {
            format,
            slots,
            total_salary,
            total_score,
        }
    }

    pub fn format(&self) -> ContestFormat {
        self.format
    }

    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_salary(&self) -> f64 {
        self.total_salary
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn captain(&self) -> Option<CaptainAssignment> {
        self.slots
            .iter()
            .find(|s| s.is_captain())
            .map(|s| CaptainAssignment {
                player_id: s.player_id.clone(),
                base_salary: s.base_salary,
                base_score: s.base_score,
            })
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.slots.iter().any(|s| &s.player_id == id)
    }

    /// Sorted player identities, the key used for duplicate detection.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.slots.iter().map(|s| s.player_id.clone()).collect();
        ids.sort();
        ids
    }

    /// Whether both lineups roster exactly the same players.
    pub fn same_players(&self, other: &Lineup) -> bool {
        self.player_ids() == other.player_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showdown_lineup() -> Lineup {
        let format = ContestFormat::Showdown;
        let captain = Player::new("qb", "KC", Position::QB, 11_000, 24.0);
        let flex: Vec<Player> = (0..5)
            .map(|i| Player::new(format!("wr{i}"), "BUF", Position::WR, 5_000, 10.0))
            .collect();
        let mut slots = vec![LineupSlot::new("CPT", SlotKind::Captain, &captain, format)];
        slots.extend(
            flex.iter()
                .map(|p| LineupSlot::new("FLEX", SlotKind::Standard, p, format)),
        );
        Lineup::new(format, slots)
    }

    #[test]
    fn test_totals_include_captain_multiplier() {
        let lineup = showdown_lineup();
        assert_eq!(lineup.len(), 6);
        assert_eq!(lineup.total_salary(), 16_500.0 + 25_000.0);
        assert_eq!(lineup.total_score(), 36.0 + 50.0);

        let captain = lineup.captain().unwrap();
        assert_eq!(captain.player_id, PlayerId::new("qb"));
        assert_eq!(captain.effective_salary(), captain.base_salary as f64 * 1.5);
        assert_eq!(captain.effective_score(), captain.base_score * 1.5);
    }

    #[test]
    fn test_serialized_slot_shape() {
        let lineup = showdown_lineup();
        let json = serde_json::to_value(&lineup).unwrap();
        let first = &json["slots"][0];
        assert_eq!(first["player_id"], "qb");
        assert_eq!(first["position"], "QB");
        assert_eq!(first["effective_salary"], 16_500.0);
        assert_eq!(first["effective_score"], 36.0);
        assert_eq!(first["is_captain"], true);
        assert_eq!(json["slots"][1]["is_captain"], false);
    }

    #[test]
    fn test_main_slate_slots_omit_captain_flag() {
        let format = ContestFormat::MainSlate;
        let qb = Player::new("qb", "KC", Position::QB, 7_000, 20.0);
        let slot = LineupSlot::new("QB", SlotKind::Standard, &qb, format);
        assert!(!slot.is_captain());

        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("is_captain").is_none());
    }

    #[test]
    fn test_same_players_ignores_order() {
        let a = showdown_lineup();
        let mut slots: Vec<LineupSlot> = a.slots().to_vec();
        slots.reverse();
        let b = Lineup::new(a.format(), slots);
        assert!(a.same_players(&b));
        assert!(b.contains(&PlayerId::new("wr3")));
    }
}
