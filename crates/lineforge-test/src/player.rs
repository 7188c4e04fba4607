//! Player constructors.

use lineforge_core::{Player, Position};

/// Creates a player whose display name equals its id.
pub fn player(id: &str, team: &str, position: Position, salary: u32, score: f64) -> Player {
    Player::new(id, team, position, salary, score)
}

/// Builds a pool one team at a time from `(position, salary, score)` rows.
///
/// Player ids are `<team>-<position>-<n>`, with `n` counting players of that
/// position within the team from 1.
#[derive(Debug, Default)]
pub struct PoolBuilder {
    players: Vec<Player>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team: &str, rows: &[(Position, u32, f64)]) -> Self {
        let mut seen = [0usize; Position::COUNT];
        for &(position, salary, score) in rows {
            seen[position.index()] += 1;
            let id = format!(
                "{}-{}-{}",
                team,
                position.as_str().to_ascii_lowercase(),
                seen[position.index()]
            );
            self.players
                .push(player(&id, team, position, salary, score).with_name(id.clone()));
        }
        self
    }

    /// Sets the projected ownership of an already added player.
    pub fn ownership(mut self, id: &str, ownership: f64) -> Self {
        if let Some(p) = self.players.iter_mut().find(|p| p.id.as_str() == id) {
            p.ownership = Some(ownership);
        }
        self
    }

    pub fn build(self) -> Vec<Player> {
        self.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_builder_ids() {
        let pool = PoolBuilder::new()
            .team("KC", &[(Position::WR, 5_000, 12.0), (Position::WR, 4_000, 9.0)])
            .ownership("KC-wr-2", 0.25)
            .build();
        assert_eq!(pool[0].id.as_str(), "KC-wr-1");
        assert_eq!(pool[1].id.as_str(), "KC-wr-2");
        assert_eq!(pool[1].ownership, Some(0.25));
    }
}
