//! Multi-game (Main Slate) pools.

use lineforge_core::{Player, Position};

use crate::player::PoolBuilder;

const DEPTH_CHART: [(Position, u32); 13] = [
    (Position::QB, 7_600),
    (Position::QB, 5_000),
    (Position::RB, 8_400),
    (Position::RB, 6_200),
    (Position::RB, 4_500),
    (Position::WR, 8_800),
    (Position::WR, 6_900),
    (Position::WR, 5_100),
    (Position::WR, 3_600),
    (Position::TE, 6_500),
    (Position::TE, 3_200),
    (Position::DST, 3_300),
    (Position::K, 4_500),
];

/// Teams used by [`main_slate_pool`].
pub const MAIN_SLATE_TEAMS: [&str; 3] = ["KC", "BUF", "PHI"];

fn rows(team_index: usize) -> Vec<(Position, u32, f64)> {
    DEPTH_CHART
        .iter()
        .enumerate()
        .map(|(i, &(position, salary))| {
            let salary = salary - 100 * team_index as u32;
            let bump = ((i * 5 + team_index * 2) % 4) as f64 * 1.1;
            (position, salary, salary as f64 / 1_000.0 * 2.2 + bump)
        })
        .collect()
}

/// Three 13-player teams; kickers are included but have no Main Slate slot.
pub fn main_slate_pool() -> Vec<Player> {
    MAIN_SLATE_TEAMS
        .iter()
        .enumerate()
        .fold(PoolBuilder::new(), |builder, (t, team)| {
            builder.team(team, &rows(t))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_slate_pool_shape() {
        let pool = main_slate_pool();
        assert_eq!(pool.len(), 39);
        assert_eq!(pool.iter().filter(|p| p.position == Position::K).count(), 3);
        assert_eq!(pool.iter().filter(|p| p.position == Position::QB).count(), 6);
    }
}
