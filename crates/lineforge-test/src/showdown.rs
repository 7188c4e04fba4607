//! Single-game (Showdown) pools.

use lineforge_core::{Player, Position};

use crate::player::PoolBuilder;

/// Depth chart shared by both Showdown teams: 27 players.
const DEPTH_CHART: [(Position, u32); 27] = [
    (Position::QB, 11_200),
    (Position::QB, 5_800),
    (Position::QB, 3_600),
    (Position::RB, 10_000),
    (Position::RB, 7_400),
    (Position::RB, 5_400),
    (Position::RB, 3_800),
    (Position::RB, 2_200),
    (Position::RB, 1_200),
    (Position::WR, 10_600),
    (Position::WR, 9_000),
    (Position::WR, 7_600),
    (Position::WR, 6_200),
    (Position::WR, 5_000),
    (Position::WR, 3_800),
    (Position::WR, 2_600),
    (Position::WR, 1_600),
    (Position::WR, 1_000),
    (Position::WR, 400),
    (Position::WR, 200),
    (Position::TE, 7_000),
    (Position::TE, 4_400),
    (Position::TE, 2_400),
    (Position::TE, 1_400),
    (Position::TE, 600),
    (Position::K, 4_200),
    (Position::DST, 4_000),
];

fn rows(team_index: usize) -> Vec<(Position, u32, f64)> {
    DEPTH_CHART
        .iter()
        .enumerate()
        .map(|(i, &(position, salary))| {
            let salary = if salary > 1_000 {
                salary - 200 * (i % 3) as u32 * team_index as u32
            } else {
                salary
            };
            let bump = ((i * 7 + team_index * 3) % 5) as f64 * 0.9;
            let score = salary as f64 / 1_000.0 * 2.0 + bump + 0.5;
            (position, salary, score)
        })
        .collect()
}

/// Two 27-player teams, `KC` and `BUF`.
pub fn showdown_pool() -> Vec<Player> {
    PoolBuilder::new()
        .team("KC", &rows(0))
        .team("BUF", &rows(1))
        .build()
}

/// Every player costs at least $9,000: no captain plus five FLEX fits $50,000.
pub fn expensive_showdown_pool() -> Vec<Player> {
    let team = |offset: u32| -> Vec<(Position, u32, f64)> {
        [
            Position::QB,
            Position::RB,
            Position::WR,
            Position::WR,
            Position::TE,
            Position::DST,
        ]
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let salary = 9_000 + 200 * i as u32 + offset;
            (position, salary, 18.0 + i as f64)
        })
        .collect()
    };
    PoolBuilder::new()
        .team("KC", &team(0))
        .team("BUF", &team(100))
        .build()
}

/// Seven players where exactly six distinct legal rosters exist.
///
/// Six players cost $8,000 and one costs $1,000. Leaving out the cheap player
/// costs at least $52,000 with any captain, so only the six rosters that keep
/// that player are legal.
pub fn scarce_showdown_pool() -> Vec<Player> {
    PoolBuilder::new()
        .team(
            "KC",
            &[
                (Position::QB, 8_000, 22.0),
                (Position::WR, 8_000, 19.5),
                (Position::WR, 8_000, 17.0),
                (Position::K, 1_000, 6.0),
            ],
        )
        .team(
            "BUF",
            &[
                (Position::QB, 8_000, 21.0),
                (Position::RB, 8_000, 18.0),
                (Position::TE, 8_000, 15.5),
            ],
        )
        .build()
}
