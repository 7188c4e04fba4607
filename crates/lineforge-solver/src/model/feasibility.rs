//! Greedy lower bound on roster cost.
//!
//! The cheapest roster that satisfies the position bounds is found greedily:
//! fill every position minimum with its cheapest players, then fill the
//! remaining slots with the cheapest players whose position still has room.
//! The bounds form a laminar structure, so the greedy choice is exact and the
//! result is a true lower bound on the salary of any legal roster.

use lineforge_core::{Player, PositionBounds};

/// Cheapest-roster calculator over a fixed player pool.
#[derive(Debug, Clone)]
pub struct CheapestRoster<'a> {
    players: &'a [Player],
    by_salary: Vec<usize>,
}

impl<'a> CheapestRoster<'a> {
    pub fn new(players: &'a [Player]) -> Self {
        let mut by_salary: Vec<usize> = (0..players.len()).collect();
        by_salary.sort_by_key(|&i| (players[i].salary, i));
        Self { players, by_salary }
    }

    /// Cost in half-dollar units of the cheapest standard-slot roster that
    /// contains every `fixed` player and never uses `skip`.
    ///
    /// Returns `None` when the bounds cannot be met.
    pub fn half_units(
        &self,
        fixed: &[usize],
        skip: Option<usize>,
        bounds: &PositionBounds,
    ) -> Option<u64> {
        let mut used = vec![false; self.players.len()];
        let mut counts = [0usize; lineforge_core::Position::COUNT];
        let mut total = 0usize;
        let mut cost = 0u64;

        for &f in fixed {
            let player = &self.players[f];
            used[f] = true;
            counts[player.position.index()] += 1;
            total += 1;
            cost += 2 * player.salary as u64;
        }
        if let Some(s) = skip {
            used[s] = true;
        }
        if total > bounds.total
            || lineforge_core::Position::ALL
                .iter()
                .any(|&p| counts[p.index()] > bounds.max(p))
        {
            return None;
        }

        for position in lineforge_core::Position::ALL {
            let mut need = bounds.min(position).saturating_sub(counts[position.index()]);
            for &i in &self.by_salary {
                if need == 0 {
                    break;
                }
                if !used[i] && self.players[i].position == position {
                    used[i] = true;
                    counts[position.index()] += 1;
                    total += 1;
                    cost += 2 * self.players[i].salary as u64;
                    need -= 1;
                }
            }
            if need > 0 {
                return None;
            }
        }

        for &i in &self.by_salary {
            if total >= bounds.total {
                break;
            }
            let position = self.players[i].position;
            if !used[i] && counts[position.index()] < bounds.max(position) {
                used[i] = true;
                counts[position.index()] += 1;
                total += 1;
                cost += 2 * self.players[i].salary as u64;
            }
        }

        (total == bounds.total).then_some(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineforge_core::{ContestFormat, Position};

    fn player(id: &str, position: Position, salary: u32) -> Player {
        Player::new(id, "KC", position, salary, 10.0)
    }

    #[test]
    fn test_showdown_cheapest_five() {
        let players: Vec<Player> = (0..8)
            .map(|i| player(&format!("p{i}"), Position::WR, 1_000 * (i + 1)))
            .collect();
        let bounds = ContestFormat::Showdown.roster().standard_bounds();
        let cheapest = CheapestRoster::new(&players);

        // 1000 + 2000 + 3000 + 4000 + 5000
        assert_eq!(cheapest.half_units(&[], None, &bounds), Some(2 * 15_000));
        // skipping the cheapest shifts the window by one
        assert_eq!(cheapest.half_units(&[], Some(0), &bounds), Some(2 * 20_000));
        // fixing the most expensive replaces the fifth cheapest
        assert_eq!(cheapest.half_units(&[7], None, &bounds), Some(2 * 18_000));
    }

    #[test]
    fn test_main_slate_respects_position_minimums() {
        let mut players = vec![
            player("qb", Position::QB, 6_000),
            player("dst", Position::DST, 3_000),
            player("te", Position::TE, 3_500),
        ];
        for i in 0..3 {
            players.push(player(&format!("rb{i}"), Position::RB, 4_000 + i * 100));
        }
        for i in 0..4 {
            players.push(player(&format!("wr{i}"), Position::WR, 3_000 + i * 100));
        }
        let bounds = ContestFormat::MainSlate.roster().standard_bounds();
        let cheapest = CheapestRoster::new(&players);

        // QB 6000, DST 3000, TE 3500, RB 4000+4100, WR 3000+3100+3200, FLEX WR 3300
        let expected = 6_000 + 3_000 + 3_500 + 8_100 + 9_300 + 3_300;
        assert_eq!(cheapest.half_units(&[], None, &bounds), Some(2 * expected));
    }

    #[test]
    fn test_missing_position_is_infeasible() {
        let players: Vec<Player> = (0..9)
            .map(|i| player(&format!("wr{i}"), Position::WR, 3_000))
            .collect();
        let bounds = ContestFormat::MainSlate.roster().standard_bounds();
        assert_eq!(CheapestRoster::new(&players).half_units(&[], None, &bounds), None);
    }
}
