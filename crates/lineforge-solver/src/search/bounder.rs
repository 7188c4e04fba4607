//! Score bounders for branch-and-bound pruning.
//!
//! Bounders calculate an optimistic score for a partial lineup: no completion
//! of the partial lineup can score higher. A branch whose bound does not beat
//! the incumbent is pruned.

use std::fmt::Debug;

use lineforge_core::Player;
use smallvec::SmallVec;

/// A player that could still be added to the partial lineup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundCandidate {
    pub score: f64,
    pub salary: u32,
    /// Index into [`BoundInput::group_caps`], the player's position.
    pub group: usize,
}

impl BoundCandidate {
    pub fn new(score: f64, salary: u32, group: usize) -> Self {
        Self {
            score,
            salary,
            group,
        }
    }
}

/// State of a partial lineup handed to a [`ScoreBounder`].
#[derive(Debug, Clone, Copy)]
pub struct BoundInput<'a> {
    /// Score of the players already selected, captain multiplier included.
    pub current_score: f64,
    /// Standard slots still to fill.
    pub open_slots: usize,
    /// Remaining salary in half-dollar units.
    pub budget_half_units: u64,
    /// Every player that could still be added, in score descending order.
    pub candidates: &'a [BoundCandidate],
    /// How many more players each group may contribute.
    pub group_caps: &'a [usize],
}

/// Calculates score bounds for lineup search pruning.
pub trait ScoreBounder: Send + Sync + Debug {
    /// Upper bound on the score of any completion of the partial lineup.
    ///
    /// Returns negative infinity when the open slots cannot be filled.
    fn optimistic_bound(&self, input: &BoundInput<'_>) -> f64;
}

/// Adds the best remaining scores, ignoring salary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopScoreBounder;

impl TopScoreBounder {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreBounder for TopScoreBounder {
    fn optimistic_bound(&self, input: &BoundInput<'_>) -> f64 {
        let r = input.open_slots;
        if input.candidates.len() < r {
            return f64::NEG_INFINITY;
        }
        let mut taken: SmallVec<[usize; 8]> = SmallVec::from_elem(0, input.group_caps.len());
        let mut total = 0.0;
        let mut filled = 0;
        for candidate in input.candidates {
            if filled == r {
                break;
            }
            if taken[candidate.group] < input.group_caps[candidate.group] {
                taken[candidate.group] += 1;
                total += candidate.score;
                filled += 1;
            }
        }
        if filled < r {
            return f64::NEG_INFINITY;
        }
        input.current_score + total
    }
}

/// Lagrangian dual of the cardinality and budget relaxation.
///
/// For a multiplier `mu >= 0` the best completion scores at most
/// `mu * budget + top_r(score - mu * salary)`, where `top_r` sums the `r`
/// largest reduced scores taking no more than its cap from any group. The
/// bound is the minimum over a fixed grid of
/// multipliers scaled to the pool's average score per dollar, refined by a
/// ternary search between the neighbors of the best grid point. Every
/// multiplier yields a valid bound. The grid contains zero, so the bound is
/// never weaker than [`TopScoreBounder`].
#[derive(Debug, Clone)]
pub struct LagrangianBounder {
    multipliers: SmallVec<[f64; 8]>,
}

const GRID: [f64; 7] = [0.0, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];
const REFINE_STEPS: usize = 8;

impl LagrangianBounder {
    /// Scales the multiplier grid to the average score per dollar of the pool.
    pub fn new(players: &[Player]) -> Self {
        let ratios: Vec<f64> = players
            .iter()
            .filter(|p| p.salary > 0 && p.score > 0.0)
            .map(|p| p.score / p.salary as f64)
            .collect();
        let rho = if ratios.is_empty() {
            0.0
        } else {
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };
        Self::with_base_multiplier(rho)
    }

    pub fn with_base_multiplier(rho: f64) -> Self {
        let multipliers = if rho > 0.0 && rho.is_finite() {
            GRID.iter().map(|g| g * rho).collect()
        } else {
            SmallVec::from_slice(&[0.0])
        };
        Self { multipliers }
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    /// Greedy over the per-group best reduced scores. Picking the top `r`
    /// of each group's top `cap` values is optimal for a partition limit.
    fn dual_value(mu: f64, input: &BoundInput<'_>) -> f64 {
        let r = input.open_slots;
        let mut best: SmallVec<[SmallVec<[f64; 9]>; 8]> =
            input.group_caps.iter().map(|_| SmallVec::new()).collect();
        for candidate in input.candidates {
            let cap = input.group_caps[candidate.group].min(r);
            let top = &mut best[candidate.group];
            let reduced = candidate.score - mu * candidate.salary as f64;
            if top.len() == cap && top.last().map_or(true, |&least| reduced <= least) {
                continue;
            }
            let at = top.partition_point(|&v| v >= reduced);
            top.insert(at, reduced);
            top.truncate(cap);
        }

        let mut merged: SmallVec<[f64; 64]> = best.into_iter().flatten().collect();
        if merged.len() < r {
            return f64::NEG_INFINITY;
        }
        merged.sort_unstable_by(|a, b| b.total_cmp(a));
        mu * (input.budget_half_units as f64 / 2.0) + merged[..r].iter().sum::<f64>()
    }
}

impl ScoreBounder for LagrangianBounder {
    fn optimistic_bound(&self, input: &BoundInput<'_>) -> f64 {
        if input.candidates.len() < input.open_slots {
            return f64::NEG_INFINITY;
        }
        if input.open_slots == 0 {
            return input.current_score;
        }
        let mut dual = f64::INFINITY;
        let mut best_at = 0;
        for (g, &mu) in self.multipliers.iter().enumerate() {
            let value = Self::dual_value(mu, input);
            if value < dual {
                dual = value;
                best_at = g;
            }
        }

        let last = self.multipliers.len() - 1;
        if last > 0 {
            let mut lo = self.multipliers[best_at.saturating_sub(1)];
            let mut hi = self.multipliers[(best_at + 1).min(last)];
            for _ in 0..REFINE_STEPS {
                let third = (hi - lo) / 3.0;
                let (m1, m2) = (lo + third, hi - third);
                let (d1, d2) = (Self::dual_value(m1, input), Self::dual_value(m2, input));
                dual = dual.min(d1).min(d2);
                if d1 <= d2 {
                    hi = m2;
                } else {
                    lo = m1;
                }
            }
        }
        input.current_score + dual
    }
}
