//! Captain candidate selection for Showdown.
//!
//! Players are ranked once per distinct pool by captain value
//! (`score / salary`). The ranking is cached in a [`CaptainValueCache`]
//! keyed by a [`PoolFingerprint`], so repeated batches over the same pool
//! reuse it. Candidates are then filtered by a salary feasibility check: the
//! captain at 1.5x plus the cheapest five FLEX players that honor the locks
//! must fit under the cap.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use lineforge_core::{OptimizerError, Player, Result, SlotKind};
use tracing::debug;

use crate::model::{CheapestRoster, ConstraintModel};

/// A player's captain value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptainValue {
    /// Model index of the player.
    pub player: usize,
    /// `score / salary`
    pub value: f64,
}

/// Ranks every player by captain value.
///
/// Order: value descending, then score descending, then identity.
pub fn rank_captain_values(players: &[Player]) -> Vec<CaptainValue> {
    let mut ranked: Vec<CaptainValue> = players
        .iter()
        .enumerate()
        .filter_map(|(player, p)| p.captain_value().map(|value| CaptainValue { player, value }))
        .collect();
    ranked.sort_by(|a, b| {
        let (pa, pb) = (&players[a.player], &players[b.player]);
        b.value
            .total_cmp(&a.value)
            .then(pb.score.total_cmp(&pa.score))
            .then_with(|| pa.id.cmp(&pb.id))
    });
    ranked
}

/// Identity of a player pool as seen by the optimizer.
///
/// Two pools share a fingerprint when they list the same players, in the
/// same order, with the same salaries, positions, teams and scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolFingerprint(u64);

impl PoolFingerprint {
    pub fn of(players: &[Player]) -> Self {
        let mut hasher = DefaultHasher::new();
        players.len().hash(&mut hasher);
        for player in players {
            player.id.hash(&mut hasher);
            player.team.hash(&mut hasher);
            player.position.hash(&mut hasher);
            player.salary.hash(&mut hasher);
            player.score.to_bits().hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A cached ranking and the pool it was computed for.
#[derive(Debug)]
struct CachedRanking {
    pool: Box<[Player]>,
    ranked: Arc<[CaptainValue]>,
}

impl CachedRanking {
    fn ranks(&self, players: &[Player]) -> bool {
        *self.pool == *players
    }
}

/// Captain value rankings shared across batches and threads.
///
/// Entries are looked up by [`PoolFingerprint`] and then checked against the
/// stored pool, so a fingerprint collision recomputes instead of reusing
/// another pool's indices.
#[derive(Debug, Default)]
pub struct CaptainValueCache {
    entries: RwLock<HashMap<PoolFingerprint, CachedRanking>>,
}

impl CaptainValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ranking for the model's eligible pool, computing it on
    /// first use.
    pub fn get_or_compute(&self, model: &ConstraintModel) -> Arc<[CaptainValue]> {
        let players = model.players();
        let key = PoolFingerprint::of(players);
        if let Some(entry) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .filter(|entry| entry.ranks(players))
        {
            debug!(fingerprint = key.value(), "Captain values reused");
            return Arc::clone(&entry.ranked);
        }

        let ranked: Arc<[CaptainValue]> = rank_captain_values(players).into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&key) {
            if entry.ranks(players) {
                return Arc::clone(&entry.ranked);
            }
            debug!(fingerprint = key.value(), "Captain value fingerprint collision");
        }
        entries.insert(
            key,
            CachedRanking {
                pool: players.into(),
                ranked: Arc::clone(&ranked),
            },
        );
        ranked
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Produces the ordered captain candidates for a Showdown batch.
#[derive(Debug, Clone, Copy)]
pub struct CaptainCandidateSelector<'m> {
    model: &'m ConstraintModel,
    candidate_count: usize,
}

impl<'m> CaptainCandidateSelector<'m> {
    pub fn new(model: &'m ConstraintModel, candidate_count: usize) -> Self {
        Self {
            model,
            candidate_count,
        }
    }

    /// Top candidates by captain value that can head a salary-legal roster.
    ///
    /// A locked captain is the sole candidate. Fails with
    /// `CaptainInfeasible` when no candidate fits.
    pub fn select(&self, cache: &CaptainValueCache) -> Result<Vec<usize>> {
        let model = self.model;
        let cheapest = CheapestRoster::new(model.players());

        if let Some(captain) = model.locked_captain() {
            return match self.roster_cost(&cheapest, captain) {
                Some(cost) if cost <= model.cap_half_units() => Ok(vec![captain]),
                cost => Err(OptimizerError::CaptainInfeasible {
                    reason: format!(
                        "locked captain {} {}",
                        model.player(captain).id,
                        shortfall(cost, model.salary_cap())
                    ),
                }),
            };
        }

        let ranked = cache.get_or_compute(model);
        let mut candidates = Vec::with_capacity(self.candidate_count.min(ranked.len()));
        let mut cheapest_cost: Option<u64> = None;
        for entry in ranked.iter() {
            let cost = self.roster_cost(&cheapest, entry.player);
            if let Some(cost) = cost {
                cheapest_cost = Some(cheapest_cost.map_or(cost, |c| c.min(cost)));
            }
            match cost {
                Some(cost) if cost <= model.cap_half_units() => {
                    candidates.push(entry.player);
                    if candidates.len() == self.candidate_count {
                        break;
                    }
                }
                _ => debug!(
                    player = %model.player(entry.player).id,
                    value = entry.value,
                    "Captain candidate cannot fit under the cap"
                ),
            }
        }

        if candidates.is_empty() {
            return Err(OptimizerError::CaptainInfeasible {
                reason: format!("every captain {}", shortfall(cheapest_cost, model.salary_cap())),
            });
        }
        debug!(
            candidates = candidates.len(),
            top = %model.player(candidates[0]).id,
            "Captain candidates selected"
        );
        Ok(candidates)
    }

    /// Half-unit cost of the cheapest roster headed by `captain`.
    fn roster_cost(&self, cheapest: &CheapestRoster<'_>, captain: usize) -> Option<u64> {
        let model = self.model;
        let fixed: Vec<usize> = model
            .locked()
            .iter()
            .copied()
            .filter(|&i| i != captain)
            .collect();
        let flex = cheapest.half_units(&fixed, Some(captain), model.bounds())?;
        Some(SlotKind::Captain.salary_half_units(model.player(captain).salary) + flex)
    }
}

fn shortfall(cost: Option<u64>, cap: u32) -> String {
    match cost {
        Some(cost) => format!(
            "needs at least {} in salary with the cheapest FLEX, over the cap of {cap}",
            cost as f64 / 2.0
        ),
        None => "leaves no legal set of FLEX players".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConstraintModelBuilder;
    use lineforge_core::{ContestFormat, OptimizationSettings, PlayerId, Position};
    use lineforge_test::{expensive_showdown_pool, player, showdown_pool};

    fn showdown_model(pool: &[Player], settings: &OptimizationSettings) -> ConstraintModel {
        ConstraintModelBuilder::new(ContestFormat::Showdown, settings)
            .build(pool)
            .unwrap()
    }

    #[test]
    fn test_rank_by_value_per_dollar() {
        let players = vec![
            player("star", "KC", Position::QB, 12_000, 24.0),
            player("value", "KC", Position::WR, 4_000, 12.0),
            player("tie", "BUF", Position::WR, 8_000, 24.0),
        ];
        let ranked = rank_captain_values(&players);
        let order: Vec<usize> = ranked.iter().map(|c| c.player).collect();
        // 0.003, then 0.003 with the higher score first, then 0.002
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_select_returns_top_k() {
        let pool = showdown_pool();
        let model = showdown_model(&pool, &OptimizationSettings::new(10));
        let cache = CaptainValueCache::new();

        let candidates = CaptainCandidateSelector::new(&model, 5)
            .select(&cache)
            .unwrap();
        assert_eq!(candidates.len(), 5);

        let ranked = cache.get_or_compute(&model);
        let expected: Vec<usize> = ranked.iter().take(5).map(|c| c.player).collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_cache_keyed_by_pool() {
        let pool = showdown_pool();
        let settings = OptimizationSettings::new(1);
        let model = showdown_model(&pool, &settings);
        let cache = CaptainValueCache::new();

        let first = cache.get_or_compute(&model);
        let second = cache.get_or_compute(&model);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let mut changed = pool.clone();
        changed[0].score += 1.0;
        let other = showdown_model(&changed, &settings);
        cache.get_or_compute(&other);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_rejects_entry_for_another_pool() {
        let pool = showdown_pool();
        let model = showdown_model(&pool, &OptimizationSettings::new(1));
        let cache = CaptainValueCache::new();

        // An entry stored under this pool's fingerprint but built for a
        // different pool, with an index past the end of this one.
        let foreign: Arc<[CaptainValue]> = vec![CaptainValue {
            player: 999,
            value: 1.0,
        }]
        .into();
        cache.entries.write().unwrap().insert(
            PoolFingerprint::of(model.players()),
            CachedRanking {
                pool: pool[..3].to_vec().into(),
                ranked: foreign,
            },
        );

        let ranked = cache.get_or_compute(&model);
        assert_eq!(&*ranked, rank_captain_values(model.players()).as_slice());
        assert_eq!(cache.len(), 1);

        let candidates = CaptainCandidateSelector::new(&model, 5)
            .select(&cache)
            .unwrap();
        assert!(candidates.iter().all(|&i| i < model.players().len()));
    }

    #[test]
    fn test_locked_captain_is_sole_candidate() {
        let pool = showdown_pool();
        let id = pool[5].id.clone();
        let settings = OptimizationSettings::new(3).with_locked_captain(id.clone());
        let model = showdown_model(&pool, &settings);

        let candidates = CaptainCandidateSelector::new(&model, 5)
            .select(&CaptainValueCache::new())
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(model.player(candidates[0]).id, id);
    }

    #[test]
    fn test_expensive_pool_is_captain_infeasible() {
        let pool = expensive_showdown_pool();
        let model = showdown_model(&pool, &OptimizationSettings::new(1));

        let err = CaptainCandidateSelector::new(&model, 5)
            .select(&CaptainValueCache::new())
            .unwrap_err();
        match err {
            OptimizerError::CaptainInfeasible { reason } => {
                assert!(reason.contains("over the cap of 50000"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locks_count_toward_captain_cost() {
        let mut players = vec![
            player("cheap-1", "KC", Position::WR, 3_000, 9.0),
            player("cheap-2", "KC", Position::WR, 3_000, 8.0),
            player("cheap-3", "BUF", Position::RB, 3_000, 7.0),
            player("cheap-4", "BUF", Position::TE, 3_000, 6.0),
            player("cheap-5", "BUF", Position::K, 3_000, 5.0),
        ];
        players.push(player("lock", "KC", Position::QB, 12_000, 20.0));
        players.push(player("big", "BUF", Position::QB, 12_000, 30.0));

        let settings = OptimizationSettings::new(1).with_lock("lock");
        let model = showdown_model(&players, &settings);
        let candidates = CaptainCandidateSelector::new(&model, 10)
            .select(&CaptainValueCache::new())
            .unwrap();

        // big at 18000 + lock 12000 + four cheap 12000 = 42000 fits,
        // and the locked player may captain itself
        let ids: Vec<&PlayerId> = candidates.iter().map(|&i| &model.player(i).id).collect();
        assert!(ids.contains(&&PlayerId::new("big")));
        assert!(ids.contains(&&PlayerId::new("lock")));
        assert_eq!(candidates.len(), players.len());
    }
}
