//! Diversity across a lineup batch.
//!
//! [`DiversityEnforcer`] turns every accepted lineup into an exclusion cut so
//! the next solve cannot reproduce it. [`CaptainRotation`] cycles Showdown
//! captains through the candidate list.

use tracing::trace;

use crate::model::LinearConstraint;

/// Accumulates exclusion cuts for previously generated lineups.
///
/// With `min_unique` set to `u`, a lineup `L` contributes
/// `sum(x_p for p in L) <= |L| - u`: the next lineup must differ from `L` in
/// at least `u` players. `u = 1` forbids only the identical player set.
#[derive(Debug, Clone)]
pub struct DiversityEnforcer {
    min_unique: usize,
    cuts: Vec<LinearConstraint>,
}

impl DiversityEnforcer {
    pub fn new(min_unique: usize) -> Self {
        Self {
            min_unique: min_unique.max(1),
            cuts: Vec::new(),
        }
    }

    /// Adds the cut for a lineup given by its model player indices, captain
    /// included.
    pub fn record(&mut self, players: &[usize]) {
        let rhs = players.len().saturating_sub(self.min_unique) as f64;
        let cut = LinearConstraint::at_most(
            format!("exclude:{}", self.cuts.len()),
            players.iter().map(|&i| (i, 1.0)),
            rhs,
        );
        trace!(cut = cut.name(), players = players.len(), rhs, "Exclusion cut added");
        self.cuts.push(cut);
    }

    pub fn cuts(&self) -> &[LinearConstraint] {
        &self.cuts
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Round-robin over captain candidates.
///
/// A candidate is not offered again until every other live candidate has been
/// offered in the current cycle. Candidates with no feasible lineup left are
/// retired for the rest of the batch, since cuts only ever shrink the
/// feasible set.
#[derive(Debug, Clone)]
pub struct CaptainRotation {
    candidates: Vec<usize>,
    offered: Vec<bool>,
    exhausted: Vec<bool>,
    cursor: usize,
}

impl CaptainRotation {
    pub fn new(candidates: Vec<usize>) -> Self {
        let n = candidates.len();
        Self {
            candidates,
            offered: vec![false; n],
            exhausted: vec![false; n],
            cursor: 0,
        }
    }

    /// Next captain to try, or `None` once every candidate is exhausted.
    pub fn next_captain(&mut self) -> Option<usize> {
        if self.exhausted.iter().all(|&e| e) {
            return None;
        }
        let n = self.candidates.len();
        if !(0..n).any(|slot| self.is_pending(slot)) {
            trace!("Captain rotation wrapped");
            self.offered.fill(false);
        }
        let slot = (0..n)
            .map(|step| (self.cursor + step) % n)
            .find(|&slot| self.is_pending(slot))?;
        self.offered[slot] = true;
        self.cursor = (slot + 1) % n;
        Some(self.candidates[slot])
    }

    fn is_pending(&self, slot: usize) -> bool {
        !self.exhausted[slot] && !self.offered[slot]
    }

    /// Retires a captain that has no feasible lineup left.
    pub fn exhaust(&mut self, captain: usize) {
        if let Some(slot) = self.candidates.iter().position(|&c| c == captain) {
            self.exhausted[slot] = true;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.iter().all(|&e| e)
    }

    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    pub fn live(&self) -> usize {
        self.exhausted.iter().filter(|&&e| !e).count()
    }
}
