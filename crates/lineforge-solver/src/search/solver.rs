//! Lineup solver.
//!
//! Depth-first branch-and-bound over the free players in model order (score
//! descending). Each node decides one player: the include branch is explored
//! before the exclude branch, so the first leaves reached are high-scoring
//! lineups that seed the incumbent early. A node is pruned when
//!
//! - the open slots can no longer be filled within the position bounds,
//! - the cheapest completion exceeds the remaining salary,
//! - a linear constraint is violated for every completion, or
//! - the [`ScoreBounder`] bound does not beat the incumbent.
//!
//! A leaf replaces the incumbent only on a strict improvement, so among
//! equal-score lineups the first one in search order wins and repeated runs
//! return the same lineup.

use lineforge_core::{Lineup, OptimizerError, Position, Result, SlotKind};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::assign::assign_slots;
use super::bounder::{BoundCandidate, BoundInput, ScoreBounder};
use crate::model::{Comparison, ConstraintModel, LinearConstraint, EPSILON};
use crate::scope::SolveScope;
use crate::termination::Termination;

type Selection = SmallVec<[usize; 9]>;

/// Default number of nodes between termination checks.
const DEFAULT_CHECK_INTERVAL: u64 = 256;

/// An optimal lineup together with the model indices it was built from.
#[derive(Debug, Clone)]
pub struct SolvedLineup {
    pub lineup: Lineup,
    /// Every rostered player, captain included, ascending.
    pub players: SmallVec<[usize; 9]>,
    pub captain: Option<usize>,
}

/// Solves one lineup at a time against a [`ConstraintModel`].
#[derive(Debug)]
pub struct LineupSolver<'m, B, T> {
    model: &'m ConstraintModel,
    bounder: B,
    termination: T,
    check_interval: u64,
}

impl<'m, B, T> LineupSolver<'m, B, T>
where
    B: ScoreBounder,
    T: Termination,
{
    pub fn new(model: &'m ConstraintModel, bounder: B, termination: T) -> Self {
        Self {
            model,
            bounder,
            termination,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes.max(1);
        self
    }

    pub fn model(&self) -> &'m ConstraintModel {
        self.model
    }

    /// Finds the highest-scoring lineup that satisfies the model and every
    /// exclusion cut.
    ///
    /// `captain` must be set for captain formats and `None` otherwise. The
    /// scope must already be started; its node counter keeps running across
    /// calls so one attempt can span several captains.
    pub fn solve(
        &self,
        captain: Option<usize>,
        cuts: &[LinearConstraint],
        scope: &mut SolveScope,
    ) -> Result<SolvedLineup> {
        let model = self.model;
        if captain.is_some() != model.format().has_captain() {
            return Err(OptimizerError::Internal(format!(
                "{} solve called with captain {:?}",
                model.format(),
                captain
            )));
        }

        let fixed: Vec<usize> = model
            .locked()
            .iter()
            .copied()
            .filter(|&i| Some(i) != captain)
            .collect();
        let constraints: Vec<&LinearConstraint> =
            model.constraints().iter().chain(cuts.iter()).collect();

        debug!(
            event = "solve_start",
            captain = captain.map(|c| model.player(c).id.as_str()),
            cuts = cuts.len(),
            "Solving lineup"
        );
        let nodes_before = scope.nodes_explored();

        let outcome = match Search::new(self, scope, captain, &fixed, constraints) {
            Some(mut search) => search.run(),
            None => Ok(None),
        };

        let nodes = scope.nodes_explored() - nodes_before;
        let (score, chosen) = match outcome {
            Ok(Some(best)) => best,
            Ok(None) => {
                debug!(event = "solve_end", nodes, "No feasible lineup");
                return Err(OptimizerError::NoFeasibleLineup);
            }
            Err(Halt) if scope.is_terminate_early() => return Err(OptimizerError::Cancelled),
            Err(Halt) => {
                return Err(OptimizerError::SolverTimeout {
                    elapsed: scope.elapsed().unwrap_or_default(),
                })
            }
        };

        let mut standard = fixed;
        standard.extend_from_slice(&chosen);
        let lineup = assign_slots(model, captain, &standard)?;

        let mut players: Selection = standard.iter().copied().chain(captain).collect();
        players.sort_unstable();
        debug!(event = "solve_end", nodes, score, "Lineup solved");

        Ok(SolvedLineup {
            lineup,
            players,
            captain,
        })
    }
}

/// Raised when a termination fires mid-search.
#[derive(Debug)]
struct Halt;

#[derive(Debug, Clone, Copy)]
struct SuffixStats {
    count: [usize; Position::COUNT],
    min_salary: [u32; Position::COUNT],
    min_any: u32,
}

impl SuffixStats {
    const EMPTY: Self = Self {
        count: [0; Position::COUNT],
        min_salary: [u32::MAX; Position::COUNT],
        min_any: u32::MAX,
    };
}

/// Per-call search state.
struct Search<'s, B, T> {
    model: &'s ConstraintModel,
    bounder: &'s B,
    termination: &'s T,
    check_interval: u64,
    scope: &'s mut SolveScope,
    constraints: Vec<&'s LinearConstraint>,

    /// Undecided players in model order.
    free: Vec<usize>,
    /// `(constraint, coefficient)` pairs per free player.
    terms: Vec<SmallVec<[(usize, f64); 4]>>,
    /// Statistics over `free[k..]`, indexed by `k`.
    suffix: Vec<SuffixStats>,
    /// Sum of negative and positive coefficients over `free[k..]`, per
    /// constraint.
    slack: Vec<Vec<(f64, f64)>>,

    fixed: Selection,
    chosen: Selection,
    counts: [usize; Position::COUNT],
    open: usize,
    budget: u64,
    score: f64,
    lhs: Vec<f64>,
    scratch: Vec<BoundCandidate>,
    best: Option<(f64, Selection)>,
}

impl<'s, B, T> Search<'s, B, T>
where
    B: ScoreBounder,
    T: Termination,
{
    /// Returns `None` when the fixed players alone break the roster or cap.
    fn new(
        solver: &'s LineupSolver<'_, B, T>,
        scope: &'s mut SolveScope,
        captain: Option<usize>,
        fixed_players: &[usize],
        constraints: Vec<&'s LinearConstraint>,
    ) -> Option<Self> {
        let model = solver.model;
        let bounds = model.bounds();

        let mut fixed = Selection::new();
        let mut counts = [0usize; Position::COUNT];
        let mut budget = model.cap_half_units();
        let mut score = 0.0;
        if let Some(c) = captain {
            let player = model.player(c);
            budget = budget.checked_sub(SlotKind::Captain.salary_half_units(player.salary))?;
            score += SlotKind::Captain.effective_score(player.score);
            fixed.push(c);
        }
        for &i in fixed_players {
            let player = model.player(i);
            budget = budget.checked_sub(SlotKind::Standard.salary_half_units(player.salary))?;
            score += player.score;
            counts[player.position.index()] += 1;
            fixed.push(i);
        }
        if fixed_players.len() > bounds.total
            || Position::ALL
                .iter()
                .any(|&p| counts[p.index()] > bounds.max(p))
        {
            return None;
        }

        let free: Vec<usize> = (0..model.players().len())
            .filter(|i| !fixed.contains(i))
            .collect();
        let mut free_slot = vec![None; model.players().len()];
        for (k, &i) in free.iter().enumerate() {
            free_slot[i] = Some(k);
        }

        let mut terms: Vec<SmallVec<[(usize, f64); 4]>> = vec![SmallVec::new(); free.len()];
        for (c, constraint) in constraints.iter().enumerate() {
            for &(i, a) in constraint.terms() {
                if let Some(k) = free_slot[i] {
                    terms[k].push((c, a));
                }
            }
        }

        let m = free.len();
        let mut suffix = vec![SuffixStats::EMPTY; m + 1];
        let mut slack = vec![vec![(0.0, 0.0); m + 1]; constraints.len()];
        for k in (0..m).rev() {
            let player = model.player(free[k]);
            let at = player.position.index();
            let mut stats = suffix[k + 1];
            stats.count[at] += 1;
            stats.min_salary[at] = stats.min_salary[at].min(player.salary);
            stats.min_any = stats.min_any.min(player.salary);
            suffix[k] = stats;

            for per_constraint in slack.iter_mut() {
                per_constraint[k] = per_constraint[k + 1];
            }
            for &(c, a) in &terms[k] {
                if a < 0.0 {
                    slack[c][k].0 += a;
                } else {
                    slack[c][k].1 += a;
                }
            }
        }

        let lhs = constraints.iter().map(|c| c.lhs(&fixed)).collect();

        Some(Self {
            model,
            bounder: &solver.bounder,
            termination: &solver.termination,
            check_interval: solver.check_interval,
            scope,
            constraints,
            free,
            terms,
            suffix,
            slack,
            fixed,
            chosen: Selection::new(),
            counts,
            open: bounds.total - fixed_players.len(),
            budget,
            score,
            lhs,
            scratch: Vec::with_capacity(m),
            best: None,
        })
    }

    fn run(&mut self) -> std::result::Result<Option<(f64, Selection)>, Halt> {
        if self.termination.is_terminated(self.scope) {
            return Err(Halt);
        }
        self.descend(0)?;
        Ok(self.best.take())
    }

    fn descend(&mut self, k: usize) -> std::result::Result<(), Halt> {
        self.scope.increment_nodes();
        if self.scope.nodes_explored() % self.check_interval == 0
            && self.termination.is_terminated(self.scope)
        {
            return Err(Halt);
        }

        if self.open == 0 {
            self.evaluate_leaf();
            return Ok(());
        }
        if k == self.free.len() || !self.can_complete(k) {
            return Ok(());
        }
        if let Some(best) = self.best.as_ref().map(|(score, _)| *score) {
            if self.optimistic_bound(k) <= best + EPSILON {
                return Ok(());
            }
        }

        if self.can_add(k) {
            self.push(k);
            let outcome = self.descend(k + 1);
            self.pop(k);
            outcome?;
        }
        self.descend(k + 1)
    }

    /// Cheap necessary conditions for completing the lineup from `free[k..]`.
    fn can_complete(&self, k: usize) -> bool {
        let bounds = self.model.bounds();
        let stats = &self.suffix[k];

        let mut needed = 0usize;
        let mut capacity = 0usize;
        let mut min_cost = 0u64;
        for position in Position::ALL {
            let at = position.index();
            let need = bounds.min(position).saturating_sub(self.counts[at]);
            if need > stats.count[at] {
                return false;
            }
            needed += need;
            capacity += stats.count[at].min(bounds.max(position).saturating_sub(self.counts[at]));
            min_cost += need as u64 * SlotKind::Standard.salary_half_units(stats.min_salary[at]);
        }
        if needed > self.open || capacity < self.open {
            return false;
        }
        min_cost +=
            (self.open - needed) as u64 * SlotKind::Standard.salary_half_units(stats.min_any);
        if min_cost > self.budget {
            return false;
        }

        self.constraints.iter().enumerate().all(|(c, constraint)| {
            let (negative, positive) = self.slack[c][k];
            match constraint.comparison() {
                Comparison::AtMost => self.lhs[c] + negative <= constraint.rhs() + EPSILON,
                Comparison::AtLeast => self.lhs[c] + positive >= constraint.rhs() - EPSILON,
            }
        })
    }

    fn can_add(&self, k: usize) -> bool {
        let bounds = self.model.bounds();
        let player = self.model.player(self.free[k]);
        if self.counts[player.position.index()] >= bounds.max(player.position) {
            return false;
        }
        if SlotKind::Standard.salary_half_units(player.salary) > self.budget {
            return false;
        }
        let needed_after: usize = Position::ALL
            .iter()
            .map(|&p| {
                let count = self.counts[p.index()] + usize::from(p == player.position);
                bounds.min(p).saturating_sub(count)
            })
            .sum();
        needed_after < self.open
    }

    fn optimistic_bound(&mut self, k: usize) -> f64 {
        let bounds = self.model.bounds();
        let mut caps = [0usize; Position::COUNT];
        for position in Position::ALL {
            let at = position.index();
            caps[at] = bounds.max(position).saturating_sub(self.counts[at]);
        }

        self.scratch.clear();
        for &i in &self.free[k..] {
            let player = self.model.player(i);
            let group = player.position.index();
            if caps[group] > 0
                && SlotKind::Standard.salary_half_units(player.salary) <= self.budget
            {
                self.scratch.push(BoundCandidate::new(player.score, player.salary, group));
            }
        }
        self.bounder.optimistic_bound(&BoundInput {
            current_score: self.score,
            open_slots: self.open,
            budget_half_units: self.budget,
            candidates: &self.scratch,
            group_caps: &caps,
        })
    }

    fn push(&mut self, k: usize) {
        let i = self.free[k];
        let player = self.model.player(i);
        self.chosen.push(i);
        self.counts[player.position.index()] += 1;
        self.open -= 1;
        self.budget -= SlotKind::Standard.salary_half_units(player.salary);
        self.score += player.score;
        for &(c, a) in &self.terms[k] {
            self.lhs[c] += a;
        }
    }

    fn pop(&mut self, k: usize) {
        let i = self.free[k];
        let player = self.model.player(i);
        self.chosen.pop();
        self.counts[player.position.index()] -= 1;
        self.open += 1;
        self.budget += SlotKind::Standard.salary_half_units(player.salary);
        self.score -= player.score;
        for &(c, a) in &self.terms[k] {
            self.lhs[c] -= a;
        }
    }

    fn evaluate_leaf(&mut self) {
        let bounds = self.model.bounds();
        if Position::ALL
            .iter()
            .any(|&p| self.counts[p.index()] < bounds.min(p))
        {
            return;
        }
        if !self
            .constraints
            .iter()
            .zip(&self.lhs)
            .all(|(constraint, &lhs)| constraint.holds_for(lhs))
        {
            return;
        }

        let mut teams: SmallVec<[usize; 9]> = self
            .fixed
            .iter()
            .chain(&self.chosen)
            .map(|&i| self.model.team_index(i))
            .collect();
        teams.sort_unstable();
        teams.dedup();
        if teams.len() < self.model.format().min_distinct_teams() {
            return;
        }

        let improves = self
            .best
            .as_ref()
            .map_or(true, |(best, _)| self.score > best + EPSILON);
        if improves {
            trace!(score = self.score, nodes = self.scope.nodes_explored(), "New incumbent");
            self.best = Some((self.score, self.chosen.clone()));
        }
    }
}
