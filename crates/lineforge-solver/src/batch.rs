//! Batch orchestration.
//!
//! [`BatchOrchestrator`] drives the solve/diversify loop for one request:
//!
//! ```text
//! Idle -> Solving(i) -> LineupAccepted(i) -> Solving(i + 1) -> ... -> Completed
//!                    \-> Infeasible -> PartialCompleted
//! ```
//!
//! Lineups within a batch are solved sequentially: every solve sees the
//! exclusion cuts of all lineups accepted before it.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use lineforge_config::{BounderType, OptimizerConfig};
use lineforge_core::{
    BatchStatistics, ContestFormat, Lineup, OptimizationResult, OptimizationSettings,
    OptimizerError, Player, Result,
};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::captain::{CaptainCandidateSelector, CaptainValueCache};
use crate::diversity::{CaptainRotation, DiversityEnforcer};
use crate::model::{ConstraintModel, ConstraintModelBuilder};
use crate::scope::SolveScope;
use crate::search::{LagrangianBounder, LineupSolver, ScoreBounder, SolvedLineup, TopScoreBounder};
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};

/// Reason reported when the feasible set runs dry.
pub const EXHAUSTED_REASON: &str =
    "no additional feasible combinations remain under current constraints";

/// Position of a batch in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    /// Solving the lineup with this zero-based index.
    Solving(usize),
    LineupAccepted(usize),
    Infeasible,
    Completed,
    PartialCompleted,
}

impl BatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Completed | BatchState::PartialCompleted)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Idle => write!(f, "Idle"),
            BatchState::Solving(i) => write!(f, "Solving({i})"),
            BatchState::LineupAccepted(i) => write!(f, "LineupAccepted({i})"),
            BatchState::Infeasible => write!(f, "Infeasible"),
            BatchState::Completed => write!(f, "Completed"),
            BatchState::PartialCompleted => write!(f, "PartialCompleted"),
        }
    }
}

/// Runs lineup batches with a fixed engine configuration.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    config: OptimizerConfig,
    cache: Arc<CaptainValueCache>,
    terminate: Option<Arc<AtomicBool>>,
    sender: Option<mpsc::UnboundedSender<Lineup>>,
}

impl BatchOrchestrator {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            cache: Arc::new(CaptainValueCache::new()),
            terminate: None,
            sender: None,
        }
    }

    /// Shares a captain value cache with other orchestrators.
    pub fn with_cache(mut self, cache: Arc<CaptainValueCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Cancels the batch once the flag is set.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    /// Streams every accepted lineup as soon as it is solved.
    pub fn with_lineup_sender(mut self, sender: mpsc::UnboundedSender<Lineup>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<CaptainValueCache> {
        &self.cache
    }

    /// Generates up to `settings.lineup_count` distinct lineups.
    ///
    /// Constraint and captain feasibility errors are returned before any
    /// solve. Infeasibility, timeouts and cancellation during the batch end
    /// it early with a partial result.
    pub fn run(
        &self,
        players: &[Player],
        format: ContestFormat,
        settings: &OptimizationSettings,
    ) -> Result<OptimizationResult> {
        let started = Instant::now();
        let model = ConstraintModelBuilder::new(format, settings).build(players)?;
        let captains = if format.has_captain() {
            CaptainCandidateSelector::new(&model, self.config.captain.candidate_count)
                .select(&self.cache)?
        } else {
            Vec::new()
        };

        let termination = OrTermination::new((
            TimeTermination::new(self.config.time_limit()),
            self.config.termination.node_limit.map(NodeCountTermination::new),
            ExternalTermination,
        ));
        match self.config.search.bounder {
            BounderType::Lagrangian => self.run_batch(
                LineupSolver::new(&model, LagrangianBounder::new(model.players()), termination),
                captains,
                started,
            ),
            BounderType::TopScore => self.run_batch(
                LineupSolver::new(&model, TopScoreBounder::new(), termination),
                captains,
                started,
            ),
        }
    }

    fn run_batch<B, T>(
        &self,
        solver: LineupSolver<'_, B, T>,
        captains: Vec<usize>,
        started: Instant,
    ) -> Result<OptimizationResult>
    where
        B: ScoreBounder,
        T: Termination,
    {
        let solver = solver.with_check_interval(self.config.search.termination_check_interval);
        let model = solver.model();
        let requested = model.lineup_count();
        let mut rotation = CaptainRotation::new(captains);
        let mut enforcer = DiversityEnforcer::new(model.min_unique_players());
        let mut lineups: Vec<Lineup> = Vec::new();
        let mut statistics = BatchStatistics::default();
        let mut state = BatchState::Idle;
        let mut shortfall: Option<OptimizerError> = None;

        info!(
            event = "batch_start",
            format = %model.format(),
            requested,
            eligible = model.players().len(),
            captain_candidates = rotation.candidates().len(),
            bounder = %self.config.search.bounder,
        );

        for i in 0..requested {
            state = transition(state, BatchState::Solving(i));
            let mut scope = self.attempt_scope();
            scope.start_solving();
            statistics.attempts += 1;

            let outcome = self.attempt(&solver, model, &mut rotation, &enforcer, &mut scope);
            statistics.nodes_explored += scope.nodes_explored();

            match outcome {
                Ok(solved) => {
                    state = transition(state, BatchState::LineupAccepted(i));
                    enforcer.record(&solved.players);
                    info!(
                        event = "lineup_accepted",
                        index = i,
                        score = solved.lineup.total_score(),
                        salary = solved.lineup.total_salary(),
                        captain = solved.captain.map(|c| model.player(c).id.as_str()),
                        nodes = scope.nodes_explored(),
                    );
                    if let Some(sender) = &self.sender {
                        // A dropped receiver only stops streaming.
                        let _ = sender.send(solved.lineup.clone());
                    }
                    lineups.push(solved.lineup);
                }
                Err(err) if err.is_attempt_terminal() => {
                    state = transition(state, BatchState::Infeasible);
                    info!(event = "attempt_infeasible", index = i, reason = %err);
                    shortfall = Some(err);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        statistics.elapsed_ms = started.elapsed().as_millis() as u64;
        let result = match shortfall {
            None => {
                transition(state, BatchState::Completed);
                OptimizationResult::completed(lineups, statistics)
            }
            Some(cause) => {
                transition(state, BatchState::PartialCompleted);
                let reason = format!(
                    "generated {} of {} requested lineups: {}",
                    lineups.len(),
                    requested,
                    shortfall_cause(&cause)
                );
                OptimizationResult::partial(lineups, requested, reason, statistics)
            }
        };

        info!(
            event = "batch_end",
            status = ?result.status,
            generated = result.generated,
            requested = result.requested,
            attempts = result.statistics.attempts,
            nodes = result.statistics.nodes_explored,
            elapsed_ms = result.statistics.elapsed_ms,
            distinct_captains = result.distinct_captains(),
        );
        Ok(result)
    }

    /// One lineup attempt. In captain formats, captains without a feasible
    /// lineup are retired and the next candidate is tried.
    fn attempt<B, T>(
        &self,
        solver: &LineupSolver<'_, B, T>,
        model: &ConstraintModel,
        rotation: &mut CaptainRotation,
        enforcer: &DiversityEnforcer,
        scope: &mut SolveScope,
    ) -> Result<SolvedLineup>
    where
        B: ScoreBounder,
        T: Termination,
    {
        if !model.format().has_captain() {
            return solver.solve(None, enforcer.cuts(), scope);
        }
        while let Some(captain) = rotation.next_captain() {
            match solver.solve(Some(captain), enforcer.cuts(), scope) {
                Err(OptimizerError::NoFeasibleLineup) => {
                    debug!(
                        captain = %model.player(captain).id,
                        live = rotation.live().saturating_sub(1),
                        "Captain exhausted"
                    );
                    rotation.exhaust(captain);
                }
                outcome => return outcome,
            }
        }
        Err(OptimizerError::NoFeasibleLineup)
    }

    fn attempt_scope(&self) -> SolveScope {
        match &self.terminate {
            Some(flag) => SolveScope::new().with_terminate_flag(Arc::clone(flag)),
            None => SolveScope::new(),
        }
    }
}

fn transition(from: BatchState, to: BatchState) -> BatchState {
    trace!(from = %from, to = %to, "Batch state");
    to
}

fn shortfall_cause(err: &OptimizerError) -> String {
    match err {
        OptimizerError::NoFeasibleLineup => EXHAUSTED_REASON.to_string(),
        OptimizerError::SolverTimeout { elapsed } => format!(
            "solver timed out after {:.1}s on the next lineup",
            elapsed.as_secs_f64()
        ),
        OptimizerError::Cancelled => "optimization was cancelled".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
