//! Tests for batch orchestration.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lineforge_config::OptimizerConfig;
use lineforge_core::{
    BatchStatus, ConstraintError, ContestFormat, OptimizationSettings, OptimizerError, PlayerId,
};
use lineforge_test::{expensive_showdown_pool, main_slate_pool, scarce_showdown_pool};
use tokio::sync::mpsc;

use super::*;

fn orchestrator() -> BatchOrchestrator {
    BatchOrchestrator::new(OptimizerConfig::new())
}

fn distinct_sets(lineups: &[Lineup]) -> usize {
    lineups
        .iter()
        .map(|l| l.player_ids())
        .collect::<HashSet<Vec<PlayerId>>>()
        .len()
}

#[test]
fn test_main_slate_batch_completes() {
    let pool = main_slate_pool();
    let result = orchestrator()
        .run(&pool, ContestFormat::MainSlate, &OptimizationSettings::new(3))
        .unwrap();

    assert_eq!(result.status, BatchStatus::Completed);
    assert_eq!(result.generated, 3);
    assert_eq!(result.requested, 3);
    assert!(result.failure_reason.is_none());
    assert_eq!(distinct_sets(&result.lineups), 3);
    assert_eq!(result.statistics.attempts, 3);
    assert!(result.statistics.nodes_explored > 0);

    // every later lineup is solved under more cuts
    for pair in result.lineups.windows(2) {
        assert!(pair[1].total_score() <= pair[0].total_score() + 1e-9);
    }
}

#[test]
fn test_scarce_pool_ends_partial() {
    let pool = scarce_showdown_pool();
    let result = orchestrator()
        .run(&pool, ContestFormat::Showdown, &OptimizationSettings::new(10))
        .unwrap();

    assert_eq!(result.status, BatchStatus::PartialCompleted);
    assert_eq!(result.generated, 6);
    assert_eq!(result.requested, 10);
    assert_eq!(distinct_sets(&result.lineups), 6);
    assert_eq!(
        result.failure_reason.as_deref(),
        Some("generated 6 of 10 requested lineups: no additional feasible combinations remain under current constraints")
    );
    assert_eq!(result.statistics.attempts, 7);
    assert!(result
        .lineups
        .iter()
        .all(|l| l.total_salary() <= 50_000.0 && l.captain().is_some()));
}

#[test]
fn test_min_unique_players_spreads_lineups() {
    let pool = scarce_showdown_pool();
    let settings = OptimizationSettings::new(10).with_min_unique_players(2);
    let result = orchestrator()
        .run(&pool, ContestFormat::Showdown, &settings)
        .unwrap();

    // any two of the six legal rosters share five players
    assert_eq!(result.generated, 1);
    assert!(!result.is_complete());
}

#[test]
fn test_expensive_pool_is_captain_infeasible() {
    let pool = expensive_showdown_pool();
    let err = orchestrator()
        .run(&pool, ContestFormat::Showdown, &OptimizationSettings::new(10))
        .unwrap_err();
    assert!(matches!(err, OptimizerError::CaptainInfeasible { .. }));
    assert!(err.is_pre_solve());
}

#[test]
fn test_constraint_errors_surface_before_solving() {
    let pool = main_slate_pool();
    let settings = OptimizationSettings::new(2).with_lock("nobody");
    let err = orchestrator()
        .run(&pool, ContestFormat::MainSlate, &settings)
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::Constraint(ConstraintError::UnknownPlayer(_))
    ));
}

#[test]
fn test_locked_captain_heads_every_lineup() {
    let pool = scarce_showdown_pool();
    let settings = OptimizationSettings::new(3).with_locked_captain("KC-k-1");
    let result = orchestrator()
        .run(&pool, ContestFormat::Showdown, &settings)
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.distinct_captains(), 1);
    for lineup in &result.lineups {
        let captain = lineup.captain().unwrap();
        assert_eq!(captain.player_id, PlayerId::new("KC-k-1"));
        assert_eq!(captain.effective_salary(), 1_500.0);
    }
}

#[test]
fn test_captains_rotate() {
    let pool = scarce_showdown_pool();
    let result = orchestrator()
        .run(&pool, ContestFormat::Showdown, &OptimizationSettings::new(5))
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.distinct_captains(), 5);
}

#[test]
fn test_cancelled_batch_is_partial() {
    let pool = main_slate_pool();
    let flag = Arc::new(AtomicBool::new(true));
    let result = orchestrator()
        .with_terminate_flag(flag.clone())
        .run(&pool, ContestFormat::MainSlate, &OptimizationSettings::new(2))
        .unwrap();

    assert_eq!(result.generated, 0);
    assert_eq!(result.status, BatchStatus::PartialCompleted);
    assert_eq!(
        result.failure_reason.as_deref(),
        Some("generated 0 of 2 requested lineups: optimization was cancelled")
    );
    assert!(flag.load(Ordering::SeqCst));
}

#[test]
fn test_node_limit_is_a_timeout() {
    let pool = main_slate_pool();
    let mut config = OptimizerConfig::new().with_node_limit(1);
    config.search.termination_check_interval = 1;

    let result = BatchOrchestrator::new(config)
        .run(&pool, ContestFormat::MainSlate, &OptimizationSettings::new(2))
        .unwrap();
    assert_eq!(result.generated, 0);
    let reason = result.failure_reason.unwrap();
    assert!(reason.contains("timed out"), "{reason}");
}

#[test]
fn test_lineups_are_streamed() {
    let pool = scarce_showdown_pool();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let result = orchestrator()
        .with_lineup_sender(sender)
        .run(&pool, ContestFormat::Showdown, &OptimizationSettings::new(4))
        .unwrap();

    let mut streamed = Vec::new();
    while let Ok(lineup) = receiver.try_recv() {
        streamed.push(lineup);
    }
    assert_eq!(streamed, result.lineups);
}

#[test]
fn test_cache_shared_across_batches() {
    let pool = scarce_showdown_pool();
    let cache = Arc::new(CaptainValueCache::new());
    let settings = OptimizationSettings::new(2);

    for _ in 0..2 {
        orchestrator()
            .with_cache(Arc::clone(&cache))
            .run(&pool, ContestFormat::Showdown, &settings)
            .unwrap();
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_batch_state_terminal() {
    assert!(BatchState::Completed.is_terminal());
    assert!(BatchState::PartialCompleted.is_terminal());
    assert!(!BatchState::Solving(0).is_terminal());
    assert_eq!(BatchState::LineupAccepted(3).to_string(), "LineupAccepted(3)");
}
