//! Tests for the lineup solver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lineforge_core::{
    ContestFormat, OptimizationSettings, OptimizerError, Player, Position, Result, StackRule,
};
use lineforge_test::{main_slate_pool, player};

use super::*;
use crate::model::{ConstraintModel, ConstraintModelBuilder, LinearConstraint};
use crate::scope::SolveScope;
use crate::termination::{ExternalTermination, NodeCountTermination, TimeTermination};

fn build(format: ContestFormat, pool: &[Player], settings: &OptimizationSettings) -> ConstraintModel {
    ConstraintModelBuilder::new(format, settings)
        .build(pool)
        .unwrap()
}

fn solve_with<B: ScoreBounder>(
    model: &ConstraintModel,
    bounder: B,
    captain: Option<usize>,
    cuts: &[LinearConstraint],
) -> Result<SolvedLineup> {
    let mut scope = SolveScope::new();
    scope.start_solving();
    LineupSolver::new(model, bounder, TimeTermination::seconds(60)).solve(captain, cuts, &mut scope)
}

fn solve(model: &ConstraintModel, captain: Option<usize>) -> SolvedLineup {
    solve_with(model, LagrangianBounder::new(model.players()), captain, &[]).unwrap()
}

/// Ten players on two teams; small enough to enumerate.
fn small_showdown_pool() -> Vec<Player> {
    vec![
        player("kc-qb", "KC", Position::QB, 11_000, 22.0),
        player("kc-wr1", "KC", Position::WR, 9_000, 18.5),
        player("kc-wr2", "KC", Position::WR, 6_000, 13.0),
        player("kc-rb", "KC", Position::RB, 4_000, 9.1),
        player("kc-k", "KC", Position::K, 2_000, 5.0),
        player("buf-qb", "BUF", Position::QB, 10_500, 21.0),
        player("buf-rb", "BUF", Position::RB, 8_000, 17.2),
        player("buf-wr", "BUF", Position::WR, 5_500, 11.9),
        player("buf-te", "BUF", Position::TE, 3_000, 7.3),
        player("buf-dst", "BUF", Position::DST, 2_500, 6.4),
    ]
}

fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut with_first: Vec<Vec<usize>> = combinations(&items[1..], k - 1)
        .into_iter()
        .map(|mut rest| {
            rest.insert(0, items[0]);
            rest
        })
        .collect();
    with_first.extend(combinations(&items[1..], k));
    with_first
}

/// Best Showdown score for a fixed captain by enumeration.
fn brute_force_showdown(model: &ConstraintModel, captain: usize) -> Option<f64> {
    let others: Vec<usize> = (0..model.players().len()).filter(|&i| i != captain).collect();
    let cpt = model.player(captain);
    combinations(&others, 5)
        .into_iter()
        .filter(|flex| {
            let salary = cpt.salary as f64 * 1.5
                + flex.iter().map(|&i| model.player(i).salary as f64).sum::<f64>();
            let mixed = flex.iter().any(|&i| model.player(i).team != cpt.team);
            salary <= 50_000.0 && mixed
        })
        .map(|flex| cpt.score * 1.5 + flex.iter().map(|&i| model.player(i).score).sum::<f64>())
        .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score))))
}

#[test]
fn test_showdown_matches_enumeration() {
    let pool = small_showdown_pool();
    let model = build(ContestFormat::Showdown, &pool, &OptimizationSettings::new(1));

    for captain in 0..model.players().len() {
        let expected = brute_force_showdown(&model, captain);
        for result in [
            solve_with(&model, LagrangianBounder::new(model.players()), Some(captain), &[]),
            solve_with(&model, TopScoreBounder, Some(captain), &[]),
        ] {
            match (result, expected) {
                (Ok(solved), Some(best)) => {
                    assert!(
                        (solved.lineup.total_score() - best).abs() < 1e-6,
                        "captain {captain}: {} != {best}",
                        solved.lineup.total_score()
                    );
                    assert_eq!(solved.captain, Some(captain));
                }
                (Err(OptimizerError::NoFeasibleLineup), None) => {}
                (other, expected) => panic!("captain {captain}: {other:?} vs {expected:?}"),
            }
        }
    }
}

#[test]
fn test_showdown_lineup_shape() {
    let pool = small_showdown_pool();
    let model = build(ContestFormat::Showdown, &pool, &OptimizationSettings::new(1));
    let solved = solve(&model, Some(0));
    let lineup = &solved.lineup;

    assert_eq!(lineup.len(), 6);
    assert_eq!(lineup.slots()[0].slot, "CPT");
    assert!(lineup.slots()[0].is_captain());
    assert_eq!(lineup.slots().iter().filter(|s| s.is_captain()).count(), 1);
    assert!(lineup.slots()[1..].iter().all(|s| s.slot == "FLEX"));
    assert!(lineup.total_salary() <= 50_000.0);
    assert_eq!(solved.players.len(), 6);
    assert!(solved.players.contains(&0));
}

#[test]
fn test_main_slate_lineup_fills_template() {
    let pool = main_slate_pool();
    let model = build(ContestFormat::MainSlate, &pool, &OptimizationSettings::new(1));
    let lineup = solve(&model, None).lineup;

    assert_eq!(lineup.len(), 9);
    assert!(lineup.total_salary() <= 50_000.0);
    assert!(lineup.captain().is_none());

    let labels: Vec<&str> = lineup.slots().iter().map(|s| s.slot.as_str()).collect();
    assert_eq!(
        labels,
        vec!["QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "DST"]
    );
    for slot in lineup.slots() {
        let ok = match slot.slot.as_str() {
            "FLEX" => matches!(slot.position, Position::RB | Position::WR | Position::TE),
            label => slot.position.as_str() == label,
        };
        assert!(ok, "{} in {}", slot.position, slot.slot);
    }

    let mut teams: Vec<&str> = lineup.slots().iter().map(|s| s.team.as_str()).collect();
    teams.sort_unstable();
    teams.dedup();
    assert!(teams.len() >= 2);
}

#[test]
fn test_single_position_slots_take_best_player() {
    let pool = main_slate_pool();
    let model = build(ContestFormat::MainSlate, &pool, &OptimizationSettings::new(1));
    let lineup = solve(&model, None).lineup;

    let best_unslotted = |position: Position| {
        lineup
            .slots()
            .iter()
            .filter(|s| s.position == position && s.slot != "FLEX")
            .map(|s| s.base_score)
            .fold(f64::INFINITY, f64::min)
    };
    if let Some(flex) = lineup.slots().iter().find(|s| s.slot == "FLEX") {
        assert!(flex.base_score <= best_unslotted(flex.position));
    }
}

#[test]
fn test_repeated_solves_are_identical() {
    let pool = main_slate_pool();
    let model = build(ContestFormat::MainSlate, &pool, &OptimizationSettings::new(1));
    let first = solve(&model, None);
    let second = solve(&model, None);
    assert_eq!(first.players, second.players);
    assert_eq!(first.lineup, second.lineup);
}

#[test]
fn test_exclusion_cut_yields_new_lineup() {
    let pool = small_showdown_pool();
    let model = build(ContestFormat::Showdown, &pool, &OptimizationSettings::new(2));
    let first = solve(&model, Some(0));

    let cut = LinearConstraint::at_most(
        "exclude:0",
        first.players.iter().map(|&i| (i, 1.0)),
        first.players.len() as f64 - 1.0,
    );
    let second = solve_with(
        &model,
        LagrangianBounder::new(model.players()),
        Some(0),
        std::slice::from_ref(&cut),
    )
    .unwrap();

    assert!(!first.lineup.same_players(&second.lineup));
    assert!(second.lineup.total_score() <= first.lineup.total_score() + 1e-9);
}

#[test]
fn test_locked_player_always_rostered() {
    let pool = main_slate_pool();
    let locked = pool
        .iter()
        .find(|p| p.position == Position::TE && p.salary < 4_000)
        .unwrap()
        .id
        .clone();
    let settings = OptimizationSettings::new(1).with_lock(locked.clone());
    let model = build(ContestFormat::MainSlate, &pool, &settings);

    let lineup = solve(&model, None).lineup;
    assert!(lineup.contains(&locked));
}

#[test]
fn test_stack_and_team_limit_hold() {
    let pool = main_slate_pool();
    let settings = OptimizationSettings::new(1)
        .with_stack(StackRule::qb_stack(2))
        .with_max_players_per_team(4);
    let model = build(ContestFormat::MainSlate, &pool, &settings);
    let lineup = solve(&model, None).lineup;

    let mut per_team: HashMap<&str, usize> = HashMap::new();
    for slot in lineup.slots() {
        *per_team.entry(slot.team.as_str()).or_default() += 1;
    }
    assert!(per_team.values().all(|&n| n <= 4));

    let qb = lineup
        .slots()
        .iter()
        .find(|s| s.position == Position::QB)
        .unwrap();
    let receivers = lineup
        .slots()
        .iter()
        .filter(|s| s.team == qb.team && matches!(s.position, Position::WR | Position::TE))
        .count();
    assert!(receivers >= 2);
}

#[test]
fn test_captain_required_for_showdown() {
    let pool = small_showdown_pool();
    let model = build(ContestFormat::Showdown, &pool, &OptimizationSettings::new(1));
    let err = solve_with(&model, TopScoreBounder, None, &[]).unwrap_err();
    assert!(matches!(err, OptimizerError::Internal(_)));
}

#[test]
fn test_node_limit_times_out() {
    let pool = main_slate_pool();
    let model = build(ContestFormat::MainSlate, &pool, &OptimizationSettings::new(1));
    let mut scope = SolveScope::new();
    scope.start_solving();

    let err = LineupSolver::new(&model, TopScoreBounder, NodeCountTermination::new(1))
        .with_check_interval(1)
        .solve(None, &[], &mut scope)
        .unwrap_err();
    assert!(matches!(err, OptimizerError::SolverTimeout { .. }));
}

#[test]
fn test_cancelled_before_start() {
    let pool = main_slate_pool();
    let model = build(ContestFormat::MainSlate, &pool, &OptimizationSettings::new(1));
    let flag = Arc::new(AtomicBool::new(false));
    let mut scope = SolveScope::new().with_terminate_flag(flag.clone());
    scope.start_solving();
    flag.store(true, Ordering::SeqCst);

    let err = LineupSolver::new(&model, TopScoreBounder, ExternalTermination)
        .solve(None, &[], &mut scope)
        .unwrap_err();
    assert!(matches!(err, OptimizerError::Cancelled));
}

#[test]
fn test_unreachable_cut_is_infeasible() {
    let pool = small_showdown_pool();
    let model = build(ContestFormat::Showdown, &pool, &OptimizationSettings::new(1));
    // at least seven of ten players: impossible with six slots
    let cut = LinearConstraint::at_least("impossible", (0..10).map(|i| (i, 1.0)), 7.0);
    let err = solve_with(&model, TopScoreBounder, Some(0), &[cut]).unwrap_err();
    assert!(matches!(err, OptimizerError::NoFeasibleLineup));
}
