//! Showdown Batch Demo
//!
//! Generates a batch of captain-rotated Showdown lineups for a single
//! KC vs BUF game and prints each one.
//!
//! Usage: `showdown-batch [LINEUPS] [CONFIG.toml]`

use std::env;
use std::process::ExitCode;

use lineforge::prelude::*;
use lineforge_test::showdown_pool;

fn print_lineup(index: usize, lineup: &Lineup) {
    println!(
        "\nLineup {} (score {:.2}, salary ${:.2}):",
        index + 1,
        lineup.total_score(),
        lineup.total_salary()
    );
    for slot in lineup.slots() {
        println!(
            "  {:<4} {:<12} {:<4} {:<3} ${:>9.2} {:>7.2}",
            slot.slot,
            slot.name,
            slot.team,
            slot.position.as_str(),
            slot.effective_salary,
            slot.effective_score
        );
    }
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let count = args.next().and_then(|a| a.parse().ok()).unwrap_or(10);
    let config = match args.next() {
        Some(path) => match OptimizerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => OptimizerConfig::default(),
    };

    let players = showdown_pool();
    let settings = OptimizationSettings::new(count).with_min_unique_players(2);

    match generate_lineups_with_config(&players, ContestFormat::Showdown, &settings, &config) {
        Ok(result) => {
            for (i, lineup) in result.lineups.iter().enumerate() {
                print_lineup(i, lineup);
            }
            if let Some(reason) = &result.failure_reason {
                println!("\n{reason}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("optimization failed: {e}");
            ExitCode::FAILURE
        }
    }
}
