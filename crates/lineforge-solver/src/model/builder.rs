//! Constraint model builder.
//!
//! Translates [`OptimizationSettings`] into a [`ConstraintModel`]. Each rule
//! category (ownership, team limits, stacks, locks, exclusions) becomes either
//! a player-subset restriction or an independent linear inequality. Cheap
//! feasibility checks run before any solve so contradictory settings fail
//! fast with a [`ConstraintError`] naming the rule.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use lineforge_core::{
    ConstraintError, ContestFormat, OptimizationSettings, Player, PlayerId, Position,
    RosterTemplate, SlotKind, StackRule,
};
use tracing::{debug, trace};

use super::feasibility::CheapestRoster;
use super::{ConstraintModel, LinearConstraint};

/// Builds a validated [`ConstraintModel`] from a player pool and settings.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintModelBuilder<'a> {
    format: ContestFormat,
    settings: &'a OptimizationSettings,
}

impl<'a> ConstraintModelBuilder<'a> {
    pub fn new(format: ContestFormat, settings: &'a OptimizationSettings) -> Self {
        Self { format, settings }
    }

    pub fn build(&self, pool: &[Player]) -> Result<ConstraintModel, ConstraintError> {
        let settings = self.settings;
        settings.validate()?;
        self.check_format_rules()?;

        let roster = self.format.roster();
        let bounds = roster.standard_bounds();

        let mut known: HashSet<&PlayerId> = HashSet::with_capacity(pool.len());
        for player in pool {
            if !known.insert(&player.id) {
                return Err(ConstraintError::DuplicatePlayer(player.id.clone()));
            }
        }
        for id in settings.locked.iter().chain(settings.locked_captain.iter()) {
            if !known.contains(id) {
                return Err(ConstraintError::UnknownPlayer(id.clone()));
            }
        }
        for id in settings.excluded.iter().filter(|id| !known.contains(id)) {
            debug!(player = %id, "Excluded player is not in the pool");
        }

        let mut players: Vec<Player> = Vec::with_capacity(pool.len());
        for player in pool {
            if settings.excluded.contains(&player.id) {
                continue;
            }
            match self.ineligibility(player, &roster) {
                None => players.push(player.clone()),
                Some(reason) if self.is_locked(&player.id) => {
                    return Err(ConstraintError::LockedIneligible {
                        player: player.id.clone(),
                        reason,
                    });
                }
                Some(reason) => trace!(player = %player.id, %reason, "Player not eligible"),
            }
        }
        players.sort_by(canonical_order);

        let index: HashMap<PlayerId, usize> = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        let mut teams: Vec<String> = Vec::new();
        let mut team_lookup: HashMap<&str, usize> = HashMap::new();
        let mut team_of = Vec::with_capacity(players.len());
        for player in &players {
            let next = teams.len();
            let t = *team_lookup.entry(player.team.as_str()).or_insert(next);
            if t == next {
                teams.push(player.team.clone());
            }
            team_of.push(t);
        }

        let locked_captain = settings.locked_captain.as_ref().map(|id| index[id]);
        let mut locked: Vec<usize> = settings
            .locked
            .iter()
            .map(|id| index[id])
            .filter(|&i| Some(i) != locked_captain)
            .collect();
        locked.sort_unstable();

        let mut model = ConstraintModel {
            format: self.format,
            roster,
            bounds,
            salary_cap: settings.salary_cap,
            players,
            index,
            team_of,
            teams,
            locked,
            locked_captain,
            constraints: Vec::new(),
            lineup_count: settings.lineup_count,
            min_unique_players: settings.min_unique_players,
        };

        self.check_locks(&model)?;
        self.check_pool(&model)?;
        model.constraints = self.linear_constraints(&model)?;
        self.check_cheapest_roster(&model)?;

        debug!(
            format = %self.format,
            eligible = model.players.len(),
            teams = model.teams.len(),
            locked = model.locked.len() + usize::from(model.locked_captain.is_some()),
            constraints = model.constraints.len(),
            "Constraint model built"
        );
        Ok(model)
    }

    fn check_format_rules(&self) -> Result<(), ConstraintError> {
        let settings = self.settings;
        if !settings.stacks.is_empty() && !self.format.supports_stacking() {
            return Err(ConstraintError::StackingNotSupported);
        }
        if settings.locked_captain.is_some() && !self.format.has_captain() {
            return Err(ConstraintError::CaptainLockNotSupported);
        }
        if settings.min_unique_players > self.format.roster_size() {
            return Err(ConstraintError::InvalidSetting {
                name: "min_unique_players",
                reason: format!(
                    "{} exceeds the {}-player roster",
                    settings.min_unique_players,
                    self.format.roster_size()
                ),
            });
        }
        Ok(())
    }

    fn is_locked(&self, id: &PlayerId) -> bool {
        self.settings.locked.contains(id) || self.settings.locked_captain.as_ref() == Some(id)
    }

    fn ineligibility(&self, player: &Player, roster: &RosterTemplate) -> Option<String> {
        if player.salary == 0 {
            return Some("salary must be positive".to_string());
        }
        if !player.score.is_finite() {
            return Some("score is not a finite number".to_string());
        }
        if !roster.is_eligible(player.position) {
            return Some(format!("{} has no slot in {}", player.position, self.format));
        }
        if let (Some(ceiling), Some(ownership)) = (self.settings.max_ownership, player.ownership) {
            if ownership > ceiling {
                return Some(format!(
                    "projected ownership {ownership} exceeds ceiling {ceiling}"
                ));
            }
        }
        None
    }

    fn check_locks(&self, model: &ConstraintModel) -> Result<(), ConstraintError> {
        let roster_size = model.roster.len();
        let locked_total = model.locked.len() + usize::from(model.locked_captain.is_some());
        if locked_total > roster_size {
            return Err(ConstraintError::TooManyLocked {
                locked: locked_total,
                slots: roster_size,
            });
        }

        if !self.format.has_captain() {
            let mut counts = [0usize; Position::COUNT];
            for &i in &model.locked {
                let player = &model.players[i];
                counts[player.position.index()] += 1;
                let max = model.bounds.max(player.position);
                if counts[player.position.index()] > max {
                    return Err(ConstraintError::LockedIneligible {
                        player: player.id.clone(),
                        reason: format!("roster has room for at most {max} {}", player.position),
                    });
                }
            }
        }

        let mut half_units: u64 = model
            .locked
            .iter()
            .map(|&i| SlotKind::Standard.salary_half_units(model.players[i].salary))
            .sum();
        if let Some(c) = model.locked_captain {
            half_units += SlotKind::Captain.salary_half_units(model.players[c].salary);
        }
        if half_units > model.cap_half_units() {
            return Err(ConstraintError::LockedPlayersExceedCap {
                salary: half_units as f64 / 2.0,
                cap: model.salary_cap,
            });
        }

        if let Some(max) = self.settings.max_players_per_team {
            let mut per_team = vec![0usize; model.teams.len()];
            for i in model.locked.iter().copied().chain(model.locked_captain) {
                per_team[model.team_of[i]] += 1;
            }
            if let Some((t, &count)) = per_team.iter().enumerate().find(|(_, &c)| c > max) {
                return Err(ConstraintError::TeamLimitConflict {
                    team: model.teams[t].clone(),
                    reason: format!("{count} locked players exceed the limit of {max}"),
                });
            }
        }

        if let Some(cap) = self.settings.max_total_ownership {
            let locked_ownership: f64 = model
                .locked
                .iter()
                .copied()
                .chain(model.locked_captain)
                .map(|i| model.players[i].ownership_or_zero())
                .sum();
            if locked_ownership > cap {
                return Err(ConstraintError::InvalidSetting {
                    name: "max_total_ownership",
                    reason: format!("locked players alone project {locked_ownership} ownership"),
                });
            }
        }
        Ok(())
    }

    fn check_pool(&self, model: &ConstraintModel) -> Result<(), ConstraintError> {
        let roster_size = model.roster.len();
        if model.players.len() < roster_size {
            return Err(ConstraintError::InsufficientPool {
                required: roster_size,
                available: model.players.len(),
            });
        }

        for position in Position::ALL {
            let required = model.bounds.min(position);
            if required == 0 {
                continue;
            }
            let available = model
                .players
                .iter()
                .filter(|p| p.position == position)
                .count();
            if available < required {
                return Err(ConstraintError::InsufficientPlayers {
                    position,
                    required,
                    available,
                });
            }
        }

        let required_teams = self.format.min_distinct_teams();
        if model.teams.len() < required_teams {
            return Err(ConstraintError::InsufficientTeams {
                required: required_teams,
                available: model.teams.len(),
            });
        }

        if let Some(max) = self.settings.max_players_per_team {
            let capacity: usize = team_sizes(model).iter().map(|&size| size.min(max)).sum();
            if capacity < roster_size {
                return Err(ConstraintError::TeamLimitConflict {
                    team: "all teams".to_string(),
                    reason: format!(
                        "a limit of {max} per team leaves {capacity} rosterable players for {roster_size} slots"
                    ),
                });
            }
        }
        Ok(())
    }

    fn linear_constraints(
        &self,
        model: &ConstraintModel,
    ) -> Result<Vec<LinearConstraint>, ConstraintError> {
        let settings = self.settings;
        let mut constraints = Vec::new();

        if let Some(max) = settings.max_players_per_team {
            for (t, &size) in team_sizes(model).iter().enumerate() {
                if size > max {
                    constraints.push(LinearConstraint::at_most(
                        format!("team_limit:{}", model.teams[t]),
                        team_members(model, t).map(|i| (i, 1.0)),
                        max as f64,
                    ));
                }
            }
        }

        if let Some(cap) = settings.max_total_ownership {
            constraints.push(LinearConstraint::at_most(
                "total_ownership",
                model
                    .players
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i, p.ownership_or_zero())),
                cap,
            ));
        }

        for rule in &settings.stacks {
            match rule {
                StackRule::Pair {
                    primary,
                    secondary,
                    min_count,
                    team,
                } => {
                    let teams: Vec<usize> = match team {
                        Some(name) => vec![team_of_name(model, name)?],
                        None => (0..model.teams.len()).collect(),
                    };
                    for t in teams {
                        if let Some(c) =
                            self.pair_stack(model, t, *primary, secondary, *min_count)?
                        {
                            constraints.push(c);
                        }
                    }
                }
                StackRule::Team { team, min_players } => {
                    let t = team_of_name(model, team)?;
                    let size = team_members(model, t).count();
                    if size < *min_players {
                        return Err(ConstraintError::UnsatisfiableStack(format!(
                            "team {team} has {size} eligible players, {min_players} required"
                        )));
                    }
                    if let Some(max) = settings.max_players_per_team {
                        if *min_players > max {
                            return Err(ConstraintError::TeamLimitConflict {
                                team: team.clone(),
                                reason: format!(
                                    "stack of {min_players} exceeds the limit of {max} per team"
                                ),
                            });
                        }
                    }
                    constraints.push(LinearConstraint::at_least(
                        format!("team_stack:{team}"),
                        team_members(model, t).map(|i| (i, 1.0)),
                        *min_players as f64,
                    ));
                }
            }
        }
        Ok(constraints)
    }

    /// `sum(secondary) - k * sum(primary) >= 0` for one team.
    fn pair_stack(
        &self,
        model: &ConstraintModel,
        team: usize,
        primary: Position,
        secondary: &[Position],
        min_count: usize,
    ) -> Result<Option<LinearConstraint>, ConstraintError> {
        let mut terms: BTreeMap<usize, f64> = BTreeMap::new();
        let mut has_primary = false;
        let mut secondary_count = 0usize;
        for i in team_members(model, team) {
            let position = model.players[i].position;
            if position == primary {
                has_primary = true;
                *terms.entry(i).or_default() -= min_count as f64;
            }
            if secondary.contains(&position) {
                secondary_count += 1;
                *terms.entry(i).or_default() += 1.0;
            }
        }
        if !has_primary {
            return Ok(None);
        }

        let team_name = &model.teams[team];
        let locked_primary = model
            .locked
            .iter()
            .copied()
            .chain(model.locked_captain)
            .any(|i| model.team_of[i] == team && model.players[i].position == primary);
        if locked_primary && secondary_count < min_count {
            return Err(ConstraintError::UnsatisfiableStack(format!(
                "locked {primary} on {team_name} needs {min_count} teammates, {secondary_count} eligible"
            )));
        }

        Ok(Some(LinearConstraint::at_least(
            format!("stack:{primary}+{min_count}:{team_name}"),
            terms,
            0.0,
        )))
    }

    /// Cheapest legal roster must fit under the cap.
    ///
    /// Showdown captain pricing is checked by the captain selector, which
    /// reports `CaptainInfeasible` instead.
    fn check_cheapest_roster(&self, model: &ConstraintModel) -> Result<(), ConstraintError> {
        if self.format.has_captain() {
            return Ok(());
        }
        let cheapest = CheapestRoster::new(&model.players);
        match cheapest.half_units(&model.locked, None, &model.bounds) {
            Some(half_units) if half_units > model.cap_half_units() => {
                Err(ConstraintError::CheapestRosterExceedsCap {
                    salary: half_units as f64 / 2.0,
                    cap: model.salary_cap,
                })
            }
            Some(_) => Ok(()),
            None => Err(ConstraintError::InsufficientPool {
                required: model.roster.len(),
                available: model.players.len(),
            }),
        }
    }
}

/// Score descending, then salary ascending, then identity.
fn canonical_order(a: &Player, b: &Player) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.salary.cmp(&b.salary))
        .then_with(|| a.id.cmp(&b.id))
}

fn team_sizes(model: &ConstraintModel) -> Vec<usize> {
    let mut sizes = vec![0usize; model.teams.len()];
    for &t in &model.team_of {
        sizes[t] += 1;
    }
    sizes
}

fn team_members(model: &ConstraintModel, team: usize) -> impl Iterator<Item = usize> + '_ {
    model
        .team_of
        .iter()
        .enumerate()
        .filter(move |(_, &t)| t == team)
        .map(|(i, _)| i)
}

fn team_of_name(model: &ConstraintModel, name: &str) -> Result<usize, ConstraintError> {
    model
        .teams
        .iter()
        .position(|t| t == name)
        .ok_or_else(|| ConstraintError::UnsatisfiableStack(format!("team {name} has no eligible players")))
}
