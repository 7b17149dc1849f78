//! Seeded placement of energy stations and starting rosters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use thiserror::Error;

use super::rules::HostRules;
use super::runner::TournamentRunner;
use crate::geometry::GridPos;
use crate::map::GridMap;
use crate::models::{EnergyStation, OwnerId, Robot};
use crate::policy::RobotBehavior;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub rules: HostRules,
    pub station_count: usize,
    pub station_energy_min: i64,
    pub station_energy_max: i64,
    pub recovery_rate_min: i64,
    pub recovery_rate_max: i64,
    pub robots_per_owner: usize,
    pub robot_energy: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            rules: HostRules::default(),
            station_count: 40,
            station_energy_min: 50,
            station_energy_max: 200,
            recovery_rate_min: 5,
            recovery_rate_max: 20,
            robots_per_owner: 10,
            robot_energy: 100,
        }
    }
}

impl ScenarioConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn checked_range(
        field: &'static str,
        min: i64,
        max: i64,
    ) -> Result<RangeInclusive<i64>, ScenarioError> {
        if min < 0 || min > max {
            return Err(ScenarioError::InvalidRange { field, min, max });
        }
        Ok(min..=max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario needs at least one owner")]
    NoOwners,
    #[error("duplicate owner {owner}")]
    DuplicateOwner { owner: OwnerId },
    #[error("grid of {cells} cells cannot hold {required} distinct placements")]
    GridTooSmall { cells: u64, required: u64 },
    #[error("invalid {field} range {min}..={max}")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

/// A seeded starting position: the map and every owner's robots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    pub rules: HostRules,
    pub map: GridMap,
    pub robots: Vec<Robot>,
}

impl Scenario {
    pub fn into_runner<B: RobotBehavior>(self) -> TournamentRunner<B> {
        TournamentRunner::new(self.rules, self.map, self.robots)
    }
}

/// Places stations and robots on distinct cells. The same config and owners
/// always produce the same scenario.
pub fn build_scenario(
    config: &ScenarioConfig,
    owners: &[OwnerId],
) -> Result<Scenario, ScenarioError> {
    if owners.is_empty() {
        return Err(ScenarioError::NoOwners);
    }
    let mut seen = BTreeSet::new();
    for owner in owners {
        if !seen.insert(owner.as_str()) {
            return Err(ScenarioError::DuplicateOwner {
                owner: owner.clone(),
            });
        }
    }

    let energy_range = ScenarioConfig::checked_range(
        "station_energy",
        config.station_energy_min,
        config.station_energy_max,
    )?;
    let recovery_range = ScenarioConfig::checked_range(
        "recovery_rate",
        config.recovery_rate_min,
        config.recovery_rate_max,
    )?;

    let space = config.rules.space();
    let size = space.size();
    let cells = u64::from(size.unsigned_abs()).pow(2);
    let required = (config.station_count + config.robots_per_owner * owners.len()) as u64;
    if required > cells {
        return Err(ScenarioError::GridTooSmall { cells, required });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut occupied = BTreeSet::new();
    let mut free_cell = |rng: &mut StdRng| loop {
        let cell = GridPos::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if occupied.insert(cell) {
            break cell;
        }
    };

    let stations: Vec<EnergyStation> = (0..config.station_count)
        .map(|_| {
            let position = free_cell(&mut rng);
            EnergyStation::new(
                position,
                rng.gen_range(energy_range.clone()),
                rng.gen_range(recovery_range.clone()),
            )
        })
        .collect();

    let mut robots = Vec::with_capacity(config.robots_per_owner * owners.len());
    for owner in owners {
        for _ in 0..config.robots_per_owner {
            let position = free_cell(&mut rng);
            robots.push(Robot::new(position, config.robot_energy, owner.clone()));
        }
    }

    Ok(Scenario {
        seed: config.seed,
        rules: config.rules.clone(),
        map: GridMap::new(space, stations),
        robots,
    })
}
