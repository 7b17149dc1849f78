//! Policy configuration: presets, TOML file, environment overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::profile::PolicyProfile;
use crate::geometry::StepRadius;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "grid_forager.toml";
pub const DEFAULT_POLICY_OWNER: &str = "grid-forager";

pub const ENV_FORAGER_PROFILE: &str = "FORAGER_PROFILE";
pub const ENV_FORAGER_OWNER: &str = "FORAGER_OWNER";
pub const ENV_FORAGER_COLLECT_RADIUS: &str = "FORAGER_COLLECT_RADIUS";
pub const ENV_FORAGER_CROWDING_CAP: &str = "FORAGER_CROWDING_CAP";
pub const ENV_FORAGER_MAX_STEP_RADIUS: &str = "FORAGER_MAX_STEP_RADIUS";
pub const ENV_FORAGER_SPAWN_ENERGY_COST: &str = "FORAGER_SPAWN_ENERGY_COST";
pub const ENV_FORAGER_SPAWN_ENDOWMENT: &str = "FORAGER_SPAWN_ENDOWMENT";
pub const ENV_FORAGER_EARLY_GAME_ROUNDS: &str = "FORAGER_EARLY_GAME_ROUNDS";
pub const ENV_FORAGER_ROUND_BUDGET: &str = "FORAGER_ROUND_BUDGET";
pub const ENV_FORAGER_POPULATION_CAP: &str = "FORAGER_POPULATION_CAP";
pub const ENV_FORAGER_INITIAL_POPULATION: &str = "FORAGER_INITIAL_POPULATION";
pub const ENV_FORAGER_CONTESTED_ENERGY_PER_ROBOT: &str = "FORAGER_CONTESTED_ENERGY_PER_ROBOT";
pub const ENV_FORAGER_CLAIM_DEPLETED_STATIONS: &str = "FORAGER_CLAIM_DEPLETED_STATIONS";
pub const ENV_FORAGER_SPAWN_CROWDING_CHECK: &str = "FORAGER_SPAWN_CROWDING_CHECK";
pub const ENV_FORAGER_ROUND_SOURCE: &str = "FORAGER_ROUND_SOURCE";

// ============================================================================
// Round Source
// ============================================================================

/// Where the policy learns the current round from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundSource {
    /// Count decisions and roll over once every robot has acted.
    Inferred,
    /// Trust round numbers pushed by the host.
    Host,
}

impl RoundSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundSource::Inferred => "inferred",
            RoundSource::Host => "host",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "inferred" | "self" | "counted" => Some(RoundSource::Inferred),
            "host" | "pushed" | "notify" => Some(RoundSource::Host),
            _ => None,
        }
    }
}

// ============================================================================
// Policy Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Owner name this policy recognises as its own robots.
    pub owner: String,
    /// Chebyshev radius within which a robot can draw from a station.
    pub collect_radius: u32,
    /// Robots tolerated around a station before it counts as contested.
    pub crowding_cap: usize,
    /// Upper bound on the per-move radius handed to the planner.
    pub max_step_radius: StepRadius,
    /// Energy the host charges for creating a robot.
    pub spawn_energy_cost: i64,
    /// Energy handed to each new robot.
    pub spawn_endowment: i64,
    /// Last round (inclusive) that counts as early game.
    pub early_game_rounds: u32,
    /// Number of rounds in a game; arrivals past it are pointless.
    pub round_budget: u32,
    /// Population at which spawning stops.
    pub population_cap: u32,
    /// Robots this policy starts the game with.
    pub initial_population: u32,
    /// A contested station is still worth visiting with at least
    /// `crowding_cap * contested_energy_per_robot` energy.
    pub contested_energy_per_robot: i64,
    /// Early game: keep collecting at a depleted station while the own
    /// cluster around the robot stays below the crowding cap.
    pub claim_depleted_stations: bool,
    /// Refuse to spawn while the local station is crowded.
    pub spawn_crowding_check: bool,
    pub round_source: RoundSource,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::from_profile(PolicyProfile::default())
    }
}

impl PolicyConfig {
    pub fn from_profile(profile: PolicyProfile) -> Self {
        let max_step_radius = |cells| StepRadius::new(cells).unwrap_or(StepRadius::MIN);
        match profile {
            PolicyProfile::Classic => Self {
                owner: DEFAULT_POLICY_OWNER.to_string(),
                collect_radius: 2,
                crowding_cap: 5,
                max_step_radius: max_step_radius(7),
                spawn_energy_cost: 100,
                spawn_endowment: 100,
                early_game_rounds: 40,
                round_budget: 50,
                population_cap: 100,
                initial_population: 10,
                contested_energy_per_robot: 40,
                claim_depleted_stations: false,
                spawn_crowding_check: false,
                round_source: RoundSource::Host,
            },
            PolicyProfile::Tuned => Self {
                owner: DEFAULT_POLICY_OWNER.to_string(),
                collect_radius: 1,
                crowding_cap: 2,
                max_step_radius: max_step_radius(9),
                spawn_energy_cost: 100,
                spawn_endowment: 100,
                early_game_rounds: 45,
                round_budget: 50,
                population_cap: 100,
                initial_population: 10,
                contested_energy_per_robot: 40,
                claim_depleted_stations: true,
                spawn_crowding_check: false,
                round_source: RoundSource::Inferred,
            },
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Energy a robot must hold before it may spawn.
    pub fn spawn_threshold(&self) -> i64 {
        self.spawn_energy_cost.saturating_add(self.spawn_endowment)
    }

    /// Below this energy a crowded station is skipped while routing.
    pub fn contested_energy_floor(&self) -> i64 {
        (self.crowding_cap as i64).saturating_mul(self.contested_energy_per_robot)
    }

    pub fn is_early_game(&self, round: u32) -> bool {
        round <= self.early_game_rounds
    }

    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        let invalid = |reason: &str| {
            Err(PolicyConfigError::Invalid {
                reason: reason.to_string(),
            })
        };
        if self.owner.trim().is_empty() {
            return invalid("owner must not be empty");
        }
        if self.collect_radius == 0 {
            return invalid("collect_radius must be positive");
        }
        if self.crowding_cap == 0 {
            return invalid("crowding_cap must be positive");
        }
        if self.spawn_energy_cost < 0 || self.spawn_endowment < 0 {
            return invalid("spawn energy values must not be negative");
        }
        if self.contested_energy_per_robot < 0 {
            return invalid("contested_energy_per_robot must not be negative");
        }
        if self.round_budget == 0 {
            return invalid("round_budget must be positive");
        }
        if self.early_game_rounds > self.round_budget {
            return invalid("early_game_rounds must not exceed round_budget");
        }
        if self.population_cap == 0 {
            return invalid("population_cap must be positive");
        }
        if self.initial_population > self.population_cap {
            return invalid("initial_population must not exceed population_cap");
        }
        Ok(())
    }

    pub fn from_default_sources() -> Result<Self, PolicyConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::from_config_file(config_path);
        }
        Self::from_env()
    }

    pub fn from_config_file(path: &Path) -> Result<Self, PolicyConfigError> {
        let content = fs::read_to_string(path).map_err(|err| PolicyConfigError::ReadConfigFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            PolicyConfigError::ParseConfigFile { message, .. } => {
                PolicyConfigError::ParseConfigFile {
                    path: path.display().to_string(),
                    message,
                }
            }
            other => other,
        })
    }

    /// Keys are the `FORAGER_*` names; missing keys fall back to the process
    /// environment.
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyConfigError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|err| PolicyConfigError::ParseConfigFile {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        let table = value
            .as_table()
            .ok_or_else(|| PolicyConfigError::ParseConfigFile {
                path: "<inline>".to_string(),
                message: "root is not a TOML table".to_string(),
            })?;

        Self::from_env_with(|key| {
            table
                .get(key)
                .and_then(toml_value_to_string)
                .or_else(|| std::env::var(key).ok())
        })
    }

    pub fn from_env() -> Result<Self, PolicyConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(mut getter: F) -> Result<Self, PolicyConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let profile = match non_empty(&mut getter, ENV_FORAGER_PROFILE) {
            Some(value) => PolicyProfile::parse(&value)
                .ok_or(PolicyConfigError::UnknownProfile { value })?,
            None => PolicyProfile::default(),
        };
        let mut config = Self::from_profile(profile);

        if let Some(owner) = non_empty(&mut getter, ENV_FORAGER_OWNER) {
            config.owner = owner;
        }
        config.collect_radius =
            parse_or(&mut getter, ENV_FORAGER_COLLECT_RADIUS, config.collect_radius)?;
        config.crowding_cap =
            parse_or(&mut getter, ENV_FORAGER_CROWDING_CAP, config.crowding_cap)?;
        if let Some(value) = non_empty(&mut getter, ENV_FORAGER_MAX_STEP_RADIUS) {
            config.max_step_radius = value
                .parse::<u32>()
                .ok()
                .and_then(StepRadius::new)
                .ok_or(PolicyConfigError::InvalidValue {
                    key: ENV_FORAGER_MAX_STEP_RADIUS,
                    value,
                })?;
        }
        config.spawn_energy_cost = parse_or(
            &mut getter,
            ENV_FORAGER_SPAWN_ENERGY_COST,
            config.spawn_energy_cost,
        )?;
        config.spawn_endowment =
            parse_or(&mut getter, ENV_FORAGER_SPAWN_ENDOWMENT, config.spawn_endowment)?;
        config.early_game_rounds = parse_or(
            &mut getter,
            ENV_FORAGER_EARLY_GAME_ROUNDS,
            config.early_game_rounds,
        )?;
        config.round_budget = parse_or(&mut getter, ENV_FORAGER_ROUND_BUDGET, config.round_budget)?;
        config.population_cap =
            parse_or(&mut getter, ENV_FORAGER_POPULATION_CAP, config.population_cap)?;
        config.initial_population = parse_or(
            &mut getter,
            ENV_FORAGER_INITIAL_POPULATION,
            config.initial_population,
        )?;
        config.contested_energy_per_robot = parse_or(
            &mut getter,
            ENV_FORAGER_CONTESTED_ENERGY_PER_ROBOT,
            config.contested_energy_per_robot,
        )?;
        config.claim_depleted_stations = parse_or(
            &mut getter,
            ENV_FORAGER_CLAIM_DEPLETED_STATIONS,
            config.claim_depleted_stations,
        )?;
        config.spawn_crowding_check = parse_or(
            &mut getter,
            ENV_FORAGER_SPAWN_CROWDING_CHECK,
            config.spawn_crowding_check,
        )?;
        if let Some(value) = non_empty(&mut getter, ENV_FORAGER_ROUND_SOURCE) {
            config.round_source =
                RoundSource::parse(&value).ok_or(PolicyConfigError::InvalidValue {
                    key: ENV_FORAGER_ROUND_SOURCE,
                    value,
                })?;
        }

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyConfigError {
    #[error("read config file {path} failed: {message}")]
    ReadConfigFile { path: String, message: String },
    #[error("parse config file {path} failed: {message}")]
    ParseConfigFile { path: String, message: String },
    #[error("unknown policy profile: {value}")]
    UnknownProfile { value: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid policy config: {reason}")]
    Invalid { reason: String },
}

// ============================================================================
// Helpers
// ============================================================================

fn non_empty<F>(getter: &mut F, key: &str) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    getter(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<F, T>(getter: &mut F, key: &'static str, default: T) -> Result<T, PolicyConfigError>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(getter, key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| PolicyConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn toml_value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(value) => Some(value.clone()),
        toml::Value::Integer(value) => Some(value.to_string()),
        toml::Value::Float(value) => Some(value.to_string()),
        toml::Value::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}
