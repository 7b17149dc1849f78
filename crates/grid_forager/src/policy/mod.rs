//! Decision policy module - the per-call collect / spawn / move automaton.
//!
//! This module is organized into submodules:
//! - `behavior`: RobotBehavior trait and decision traces
//! - `config`: PolicyConfig, environment and TOML loading
//! - `profile`: named presets for the observed tunings
//! - `rounds`: RoundTracker (self-inferred or host-pushed rounds)
//! - `state`: PolicyState owned by one policy instance
//! - `decision`: ForagerPolicy itself

mod behavior;
mod config;
mod decision;
mod error;
mod profile;
mod rounds;
mod state;

#[cfg(test)]
mod tests;

pub use behavior::{DecisionReason, DecisionTrace, RobotBehavior};
pub use config::{
    PolicyConfig, PolicyConfigError, RoundSource, DEFAULT_CONFIG_FILE_NAME, DEFAULT_POLICY_OWNER,
    ENV_FORAGER_CLAIM_DEPLETED_STATIONS, ENV_FORAGER_COLLECT_RADIUS,
    ENV_FORAGER_CONTESTED_ENERGY_PER_ROBOT, ENV_FORAGER_CROWDING_CAP,
    ENV_FORAGER_EARLY_GAME_ROUNDS, ENV_FORAGER_INITIAL_POPULATION, ENV_FORAGER_MAX_STEP_RADIUS,
    ENV_FORAGER_OWNER, ENV_FORAGER_POPULATION_CAP, ENV_FORAGER_PROFILE, ENV_FORAGER_ROUND_BUDGET,
    ENV_FORAGER_ROUND_SOURCE, ENV_FORAGER_SPAWN_CROWDING_CHECK, ENV_FORAGER_SPAWN_ENDOWMENT,
    ENV_FORAGER_SPAWN_ENERGY_COST,
};
pub use decision::{ForagerPolicy, PlannedRoute};
pub use error::{PolicyError, RouteRejection};
pub use profile::PolicyProfile;
pub use rounds::RoundTracker;
pub use state::PolicyState;
