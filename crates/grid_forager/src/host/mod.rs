//! Reference tournament host that drives one behavior per owner.
//!
//! - `rules`: HostRules (costs, limits, round count)
//! - `scenario`: seeded station and roster placement
//! - `runner`: TournamentRunner, its log and metrics

mod rules;
mod runner;
mod scenario;

pub use rules::HostRules;
pub use runner::{
    CommandOutcome, CommandRejected, OwnerStanding, RoundReport, RunnerLogEntry, RunnerLogKind,
    RunnerMetrics, TournamentRunner,
};
pub use scenario::{build_scenario, Scenario, ScenarioConfig, ScenarioError};
