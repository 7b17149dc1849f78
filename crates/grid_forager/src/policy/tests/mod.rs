//! Tests for the policy module.

use super::*;
use crate::geometry::{GridPos, GridSpace};
use crate::map::GridMap;
use crate::models::{EnergyStation, Robot, RobotCommand};

const RIVAL: &str = "rival";

fn pos(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

fn own_robot(x: i32, y: i32, energy: i64) -> Robot {
    Robot::new(pos(x, y), energy, DEFAULT_POLICY_OWNER)
}

fn rival_robot(x: i32, y: i32) -> Robot {
    Robot::new(pos(x, y), 100, RIVAL)
}

fn station(x: i32, y: i32, energy: i64) -> EnergyStation {
    EnergyStation::new(pos(x, y), energy, 10)
}

fn map_with(stations: Vec<EnergyStation>) -> GridMap {
    GridMap::new(GridSpace::default(), stations)
}

fn policy_at_round(profile: PolicyProfile, round: u32) -> ForagerPolicy {
    ForagerPolicy::with_state(
        PolicyConfig::from_profile(profile),
        PolicyState::starting_at_round(round),
    )
}

fn tuned() -> ForagerPolicy {
    ForagerPolicy::from_profile(PolicyProfile::Tuned)
}

fn classic() -> ForagerPolicy {
    ForagerPolicy::from_profile(PolicyProfile::Classic)
}

fn last_reason(policy: &mut ForagerPolicy) -> DecisionReason {
    policy
        .take_decision_trace()
        .expect("decision trace recorded")
        .reason
}

mod rounds;
