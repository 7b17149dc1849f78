//! ForagerPolicy: collect / spawn / move selection for one owner.

use tracing::{debug, info, trace, warn};

use super::behavior::{DecisionReason, DecisionTrace, RobotBehavior};
use super::config::{PolicyConfig, RoundSource};
use super::error::{PolicyError, RouteRejection};
use super::profile::PolicyProfile;
use super::state::PolicyState;
use crate::geometry::GridPos;
use crate::map::MapView;
use crate::models::{EnergyStation, Robot, RobotCommand};
use crate::planner::{plan_move, MoveParams, MovePlan};

/// Outcome of a successful routing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedRoute {
    pub station: GridPos,
    /// Free cell next to the station the robot is heading for.
    pub target: GridPos,
    pub params: MoveParams,
    /// Where the robot ends up after this call's single step.
    pub next_position: GridPos,
}

#[derive(Debug, Clone)]
pub struct ForagerPolicy {
    config: PolicyConfig,
    state: PolicyState,
    pending_trace: Option<DecisionTrace>,
}

impl ForagerPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self::with_state(config, PolicyState::new())
    }

    pub fn from_profile(profile: PolicyProfile) -> Self {
        Self::new(PolicyConfig::from_profile(profile))
    }

    pub fn with_state(config: PolicyConfig, state: PolicyState) -> Self {
        Self {
            config,
            state,
            pending_trace: None,
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }

    pub fn round(&self) -> u32 {
        self.state.round()
    }

    /// Robots this policy believes it controls.
    pub fn population(&self) -> u32 {
        self.state.population(self.config.initial_population)
    }

    /// Decides one command, reporting an out-of-range index as an error.
    pub fn try_decide(
        &mut self,
        robots: &[Robot],
        robot_index: usize,
        map: &dyn MapView,
    ) -> Result<RobotCommand, PolicyError> {
        let Some(robot) = robots.get(robot_index) else {
            return Err(PolicyError::RobotIndexOutOfRange {
                index: robot_index,
                len: robots.len(),
            });
        };
        let round = self.state.round();

        let (command, reason) = if self.can_collect_energy(robot, robots, map) {
            if self.can_spawn(robot, robots, map) {
                self.state.record_spawn();
                if self.config.round_source == RoundSource::Inferred {
                    self.state.rounds_mut().credit_newcomer();
                }
                info!(
                    round,
                    robot_index,
                    spawned = self.state.spawned(),
                    "spawning robot"
                );
                (
                    RobotCommand::Spawn {
                        endowment: self.config.spawn_endowment,
                    },
                    DecisionReason::SpawnEligible,
                )
            } else {
                (RobotCommand::Collect, DecisionReason::CollectInRange)
            }
        } else {
            match self.plan_route_to_station(robot, robots, map) {
                Ok(route) => (
                    RobotCommand::Move {
                        to: route.next_position,
                    },
                    DecisionReason::RouteFound {
                        station: route.station,
                        target: route.target,
                        params: route.params,
                    },
                ),
                Err(rejection) => {
                    debug!(round, robot_index, %rejection, "no viable destination, collecting");
                    (RobotCommand::Collect, DecisionReason::Fallback { rejection })
                }
            }
        };

        debug!(round, robot_index, command = command.label(), "decided");
        self.pending_trace = Some(DecisionTrace {
            robot_index,
            round,
            command,
            reason,
        });
        self.count_decision();
        Ok(command)
    }

    fn count_decision(&mut self) {
        if self.config.round_source != RoundSource::Inferred {
            return;
        }
        let population = self.population();
        if self.state.rounds_mut().advance_if_complete(population) {
            info!(round = self.state.round(), population, "round advanced");
        }
    }

    /// Whether the robot should stay and collect this call.
    ///
    /// Early game wants a charged station in range, or, when claiming is
    /// enabled, an own cluster still below the crowding cap. Later any
    /// station in range will do.
    pub fn can_collect_energy(&self, robot: &Robot, robots: &[Robot], map: &dyn MapView) -> bool {
        let nearby = map.nearby_stations(robot.position, self.config.collect_radius);
        if nearby.is_empty() {
            return false;
        }
        if !self.config.is_early_game(self.state.round()) {
            return true;
        }
        if nearby.iter().any(|station| station.has_energy()) {
            return true;
        }
        self.config.claim_depleted_stations
            && self.own_cluster_size(robot.position, robots, map) < self.config.crowding_cap
    }

    /// Only consulted once collection is allowed.
    pub fn can_spawn(&self, robot: &Robot, robots: &[Robot], map: &dyn MapView) -> bool {
        if !self.config.is_early_game(self.state.round())
            || self.population() >= self.config.population_cap
        {
            return false;
        }
        if robot.energy < self.config.spawn_threshold() {
            return false;
        }
        if self.config.spawn_crowding_check {
            let nearby = map.nearby_stations(robot.position, self.config.collect_radius);
            if let Some(station) = nearby.first() {
                if self.crowd_around(station.position, robots, map) > self.config.crowding_cap {
                    return false;
                }
            }
        }
        true
    }

    /// Walks stations nearest first and plans toward the first acceptable one.
    pub fn plan_route_to_station(
        &self,
        robot: &Robot,
        robots: &[Robot],
        map: &dyn MapView,
    ) -> Result<PlannedRoute, RouteRejection> {
        let space = map.space();
        let stations = map.stations();
        if stations.is_empty() {
            return Err(RouteRejection::NoStations);
        }

        let mut ranked: Vec<&EnergyStation> = stations.iter().collect();
        ranked.sort_by_key(|station| space.distance_squared(station.position, robot.position));

        let mut missing_free_cell = false;
        for station in ranked {
            if self.is_skippable(station, robots, map) {
                trace!(station = ?station.position, energy = station.energy, "skipping station");
                continue;
            }
            let Some(target) = map.find_free_cell(station.position, robots) else {
                trace!(station = ?station.position, "no free cell near station");
                missing_free_cell = true;
                continue;
            };

            let plan = plan_move(
                &space,
                robot.position,
                target,
                robot.energy,
                self.config.max_step_radius.get(),
            );
            let MovePlan::Feasible(params) = plan else {
                return Err(RouteRejection::Infeasible {
                    station: station.position,
                    energy: robot.energy,
                });
            };

            let arrival_round = u64::from(self.state.round()) + u64::from(params.steps_needed);
            if arrival_round > u64::from(self.config.round_budget) {
                return Err(RouteRejection::BeyondRoundBudget {
                    station: station.position,
                    arrival_round,
                    round_budget: self.config.round_budget,
                });
            }

            return Ok(PlannedRoute {
                station: station.position,
                target,
                params,
                next_position: space.advance_toward(robot.position, target, params.radius),
            });
        }

        if missing_free_cell {
            Err(RouteRejection::NoFreeCell)
        } else {
            Err(RouteRejection::AllCandidatesSkipped)
        }
    }

    fn is_skippable(&self, station: &EnergyStation, robots: &[Robot], map: &dyn MapView) -> bool {
        if !station.has_energy() {
            return true;
        }
        self.crowd_around(station.position, robots, map) > self.config.crowding_cap
            && station.energy < self.config.contested_energy_floor()
    }

    /// Robots of any owner within collection range of `center`.
    fn crowd_around(&self, center: GridPos, robots: &[Robot], map: &dyn MapView) -> usize {
        let space = map.space();
        robots
            .iter()
            .filter(|robot| space.within_radius(center, robot.position, self.config.collect_radius))
            .count()
    }

    /// Own robots within collection range of `center`, the acting one included.
    fn own_cluster_size(&self, center: GridPos, robots: &[Robot], map: &dyn MapView) -> usize {
        let space = map.space();
        robots
            .iter()
            .filter(|robot| robot.is_owned_by(&self.config.owner))
            .filter(|robot| space.within_radius(center, robot.position, self.config.collect_radius))
            .count()
    }
}

impl RobotBehavior for ForagerPolicy {
    fn owner(&self) -> &str {
        self.config.owner.as_str()
    }

    fn decide(&mut self, robots: &[Robot], robot_index: usize, map: &dyn MapView) -> RobotCommand {
        match self.try_decide(robots, robot_index, map) {
            Ok(command) => command,
            Err(error) => {
                warn!(%error, "invalid decision request, collecting");
                let command = RobotCommand::Collect;
                self.pending_trace = Some(DecisionTrace {
                    robot_index,
                    round: self.state.round(),
                    command,
                    reason: DecisionReason::InvalidInput { error },
                });
                command
            }
        }
    }

    fn on_round_started(&mut self, round: u32) {
        if self.config.round_source != RoundSource::Host {
            debug!(round, "host round ignored, rounds are inferred");
            return;
        }
        if self.state.rounds_mut().observe_round(round) {
            info!(round, "round advanced by host");
        }
    }

    fn take_decision_trace(&mut self) -> Option<DecisionTrace> {
        self.pending_trace.take()
    }
}
