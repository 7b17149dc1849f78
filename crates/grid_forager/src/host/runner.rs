//! TournamentRunner: round loop, command application, log and metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::rules::HostRules;
use crate::geometry::GridPos;
use crate::map::{GridMap, MapView};
use crate::models::{OwnerId, Robot, RobotCommand};
use crate::policy::{DecisionTrace, RobotBehavior};

// ============================================================================
// Command Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    Collected {
        amount: i64,
    },
    Spawned {
        position: GridPos,
        endowment: i64,
        cost: i64,
    },
    Moved {
        from: GridPos,
        to: GridPos,
        cost: i64,
    },
}

impl CommandOutcome {
    fn energy_spent(&self) -> i64 {
        match self {
            CommandOutcome::Collected { .. } => 0,
            CommandOutcome::Spawned { cost, .. } | CommandOutcome::Moved { cost, .. } => *cost,
        }
    }
}

/// A command the host refused to apply. The robot is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CommandRejected {
    #[error("robot {robot_index} is not on the roster")]
    UnknownRobot { robot_index: usize },
    #[error("command needs {required} energy, robot has {available}")]
    InsufficientEnergy { required: i64, available: i64 },
    #[error("spawn endowment {endowment} is negative")]
    NegativeEndowment { endowment: i64 },
    #[error("no free cell near {near:?} for a newcomer")]
    NoFreeCell { near: GridPos },
    #[error("destination {to:?} is outside the grid")]
    OutOfBounds { to: GridPos },
}

// ============================================================================
// Log and Metrics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerLogEntry {
    /// Round the event happened in.
    pub round: u32,
    pub kind: RunnerLogKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RunnerLogKind {
    OwnerRegistered {
        owner: OwnerId,
    },
    /// No behavior is registered for the robot's owner.
    RobotSkipped {
        robot_index: usize,
        owner: OwnerId,
    },
    RobotDecided {
        owner: OwnerId,
        robot_index: usize,
        command: RobotCommand,
        trace: Option<DecisionTrace>,
    },
    CommandApplied {
        owner: OwnerId,
        robot_index: usize,
        outcome: CommandOutcome,
    },
    CommandRejected {
        owner: OwnerId,
        robot_index: usize,
        command: RobotCommand,
        rejection: CommandRejected,
    },
    RoundCompleted {
        report: RoundReport,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub decisions: usize,
    pub applied: usize,
    pub rejected: usize,
    pub spawned: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerMetrics {
    pub rounds_played: u32,
    pub total_decisions: u64,
    pub collects: u64,
    pub moves: u64,
    pub spawns: u64,
    pub rejected: u64,
    pub skipped_robots: u64,
    pub energy_collected: i64,
    pub energy_spent: i64,
}

impl RunnerMetrics {
    /// Share of decisions the host refused (0.0 to 1.0).
    pub fn rejection_rate(&self) -> f64 {
        if self.total_decisions == 0 {
            return 0.0;
        }
        self.rejected as f64 / self.total_decisions as f64
    }

    fn record_outcome(&mut self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Collected { amount } => {
                self.collects += 1;
                self.energy_collected += amount;
            }
            CommandOutcome::Spawned { .. } => self.spawns += 1,
            CommandOutcome::Moved { .. } => self.moves += 1,
        }
        self.energy_spent += outcome.energy_spent();
    }
}

/// Per-owner totals at a point in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerStanding {
    pub owner: OwnerId,
    pub robots: usize,
    pub energy: i64,
}

// ============================================================================
// Tournament Runner
// ============================================================================

/// Drives one behavior per owner over a shared map, one round at a time.
///
/// Each round every robot present when the round starts is asked for one
/// command, in roster order, and the command is applied before the next
/// robot decides. Robots spawned during a round act from the next one.
pub struct TournamentRunner<B: RobotBehavior> {
    rules: HostRules,
    map: GridMap,
    robots: Vec<Robot>,
    behaviors: BTreeMap<OwnerId, B>,
    round: u32,
    log: Vec<RunnerLogEntry>,
    metrics: RunnerMetrics,
}

impl<B: RobotBehavior> TournamentRunner<B> {
    pub fn new(rules: HostRules, map: GridMap, robots: Vec<Robot>) -> Self {
        Self {
            rules,
            map,
            robots,
            behaviors: BTreeMap::new(),
            round: 0,
            log: Vec::new(),
            metrics: RunnerMetrics::default(),
        }
    }

    /// Registers a behavior under its owner, returning any it replaces.
    pub fn register(&mut self, behavior: B) -> Option<B> {
        let owner = behavior.owner().to_string();
        self.push_log(RunnerLogKind::OwnerRegistered {
            owner: owner.clone(),
        });
        self.behaviors.insert(owner, behavior)
    }

    pub fn behavior(&self, owner: &str) -> Option<&B> {
        self.behaviors.get(owner)
    }

    pub fn owners(&self) -> Vec<OwnerId> {
        self.behaviors.keys().cloned().collect()
    }

    pub fn rules(&self) -> &HostRules {
        &self.rules
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Next round to be played.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.round >= self.rules.max_rounds
    }

    pub fn metrics(&self) -> &RunnerMetrics {
        &self.metrics
    }

    pub fn log(&self) -> &[RunnerLogEntry] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<RunnerLogEntry> {
        std::mem::take(&mut self.log)
    }

    /// Plays rounds until `max_rounds` is reached.
    pub fn run(&mut self) -> RunnerMetrics {
        while !self.is_finished() {
            self.play_round();
        }
        self.metrics.clone()
    }

    pub fn play_round(&mut self) -> RoundReport {
        let round = self.round;
        for behavior in self.behaviors.values_mut() {
            behavior.on_round_started(round);
        }

        let mut report = RoundReport {
            round,
            ..RoundReport::default()
        };
        let acting = self.robots.len();
        for robot_index in 0..acting {
            let owner = self.robots[robot_index].owner.clone();
            let Some(behavior) = self.behaviors.get_mut(&owner) else {
                self.metrics.skipped_robots += 1;
                self.push_log(RunnerLogKind::RobotSkipped { robot_index, owner });
                continue;
            };
            let command = behavior.decide(&self.robots, robot_index, &self.map);
            let trace = behavior.take_decision_trace();

            report.decisions += 1;
            self.metrics.total_decisions += 1;
            self.push_log(RunnerLogKind::RobotDecided {
                owner: owner.clone(),
                robot_index,
                command,
                trace,
            });

            match self.apply_command(robot_index, command) {
                Ok(outcome) => {
                    debug!(round, robot_index, %owner, ?outcome, "command applied");
                    report.applied += 1;
                    if matches!(outcome, CommandOutcome::Spawned { .. }) {
                        report.spawned += 1;
                    }
                    self.metrics.record_outcome(&outcome);
                    self.push_log(RunnerLogKind::CommandApplied {
                        owner,
                        robot_index,
                        outcome,
                    });
                }
                Err(rejection) => {
                    warn!(round, robot_index, %owner, %rejection, "command rejected");
                    report.rejected += 1;
                    self.metrics.rejected += 1;
                    self.push_log(RunnerLogKind::CommandRejected {
                        owner,
                        robot_index,
                        command,
                        rejection,
                    });
                }
            }
        }

        self.recover_stations();
        self.metrics.rounds_played += 1;
        info!(
            round,
            decisions = report.decisions,
            rejected = report.rejected,
            robots = self.robots.len(),
            "round completed"
        );
        self.push_log(RunnerLogKind::RoundCompleted { report });
        self.round += 1;
        report
    }

    /// Robot count and energy per owner, registered owners included.
    pub fn standings(&self) -> Vec<OwnerStanding> {
        let mut standings: BTreeMap<&str, OwnerStanding> = self
            .behaviors
            .keys()
            .map(|owner| {
                (
                    owner.as_str(),
                    OwnerStanding {
                        owner: owner.clone(),
                        robots: 0,
                        energy: 0,
                    },
                )
            })
            .collect();
        for robot in &self.robots {
            let standing = standings
                .entry(robot.owner.as_str())
                .or_insert_with(|| OwnerStanding {
                    owner: robot.owner.clone(),
                    robots: 0,
                    energy: 0,
                });
            standing.robots += 1;
            standing.energy += robot.energy;
        }
        standings.into_values().collect()
    }

    fn apply_command(
        &mut self,
        robot_index: usize,
        command: RobotCommand,
    ) -> Result<CommandOutcome, CommandRejected> {
        match command {
            RobotCommand::Collect => self.collect(robot_index),
            RobotCommand::Spawn { endowment } => self.spawn(robot_index, endowment),
            RobotCommand::Move { to } => self.move_robot(robot_index, to),
        }
    }

    fn collect(&mut self, robot_index: usize) -> Result<CommandOutcome, CommandRejected> {
        let space = self.rules.space();
        let radius = self.rules.collect_radius;
        let limit = self.rules.station_collect_limit;
        let robot = self
            .robots
            .get_mut(robot_index)
            .ok_or(CommandRejected::UnknownRobot { robot_index })?;

        let mut amount = 0;
        for station in self.map.stations_mut() {
            if !space.within_radius(robot.position, station.position, radius) {
                continue;
            }
            let taken = station.energy.clamp(0, limit);
            station.energy -= taken;
            amount += taken;
        }
        robot.energy += amount;
        Ok(CommandOutcome::Collected { amount })
    }

    fn spawn(
        &mut self,
        robot_index: usize,
        endowment: i64,
    ) -> Result<CommandOutcome, CommandRejected> {
        if endowment < 0 {
            return Err(CommandRejected::NegativeEndowment { endowment });
        }
        let parent = self
            .robots
            .get(robot_index)
            .ok_or(CommandRejected::UnknownRobot { robot_index })?;
        let cost = self.rules.spawn_cost(endowment);
        if parent.energy < cost {
            return Err(CommandRejected::InsufficientEnergy {
                required: cost,
                available: parent.energy,
            });
        }
        let near = parent.position;
        let owner = parent.owner.clone();
        let position = self
            .map
            .find_free_cell(near, &self.robots)
            .ok_or(CommandRejected::NoFreeCell { near })?;

        if let Some(parent) = self.robots.get_mut(robot_index) {
            parent.energy -= cost;
        }
        self.robots.push(Robot::new(position, endowment, owner));
        info!(round = self.round, robot_index, ?position, "robot spawned");
        Ok(CommandOutcome::Spawned {
            position,
            endowment,
            cost,
        })
    }

    fn move_robot(
        &mut self,
        robot_index: usize,
        to: GridPos,
    ) -> Result<CommandOutcome, CommandRejected> {
        if !self.rules.space().contains(to) {
            return Err(CommandRejected::OutOfBounds { to });
        }
        let robot = self
            .robots
            .get_mut(robot_index)
            .ok_or(CommandRejected::UnknownRobot { robot_index })?;
        let from = robot.position;
        let cost = self.rules.move_cost(from, to);
        if robot.energy < cost {
            return Err(CommandRejected::InsufficientEnergy {
                required: cost,
                available: robot.energy,
            });
        }
        robot.energy -= cost;
        robot.position = to;
        Ok(CommandOutcome::Moved { from, to, cost })
    }

    fn recover_stations(&mut self) {
        let cap = self.rules.station_energy_cap;
        for station in self.map.stations_mut() {
            if station.energy >= cap {
                continue;
            }
            station.energy = station
                .energy
                .saturating_add(station.recovery_rate.max(0))
                .min(cap);
        }
    }

    fn push_log(&mut self, kind: RunnerLogKind) {
        self.log.push(RunnerLogEntry {
            round: self.round,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridSpace;
    use crate::models::EnergyStation;
    use crate::policy::{ForagerPolicy, PolicyProfile, DEFAULT_POLICY_OWNER};
    use std::collections::VecDeque;

    struct Scripted {
        owner: String,
        commands: VecDeque<RobotCommand>,
        calls: Vec<usize>,
        rounds_seen: Vec<u32>,
    }

    impl Scripted {
        fn new(owner: &str, commands: Vec<RobotCommand>) -> Self {
            Self {
                owner: owner.to_string(),
                commands: commands.into(),
                calls: Vec::new(),
                rounds_seen: Vec::new(),
            }
        }
    }

    impl RobotBehavior for Scripted {
        fn owner(&self) -> &str {
            &self.owner
        }

        fn decide(
            &mut self,
            _robots: &[Robot],
            robot_index: usize,
            _map: &dyn MapView,
        ) -> RobotCommand {
            self.calls.push(robot_index);
            self.commands.pop_front().unwrap_or(RobotCommand::Collect)
        }

        fn on_round_started(&mut self, round: u32) {
            self.rounds_seen.push(round);
        }
    }

    fn pos(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y)
    }

    fn runner_with(
        stations: Vec<EnergyStation>,
        robots: Vec<Robot>,
        script: Vec<RobotCommand>,
    ) -> TournamentRunner<Scripted> {
        let map = GridMap::new(GridSpace::default(), stations);
        let mut runner = TournamentRunner::new(HostRules::default(), map, robots);
        runner.register(Scripted::new("a", script));
        runner
    }

    #[test]
    fn collect_draws_limited_energy_from_each_station_in_range() {
        let stations = vec![
            EnergyStation::new(pos(0, 0), 100, 0),
            EnergyStation::new(pos(2, 2), 30, 0),
            EnergyStation::new(pos(5, 5), 100, 0),
        ];
        let robots = vec![Robot::new(pos(1, 1), 0, "a")];
        let mut runner = runner_with(stations, robots, vec![RobotCommand::Collect]);

        let report = runner.play_round();
        assert_eq!(report.applied, 1);
        assert_eq!(runner.robots()[0].energy, 70);
        let energies: Vec<i64> = runner.map().stations().iter().map(|s| s.energy).collect();
        assert_eq!(energies, vec![60, 0, 100]);
        assert_eq!(runner.metrics().energy_collected, 70);
    }

    #[test]
    fn spawned_robot_waits_for_next_round() {
        let robots = vec![Robot::new(pos(10, 10), 250, "a")];
        let mut runner = runner_with(
            Vec::new(),
            robots,
            vec![RobotCommand::Spawn { endowment: 100 }],
        );

        let report = runner.play_round();
        assert_eq!(report.spawned, 1);
        assert_eq!(runner.robots().len(), 2);
        assert_eq!(runner.robots()[0].energy, 50);
        assert_eq!(runner.robots()[1], Robot::new(pos(9, 9), 100, "a"));
        assert_eq!(runner.behavior("a").expect("registered").calls, vec![0]);

        runner.play_round();
        assert_eq!(runner.behavior("a").expect("registered").calls, vec![0, 0, 1]);
    }

    #[test]
    fn unaffordable_commands_leave_robot_untouched() {
        let robots = vec![Robot::new(pos(0, 0), 10, "a")];
        let mut runner = runner_with(
            Vec::new(),
            robots,
            vec![
                RobotCommand::Move { to: pos(10, 0) },
                RobotCommand::Spawn { endowment: 100 },
            ],
        );

        runner.play_round();
        runner.play_round();
        assert_eq!(runner.robots()[0], Robot::new(pos(0, 0), 10, "a"));
        assert_eq!(runner.metrics().rejected, 2);
        assert!(runner.log().iter().any(|entry| matches!(
            entry.kind,
            RunnerLogKind::CommandRejected {
                rejection: CommandRejected::InsufficientEnergy {
                    required: 100,
                    available: 10
                },
                ..
            }
        )));
    }

    #[test]
    fn move_wraps_and_pays_squared_distance() {
        let robots = vec![Robot::new(pos(0, 0), 10, "a")];
        let mut runner = runner_with(
            Vec::new(),
            robots,
            vec![RobotCommand::Move { to: pos(98, 0) }],
        );

        runner.play_round();
        assert_eq!(runner.robots()[0], Robot::new(pos(98, 0), 6, "a"));
        assert_eq!(runner.metrics().energy_spent, 4);
    }

    #[test]
    fn move_outside_grid_is_rejected() {
        let robots = vec![Robot::new(pos(0, 0), 1_000, "a")];
        let mut runner = runner_with(
            Vec::new(),
            robots,
            vec![RobotCommand::Move { to: pos(100, 0) }],
        );

        let report = runner.play_round();
        assert_eq!(report.rejected, 1);
        assert_eq!(runner.robots()[0].position, pos(0, 0));
    }

    #[test]
    fn negative_endowment_is_rejected() {
        let robots = vec![Robot::new(pos(0, 0), 1_000, "a")];
        let mut runner = runner_with(
            Vec::new(),
            robots,
            vec![RobotCommand::Spawn { endowment: -50 }],
        );

        runner.play_round();
        assert_eq!(runner.robots().len(), 1);
        assert_eq!(runner.metrics().rejected, 1);
    }

    #[test]
    fn stations_recover_up_to_cap() {
        let stations = vec![
            EnergyStation::new(pos(0, 0), 995, 10),
            EnergyStation::new(pos(50, 50), 0, 5),
        ];
        let mut runner = runner_with(stations, Vec::new(), Vec::new());

        runner.play_round();
        let energies: Vec<i64> = runner.map().stations().iter().map(|s| s.energy).collect();
        assert_eq!(energies, vec![1_000, 5]);
    }

    #[test]
    fn run_announces_every_round_until_max() {
        let rules = HostRules {
            max_rounds: 3,
            ..HostRules::default()
        };
        let map = GridMap::new(GridSpace::default(), Vec::new());
        let mut runner = TournamentRunner::new(rules, map, vec![Robot::new(pos(0, 0), 0, "a")]);
        runner.register(Scripted::new("a", Vec::new()));

        let metrics = runner.run();
        assert!(runner.is_finished());
        assert_eq!(runner.round(), 3);
        assert_eq!(metrics.rounds_played, 3);
        assert_eq!(metrics.total_decisions, 3);
        assert_eq!(
            runner.behavior("a").expect("registered").rounds_seen,
            vec![0, 1, 2]
        );
    }

    #[test]
    fn robots_without_behavior_are_skipped() {
        let robots = vec![
            Robot::new(pos(0, 0), 5, "ghost"),
            Robot::new(pos(3, 3), 7, "a"),
        ];
        let mut runner = runner_with(Vec::new(), robots, Vec::new());

        runner.play_round();
        assert_eq!(runner.metrics().skipped_robots, 1);
        assert_eq!(runner.behavior("a").expect("registered").calls, vec![1]);

        let standings = runner.standings();
        assert_eq!(
            standings,
            vec![
                OwnerStanding {
                    owner: "a".to_string(),
                    robots: 1,
                    energy: 7,
                },
                OwnerStanding {
                    owner: "ghost".to_string(),
                    robots: 1,
                    energy: 5,
                },
            ]
        );
    }

    #[test]
    fn snapped_move_costing_more_than_planned_is_rejected_every_round() {
        let stations = vec![EnergyStation::new(pos(5, 2), 100, 0)];
        let robots = vec![Robot::new(pos(0, 0), 26, DEFAULT_POLICY_OWNER)];
        let map = GridMap::new(GridSpace::default(), stations);
        let mut runner = TournamentRunner::new(HostRules::default(), map, robots);
        runner.register(ForagerPolicy::from_profile(PolicyProfile::Tuned));

        for _ in 0..2 {
            let report = runner.play_round();
            assert_eq!(report.rejected, 1);
        }
        assert_eq!(runner.robots()[0], Robot::new(pos(0, 0), 26, DEFAULT_POLICY_OWNER));

        let rejections: Vec<_> = runner
            .log()
            .iter()
            .filter_map(|entry| match &entry.kind {
                RunnerLogKind::CommandRejected {
                    command, rejection, ..
                } => Some((*command, *rejection)),
                _ => None,
            })
            .collect();
        let expected = (
            RobotCommand::Move { to: pos(5, 2) },
            CommandRejected::InsufficientEnergy {
                required: 29,
                available: 26,
            },
        );
        assert_eq!(rejections, vec![expected, expected]);
    }
}
