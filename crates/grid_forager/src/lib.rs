pub mod geometry;
pub mod host;
pub mod map;
pub mod models;
pub mod planner;
pub mod policy;

pub use geometry::{GridPos, GridSpace, StepRadius, DEFAULT_GRID_SIZE};
pub use map::{GridMap, MapView, DEFAULT_FREE_CELL_SEARCH_RADIUS};
pub use models::{EnergyStation, OwnerId, Robot, RobotCommand};
pub use planner::{plan_move, MoveParams, MovePlan};

// Robot policy (observe → decide)
pub use policy::{
    DecisionReason, DecisionTrace, ForagerPolicy, PlannedRoute, PolicyConfig, PolicyConfigError,
    PolicyError, PolicyProfile, PolicyState, RobotBehavior, RoundSource, RoundTracker,
    RouteRejection, DEFAULT_CONFIG_FILE_NAME, DEFAULT_POLICY_OWNER,
    ENV_FORAGER_CLAIM_DEPLETED_STATIONS, ENV_FORAGER_COLLECT_RADIUS,
    ENV_FORAGER_CONTESTED_ENERGY_PER_ROBOT, ENV_FORAGER_CROWDING_CAP,
    ENV_FORAGER_EARLY_GAME_ROUNDS, ENV_FORAGER_INITIAL_POPULATION, ENV_FORAGER_MAX_STEP_RADIUS,
    ENV_FORAGER_OWNER, ENV_FORAGER_POPULATION_CAP, ENV_FORAGER_PROFILE, ENV_FORAGER_ROUND_BUDGET,
    ENV_FORAGER_ROUND_SOURCE, ENV_FORAGER_SPAWN_CROWDING_CHECK, ENV_FORAGER_SPAWN_ENDOWMENT,
    ENV_FORAGER_SPAWN_ENERGY_COST,
};

// Reference host
pub use host::{
    build_scenario, CommandOutcome, CommandRejected, HostRules, OwnerStanding, RoundReport,
    RunnerLogEntry, RunnerLogKind, RunnerMetrics, Scenario, ScenarioConfig, ScenarioError,
    TournamentRunner,
};
