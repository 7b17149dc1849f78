//! Policy interface: RobotBehavior trait and decision traces.

use serde::{Deserialize, Serialize};

use super::error::{PolicyError, RouteRejection};
use crate::geometry::GridPos;
use crate::map::MapView;
use crate::models::{Robot, RobotCommand};
use crate::planner::MoveParams;

// ============================================================================
// Robot Behavior (observe → decide)
// ============================================================================

/// A per-owner decision policy driven by the host.
///
/// The host calls `decide` once per acting robot per tick. Implementations
/// must always return a command; anything that goes wrong inside a call is
/// resolved into one of the three command variants.
pub trait RobotBehavior {
    /// Owner name whose robots this behavior controls.
    fn owner(&self) -> &str;

    fn decide(&mut self, robots: &[Robot], robot_index: usize, map: &dyn MapView)
        -> RobotCommand;

    /// Round announcement pushed by the host, if it sends any.
    fn on_round_started(&mut self, _round: u32) {
        // Default: no-op
    }

    /// Takes and clears the trace of the latest decision, if recorded.
    fn take_decision_trace(&mut self) -> Option<DecisionTrace> {
        None
    }
}

// ============================================================================
// Decision Trace
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub robot_index: usize,
    /// Round the decision was made under.
    pub round: u32,
    pub command: RobotCommand,
    pub reason: DecisionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DecisionReason {
    SpawnEligible,
    CollectInRange,
    RouteFound {
        station: GridPos,
        target: GridPos,
        params: MoveParams,
    },
    Fallback {
        rejection: RouteRejection,
    },
    InvalidInput {
        error: PolicyError,
    },
}
