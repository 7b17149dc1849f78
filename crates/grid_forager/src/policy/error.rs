use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GridPos;

/// Why routing produced no destination this call. Always recovered by
/// falling back to a collect command.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RouteRejection {
    #[error("no energy stations on the map")]
    NoStations,
    #[error("every station is depleted or contested")]
    AllCandidatesSkipped,
    #[error("no free cell near any acceptable station")]
    NoFreeCell,
    #[error("energy {energy} cannot pay for any step toward {station:?}")]
    Infeasible { station: GridPos, energy: i64 },
    #[error("arrival at round {arrival_round} is past the round budget {round_budget}")]
    BeyondRoundBudget {
        station: GridPos,
        arrival_round: u64,
        round_budget: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PolicyError {
    #[error("robot index {index} out of range for roster of {len}")]
    RobotIndexOutOfRange { index: usize, len: usize },
}
