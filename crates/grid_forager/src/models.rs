//! Read-only views of the host's roster: robots, energy stations, commands.

use serde::{Deserialize, Serialize};

use crate::geometry::GridPos;

pub type OwnerId = String;

// ============================================================================
// Roster Entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub position: GridPos,
    pub energy: i64,
    pub owner: OwnerId,
}

impl Robot {
    pub fn new(position: GridPos, energy: i64, owner: impl Into<OwnerId>) -> Self {
        Self {
            position,
            energy,
            owner: owner.into(),
        }
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }
}

/// A stationary energy source. Depletion and recovery belong to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyStation {
    pub position: GridPos,
    pub energy: i64,
    pub recovery_rate: i64,
}

impl EnergyStation {
    pub fn new(position: GridPos, energy: i64, recovery_rate: i64) -> Self {
        Self {
            position,
            energy,
            recovery_rate,
        }
    }

    pub fn has_energy(&self) -> bool {
        self.energy > 0
    }
}

// ============================================================================
// Commands
// ============================================================================

/// The single command a policy returns for the acting robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RobotCommand {
    Collect,
    Spawn { endowment: i64 },
    Move { to: GridPos },
}

impl RobotCommand {
    pub fn label(&self) -> &'static str {
        match self {
            RobotCommand::Collect => "collect",
            RobotCommand::Spawn { .. } => "spawn",
            RobotCommand::Move { .. } => "move",
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, RobotCommand::Move { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_shape_is_tagged() {
        let json = serde_json::to_value(RobotCommand::Move {
            to: GridPos::new(3, 4),
        })
        .expect("serialize command");
        assert_eq!(json["type"], "move");
        assert_eq!(json["data"]["to"]["x"], 3);

        let json = serde_json::to_value(RobotCommand::Collect).expect("serialize command");
        assert_eq!(json["type"], "collect");

        let decoded: RobotCommand =
            serde_json::from_str(r#"{"type":"spawn","data":{"endowment":100}}"#)
                .expect("decode spawn");
        assert_eq!(decoded, RobotCommand::Spawn { endowment: 100 });
    }
}
