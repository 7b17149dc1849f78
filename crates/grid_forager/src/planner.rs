//! Budgeted step planning: how far to go per move and how many moves it takes.

use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, GridSpace, StepRadius};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveParams {
    pub steps_needed: u32,
    pub radius: StepRadius,
}

impl MoveParams {
    /// Energy the plan costs under the quadratic model: `radius^2 * steps`.
    pub fn energy_cost(&self) -> i64 {
        self.radius.squared() * i64::from(self.steps_needed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MovePlan {
    Feasible(MoveParams),
    /// No radius in `[1, max_radius]` fits the energy budget.
    Infeasible,
}

impl MovePlan {
    pub fn is_feasible(&self) -> bool {
        matches!(self, MovePlan::Feasible(_))
    }

    pub fn params(&self) -> Option<MoveParams> {
        match self {
            MovePlan::Feasible(params) => Some(*params),
            MovePlan::Infeasible => None,
        }
    }

    /// Steps to arrival, `u32::MAX` when infeasible.
    pub fn steps_needed(&self) -> u32 {
        self.params().map_or(u32::MAX, |params| params.steps_needed)
    }

    /// Chosen radius, `-1` when infeasible.
    pub fn radius_value(&self) -> i64 {
        self.params()
            .map_or(-1, |params| i64::from(params.radius.get()))
    }
}

/// Picks the largest radius in `[1, max_radius]` whose cost
/// `r^2 * round(distance / r)` stays strictly below `energy_budget`.
pub fn plan_move(
    space: &GridSpace,
    start: GridPos,
    destination: GridPos,
    energy_budget: i64,
    max_radius: u32,
) -> MovePlan {
    let distance = space.distance(start, destination);
    for cells in (1..=max_radius).rev() {
        let Some(radius) = StepRadius::new(cells) else {
            continue;
        };
        let steps = (distance / f64::from(cells)).round_ties_even();
        let params = MoveParams {
            steps_needed: steps as u32,
            radius,
        };
        if params.energy_cost() < energy_budget {
            return MovePlan::Feasible(params);
        }
    }
    MovePlan::Infeasible
}
