use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, GridSpace, DEFAULT_GRID_SIZE};

/// Costs and limits the host enforces when applying commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRules {
    pub grid_size: i32,
    /// Chebyshev radius a collecting robot draws from.
    pub collect_radius: u32,
    /// Most energy one collect takes from a single station.
    pub station_collect_limit: i64,
    pub spawn_energy_cost: i64,
    pub max_rounds: u32,
    /// Stations stop recovering above this charge.
    pub station_energy_cap: i64,
}

impl Default for HostRules {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            collect_radius: 2,
            station_collect_limit: 40,
            spawn_energy_cost: 100,
            max_rounds: 50,
            station_energy_cap: 1_000,
        }
    }
}

impl HostRules {
    pub fn space(&self) -> GridSpace {
        GridSpace::new(self.grid_size)
    }

    /// Moving costs the wrapped squared distance travelled.
    pub fn move_cost(&self, from: GridPos, to: GridPos) -> i64 {
        self.space().distance_squared(from, to)
    }

    pub fn spawn_cost(&self, endowment: i64) -> i64 {
        self.spawn_energy_cost.saturating_add(endowment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_cost_uses_wrapped_distance() {
        let rules = HostRules::default();
        assert_eq!(rules.move_cost(GridPos::new(0, 0), GridPos::new(98, 0)), 4);
        assert_eq!(rules.move_cost(GridPos::new(5, 5), GridPos::new(10, 10)), 50);
    }

    #[test]
    fn spawn_cost_includes_endowment() {
        assert_eq!(HostRules::default().spawn_cost(100), 200);
    }
}
