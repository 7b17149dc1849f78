//! Host-side queries the policy relies on, plus a vector-backed map.

use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, GridSpace};
use crate::models::{EnergyStation, Robot};

pub const DEFAULT_FREE_CELL_SEARCH_RADIUS: u32 = 2;

/// Read-only map surface offered by the host.
pub trait MapView {
    fn space(&self) -> GridSpace;

    fn stations(&self) -> &[EnergyStation];

    /// Stations within a wrapped Chebyshev `radius` of `center`, in roster order.
    fn nearby_stations(&self, center: GridPos, radius: u32) -> Vec<&EnergyStation> {
        let space = self.space();
        self.stations()
            .iter()
            .filter(|station| space.within_radius(center, station.position, radius))
            .collect()
    }

    /// An unoccupied cell at or near `target`, if any.
    fn find_free_cell(&self, target: GridPos, robots: &[Robot]) -> Option<GridPos>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    space: GridSpace,
    stations: Vec<EnergyStation>,
    free_cell_search_radius: u32,
}

impl GridMap {
    pub fn new(space: GridSpace, stations: Vec<EnergyStation>) -> Self {
        Self {
            space,
            stations,
            free_cell_search_radius: DEFAULT_FREE_CELL_SEARCH_RADIUS,
        }
    }

    pub fn with_free_cell_search_radius(mut self, radius: u32) -> Self {
        self.free_cell_search_radius = radius;
        self
    }

    pub fn add_station(&mut self, station: EnergyStation) {
        self.stations.push(station);
    }

    pub fn stations_mut(&mut self) -> &mut [EnergyStation] {
        &mut self.stations
    }

    pub fn total_station_energy(&self) -> i64 {
        self.stations.iter().map(|station| station.energy).sum()
    }
}

impl MapView for GridMap {
    fn space(&self) -> GridSpace {
        self.space
    }

    fn stations(&self) -> &[EnergyStation] {
        &self.stations
    }

    /// Scans Chebyshev rings outward from `target`, row-major within a ring.
    fn find_free_cell(&self, target: GridPos, robots: &[Robot]) -> Option<GridPos> {
        let max_ring =
            i64::from(self.free_cell_search_radius).min(i64::from(self.space.size() / 2));
        for ring in 0..=max_ring as i32 {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs() != ring && dy.abs() != ring {
                        continue;
                    }
                    let cell = self.space.wrap(GridPos::new(target.x + dx, target.y + dy));
                    if robots.iter().all(|robot| robot.position != cell) {
                        return Some(cell);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(x: i32, y: i32, energy: i64) -> EnergyStation {
        EnergyStation::new(GridPos::new(x, y), energy, 10)
    }

    #[test]
    fn nearby_stations_wrap_around_edges() {
        let map = GridMap::new(
            GridSpace::default(),
            vec![station(99, 0, 50), station(5, 5, 50), station(1, 98, 0)],
        );
        let nearby = map.nearby_stations(GridPos::new(0, 0), 2);
        let positions: Vec<GridPos> = nearby.iter().map(|station| station.position).collect();
        assert_eq!(positions, vec![GridPos::new(99, 0), GridPos::new(1, 98)]);
    }

    #[test]
    fn free_cell_prefers_target_then_rings() {
        let map = GridMap::new(GridSpace::default(), vec![station(10, 10, 100)]);
        let target = GridPos::new(10, 10);
        assert_eq!(map.find_free_cell(target, &[]), Some(target));

        let robots = vec![Robot::new(target, 10, "a")];
        assert_eq!(map.find_free_cell(target, &robots), Some(GridPos::new(9, 9)));
    }

    #[test]
    fn free_cell_gives_up_outside_search_radius() {
        let map = GridMap::new(GridSpace::default(), Vec::new()).with_free_cell_search_radius(0);
        let target = GridPos::new(0, 0);
        let robots = vec![Robot::new(target, 10, "a")];
        assert_eq!(map.find_free_cell(target, &robots), None);
    }

    #[test]
    fn free_cell_wraps_near_origin() {
        let map = GridMap::new(GridSpace::default(), Vec::new());
        let target = GridPos::new(0, 0);
        let robots = vec![Robot::new(target, 10, "a")];
        assert_eq!(map.find_free_cell(target, &robots), Some(GridPos::new(99, 99)));
    }
}
