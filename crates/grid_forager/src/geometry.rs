use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

pub const DEFAULT_GRID_SIZE: i32 = 100;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Largest number of cells a robot may advance in one move. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepRadius(NonZeroU32);

impl StepRadius {
    pub const MIN: Self = Self(NonZeroU32::MIN);

    pub fn new(cells: u32) -> Option<Self> {
        NonZeroU32::new(cells).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn squared(self) -> i64 {
        let cells = i64::from(self.get());
        cells * cells
    }
}

/// Square toroidal grid: both axes wrap at `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpace {
    size: i32,
}

impl Default for GridSpace {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSpace {
    /// Non-positive sizes are clamped to a single cell.
    pub fn new(size: i32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y)
    }

    pub fn wrap(&self, pos: GridPos) -> GridPos {
        GridPos {
            x: pos.x.rem_euclid(self.size),
            y: pos.y.rem_euclid(self.size),
        }
    }

    /// Squared shortest separation of two coordinates on one axis, going
    /// either way around. Coordinates need not be wrapped first.
    pub fn axis_distance_squared(&self, a: i32, b: i32) -> i64 {
        let size = i64::from(self.size);
        let gap = (i64::from(a) - i64::from(b)).rem_euclid(size);
        let shortest = gap.min(size - gap);
        shortest * shortest
    }

    pub fn distance_squared(&self, a: GridPos, b: GridPos) -> i64 {
        self.axis_distance_squared(a.x, b.x) + self.axis_distance_squared(a.y, b.y)
    }

    pub fn distance(&self, a: GridPos, b: GridPos) -> f64 {
        (self.distance_squared(a, b) as f64).sqrt()
    }

    /// Signed step from `from` to `to` along one axis. Among the direct,
    /// positive-wrap and negative-wrap deltas the smallest magnitude wins;
    /// ties keep the earlier candidate in that order.
    pub fn wrapped_direction(&self, from: i32, to: i32) -> i32 {
        let direct = to - from;
        let mut best = direct;
        for candidate in [direct + self.size, direct - self.size] {
            if candidate.abs() < best.abs() {
                best = candidate;
            }
        }
        best
    }

    fn axis_gap(&self, a: i32, b: i32) -> i32 {
        let gap = (a - b).rem_euclid(self.size);
        gap.min(self.size - gap)
    }

    /// Wrapped Chebyshev distance.
    pub fn chebyshev_distance(&self, a: GridPos, b: GridPos) -> i32 {
        self.axis_gap(a.x, b.x).max(self.axis_gap(a.y, b.y))
    }

    pub fn within_radius(&self, center: GridPos, point: GridPos, radius: u32) -> bool {
        i64::from(self.chebyshev_distance(center, point)) <= i64::from(radius)
    }

    /// Position reached after one step of at most `radius` cells toward `to`.
    ///
    /// Snaps onto `to` when the rounded distance is within the radius.
    /// Otherwise each axis advances by its wrapped delta scaled by
    /// `radius / distance`, truncated toward zero, and the result is wrapped
    /// back onto the grid.
    pub fn advance_toward(&self, from: GridPos, to: GridPos, radius: StepRadius) -> GridPos {
        let distance = self.distance(from, to);
        let radius = f64::from(radius.get());
        if distance.round_ties_even() <= radius {
            return self.wrap(to);
        }

        let scale = radius / distance;
        let dx = f64::from(self.wrapped_direction(from.x, to.x)) * scale;
        let dy = f64::from(self.wrapped_direction(from.y, to.y)) * scale;
        self.wrap(GridPos {
            x: from.x + dx as i32,
            y: from.y + dy as i32,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
