//! Timed hazard state machine
//!
//! A directional trap cycles `Resting -> Warning -> Active -> Resting`
//! forever. `Warning` is the tail end of the rest period, flagged so the
//! renderer can telegraph the burst. While `Active`, the sprayed tiles grow
//! outward from the source one tile per spray interval until they reach the
//! configured distance. The source tile itself is always solid.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::grid::TileGrid;
use crate::Cell;
use crate::level::HazardPlacement;
use crate::tuning::Tuning;

/// Direction the hazard sprays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HazardDirection {
    /// Cell offset of one step
    pub fn delta(self) -> Cell {
        match self {
            HazardDirection::Up => (0, -1),
            HazardDirection::Down => (0, 1),
            HazardDirection::Left => (-1, 0),
            HazardDirection::Right => (1, 0),
        }
    }
}

/// Current hazard phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardPhase {
    #[default]
    Resting,
    /// Final stretch of resting, about to fire
    Warning,
    Active,
}

/// A timed directional hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedHazard {
    pub id: u32,
    /// Solid footprint cell
    pub source: Cell,
    pub direction: HazardDirection,
    /// Maximum spray length in tiles
    pub reach: i32,
    pub active_ticks: u32,
    pub rest_ticks: u32,
    pub phase: HazardPhase,
    /// Ticks remaining in the current phase
    pub timer: u32,
    /// Cells currently sprayed; empty unless active
    pub occupied: Vec<Cell>,
}

impl TimedHazard {
    /// Create a resting hazard from its placement
    ///
    /// Placement durations are authored at the base tick rate and converted
    /// to the rate `tuning` runs at.
    pub fn new(id: u32, placement: &HazardPlacement, tuning: &Tuning) -> Self {
        let rest_ticks = tuning.level_ticks(placement.rest_ticks);
        Self {
            id,
            source: (placement.col, placement.row),
            direction: placement.direction,
            reach: placement.reach,
            active_ticks: tuning.level_ticks(placement.active_ticks),
            rest_ticks,
            phase: HazardPhase::Resting,
            timer: rest_ticks,
            occupied: Vec::new(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == HazardPhase::Active
    }

    /// True if the hazard is spraying into `cell` right now
    pub fn occupies(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Rectangles of every sprayed cell
    pub fn occupied_rects(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.occupied.iter().map(|&(col, row)| TileGrid::cell_rect(col, row))
    }

    /// Ticks at the end of the rest period flagged as warning
    ///
    /// Always shorter than the rest period so every cycle spends at least one
    /// tick `Resting`.
    pub fn warning_ticks(&self, tuning: &Tuning) -> u32 {
        let ticks = (self.rest_ticks as f32 * tuning.hazard_warning_fraction).round() as u32;
        ticks.min(self.rest_ticks.saturating_sub(1))
    }

    /// Advance by one tick
    pub fn advance(&mut self, grid: &TileGrid, tuning: &Tuning) {
        self.timer = self.timer.saturating_sub(1);
        match self.phase {
            HazardPhase::Resting | HazardPhase::Warning => {
                if self.timer == 0 {
                    self.phase = HazardPhase::Active;
                    self.timer = self.active_ticks;
                    self.spray(grid, tuning);
                } else if self.timer <= self.warning_ticks(tuning) {
                    self.phase = HazardPhase::Warning;
                }
            }
            HazardPhase::Active => {
                if self.timer == 0 {
                    self.occupied.clear();
                    self.timer = self.rest_ticks;
                    self.phase = HazardPhase::Resting;
                } else {
                    self.spray(grid, tuning);
                }
            }
        }
    }

    /// Recompute sprayed cells from the time spent active
    fn spray(&mut self, grid: &TileGrid, tuning: &Tuning) {
        let elapsed = self.active_ticks.saturating_sub(self.timer);
        let revealed = (elapsed / tuning.hazard_spray_interval.max(1) + 1) as i32;
        let (dx, dy) = self.direction.delta();
        self.occupied = (1..=revealed.min(self.reach))
            .map(|step| (self.source.0 + dx * step, self.source.1 + dy * step))
            .filter(|&(col, row)| grid.in_bounds(col, row))
            .collect();
    }
}
