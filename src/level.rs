//! Level definitions
//!
//! Levels are authored in grid coordinates and loaded from JSON. Every
//! definition is validated before a world is built from it, so the
//! simulation never sees a malformed grid or an out-of-range placement.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Cell;
use crate::sim::grid::{Tile, TileGrid};
use crate::sim::hazard::HazardDirection;
use crate::sim::state::CollectibleKind;
use crate::tuning::TuningError;

/// Reasons a level is rejected at load time
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("campaign contains no levels")]
    EmptyCampaign,
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("grid row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown tile code {code} at ({col}, {row})")]
    UnknownTile { col: usize, row: usize, code: u8 },
    #[error("level has no spawn position")]
    MissingSpawn,
    #[error("level has no goal position")]
    MissingGoal,
    #[error("{what} at ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfRange {
        what: String,
        col: i32,
        row: i32,
        width: i32,
        height: i32,
    },
    #[error("monster {index} patrol [{min}, {max}] does not contain start column {start}")]
    InvalidPatrol {
        index: usize,
        min: i32,
        max: i32,
        start: i32,
    },
    #[error("monster {index} has direction {direction}, expected -1 or 1")]
    InvalidDirection { index: usize, direction: i32 },
    #[error("monster {index}: {reason}")]
    InvalidMonster { index: usize, reason: &'static str },
    #[error("hazard {index}: {reason}")]
    InvalidHazard { index: usize, reason: &'static str },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// A grid position in a level file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl From<GridPos> for Cell {
    fn from(pos: GridPos) -> Self {
        (pos.col, pos.row)
    }
}

fn default_direction() -> i32 {
    1
}

/// Monster placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterPlacement {
    pub col: i32,
    pub row: i32,
    /// Inclusive patrol columns
    pub patrol_min: i32,
    pub patrol_max: i32,
    /// Initial direction, +1 or -1
    #[serde(default = "default_direction")]
    pub direction: i32,
    /// Overrides the tuned monster speed
    #[serde(default)]
    pub speed: Option<f32>,
    /// Overrides the tuned monster health
    #[serde(default)]
    pub health: Option<i32>,
}

/// Collectible placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectiblePlacement {
    pub col: i32,
    pub row: i32,
    pub kind: CollectibleKind,
}

/// Timed hazard placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardPlacement {
    pub col: i32,
    pub row: i32,
    pub direction: HazardDirection,
    /// Spray length in tiles
    pub reach: i32,
    pub active_ticks: u32,
    pub rest_ticks: u32,
}

/// One level as authored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub name: String,
    /// Row-major tile codes
    pub grid: Vec<Vec<u8>>,
    #[serde(default)]
    pub spawn: Option<GridPos>,
    #[serde(default)]
    pub goal: Option<GridPos>,
    #[serde(default)]
    pub monsters: Vec<MonsterPlacement>,
    #[serde(default)]
    pub collectibles: Vec<CollectiblePlacement>,
    #[serde(default)]
    pub doors: Vec<GridPos>,
    #[serde(default)]
    pub hazards: Vec<HazardPlacement>,
}

/// The parts of a definition that only exist once it has been validated
#[derive(Debug, Clone)]
pub struct ValidLevel {
    pub grid: TileGrid,
    pub spawn: Cell,
    pub goal: Cell,
}

impl LevelDefinition {
    /// Parse a single level from JSON (not yet validated)
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the definition and decode its grid
    pub fn validate(&self) -> Result<ValidLevel, LevelError> {
        let grid = self.decode_grid()?;
        let (width, height) = (grid.width(), grid.height());
        let check = |what: String, col: i32, row: i32| {
            if grid.in_bounds(col, row) {
                Ok(())
            } else {
                Err(LevelError::OutOfRange {
                    what,
                    col,
                    row,
                    width,
                    height,
                })
            }
        };

        let spawn = self.spawn.ok_or(LevelError::MissingSpawn)?;
        check("spawn".into(), spawn.col, spawn.row)?;
        let goal = self.goal.ok_or(LevelError::MissingGoal)?;
        check("goal".into(), goal.col, goal.row)?;

        for (index, m) in self.monsters.iter().enumerate() {
            check(format!("monster {index}"), m.col, m.row)?;
            check(format!("monster {index} patrol_min"), m.patrol_min, m.row)?;
            check(format!("monster {index} patrol_max"), m.patrol_max, m.row)?;
            if !(m.patrol_min..=m.patrol_max).contains(&m.col) {
                return Err(LevelError::InvalidPatrol {
                    index,
                    min: m.patrol_min,
                    max: m.patrol_max,
                    start: m.col,
                });
            }
            if m.direction.abs() != 1 {
                return Err(LevelError::InvalidDirection {
                    index,
                    direction: m.direction,
                });
            }
            let reason = match (m.speed, m.health) {
                (Some(speed), _) if !(speed.is_finite() && speed > 0.0) => {
                    Some("speed must be positive and finite")
                }
                (_, Some(health)) if health <= 0 => Some("health must be positive"),
                _ => None,
            };
            if let Some(reason) = reason {
                return Err(LevelError::InvalidMonster { index, reason });
            }
        }

        for (index, c) in self.collectibles.iter().enumerate() {
            check(format!("collectible {index}"), c.col, c.row)?;
        }
        for (index, d) in self.doors.iter().enumerate() {
            check(format!("door {index}"), d.col, d.row)?;
        }
        for (index, h) in self.hazards.iter().enumerate() {
            check(format!("hazard {index}"), h.col, h.row)?;
            let reason = if h.reach <= 0 {
                Some("reach must be positive")
            } else if h.active_ticks == 0 {
                Some("active_ticks must be positive")
            } else if h.rest_ticks == 0 {
                Some("rest_ticks must be positive")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(LevelError::InvalidHazard { index, reason });
            }
        }

        Ok(ValidLevel {
            grid,
            spawn: spawn.into(),
            goal: goal.into(),
        })
    }

    fn decode_grid(&self) -> Result<TileGrid, LevelError> {
        let expected = self.grid.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let mut rows = Vec::with_capacity(self.grid.len());
        for (row, codes) in self.grid.iter().enumerate() {
            if codes.len() != expected {
                return Err(LevelError::RaggedRow {
                    row,
                    expected,
                    found: codes.len(),
                });
            }
            let tiles = codes
                .iter()
                .enumerate()
                .map(|(col, &code)| {
                    Tile::try_from(code).map_err(|code| LevelError::UnknownTile { col, row, code })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(tiles);
        }
        Ok(TileGrid::from_rows(rows))
    }
}

/// An ordered list of levels played back to back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub name: String,
    pub levels: Vec<LevelDefinition>,
}

impl Campaign {
    /// Parse a campaign from JSON (levels are validated when a session starts)
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let campaign: Self = serde_json::from_str(json)?;
        if campaign.levels.is_empty() {
            return Err(LevelError::EmptyCampaign);
        }
        Ok(campaign)
    }
}
