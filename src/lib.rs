//! Keystone - A tile-based platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, entity behavior, events)
//! - `level`: Level definitions and load-time validation
//! - `session`: Campaign lifecycle (restart on death, advance on completion)
//! - `records`: Completion records handed to persistence
//! - `tuning`: Data-driven game balance
//! - `logging`: env_logger setup for hosts

pub mod level;
pub mod logging;
pub mod records;
pub mod session;
pub mod sim;
pub mod tuning;

pub use level::{Campaign, LevelDefinition, LevelError};
pub use records::{BestRecords, LevelRecord};
pub use session::Session;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate every tick-denominated constant assumes
    pub const TICK_RATE: u32 = 60;
    /// Edge length of one grid cell in pixels
    pub const TILE_SIZE: f32 = 32.0;
}

/// Grid cell coordinate (column, row)
pub type Cell = (i32, i32);

/// Top-left pixel position of a grid cell
#[inline]
pub fn cell_to_pixel(col: i32, row: i32) -> Vec2 {
    Vec2::new(col as f32 * consts::TILE_SIZE, row as f32 * consts::TILE_SIZE)
}

/// Grid cell containing a pixel position
#[inline]
pub fn pixel_to_cell(pos: Vec2) -> Cell {
    (
        (pos.x / consts::TILE_SIZE).floor() as i32,
        (pos.y / consts::TILE_SIZE).floor() as i32,
    )
}
