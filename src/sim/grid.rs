//! Tile grid
//!
//! Fixed-size rectangular array of tile codes. Dimensions never change once
//! a level is loaded; the only mid-level edit is an explosion clearing a
//! destructible block.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::TILE_SIZE;
use crate::{Cell, cell_to_pixel};

/// Tile types (integer codes match the level file format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Empty = 0,
    Wall = 1,
    DestructibleBlock = 2,
    Hazard = 3,
    Platform = 4,
}

impl Tile {
    /// Blocks movement of the player, monsters and projectiles
    pub fn is_solid(self) -> bool {
        !matches!(self, Tile::Empty)
    }

    /// Cleared by explosions
    pub fn is_destructible(self) -> bool {
        self == Tile::DestructibleBlock
    }

    /// Damages a grounded player standing on it
    pub fn is_hazardous(self) -> bool {
        self == Tile::Hazard
    }
}

impl TryFrom<u8> for Tile {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Wall),
            2 => Ok(Tile::DestructibleBlock),
            3 => Ok(Tile::Hazard),
            4 => Ok(Tile::Platform),
            other => Err(other),
        }
    }
}

/// Row-major tile storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build from rows; caller guarantees the rows are rectangular
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len() as i32);
        Self {
            width,
            height,
            tiles: rows.into_iter().flatten().collect(),
        }
    }

    /// Columns
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Rows
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// True when no level is loaded
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// World size in pixels
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.width && row < self.height
    }

    /// Bounds-checked lookup
    pub fn get(&self, col: i32, row: i32) -> Option<Tile> {
        if self.in_bounds(col, row) {
            Some(self.tiles[(row * self.width + col) as usize])
        } else {
            None
        }
    }

    /// Out-of-bounds cells read as empty
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        self.get(col, row).unwrap_or_default()
    }

    /// Overwrite a cell; ignored out of bounds
    pub fn set(&mut self, col: i32, row: i32, tile: Tile) {
        if self.in_bounds(col, row) {
            let idx = (row * self.width + col) as usize;
            self.tiles[idx] = tile;
        }
    }

    /// Pixel rectangle covered by a cell
    pub fn cell_rect(col: i32, row: i32) -> Aabb {
        Aabb::new(cell_to_pixel(col, row), glam::Vec2::splat(TILE_SIZE))
    }

    /// In-bounds cells touched by a rectangle, expanded by `margin` cells
    pub fn cells_around(&self, rect: &Aabb, margin: i32) -> impl Iterator<Item = Cell> + '_ {
        let min_col = (rect.min.x / TILE_SIZE).floor() as i32 - margin;
        let max_col = (rect.max().x / TILE_SIZE).floor() as i32 + margin;
        let min_row = (rect.min.y / TILE_SIZE).floor() as i32 - margin;
        let max_row = (rect.max().y / TILE_SIZE).floor() as i32 + margin;
        (min_row..=max_row)
            .flat_map(move |row| (min_col..=max_col).map(move |col| (col, row)))
            .filter(|&(col, row)| self.in_bounds(col, row))
    }

    /// Invisible walls one tile thick just outside each edge of the world
    pub fn boundary_walls(&self) -> [Aabb; 4] {
        let w = self.pixel_width();
        let h = self.pixel_height();
        let t = TILE_SIZE;
        [
            Aabb::from_corners(glam::Vec2::new(-t, -t), glam::Vec2::new(0.0, h + t)),
            Aabb::from_corners(glam::Vec2::new(w, -t), glam::Vec2::new(w + t, h + t)),
            Aabb::from_corners(glam::Vec2::new(0.0, -t), glam::Vec2::new(w, 0.0)),
            Aabb::from_corners(glam::Vec2::new(0.0, h), glam::Vec2::new(w, h + t)),
        ]
    }
}
