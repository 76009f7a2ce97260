//! Projectile and explosive lifecycle
//!
//! Projectiles fly straight along the x axis and are consumed by the first
//! wall or monster they touch. Explosives sit in a cell until their fuse
//! runs out, then clear destructible blocks in a square around them.

use glam::Vec2;

use super::collision::{Aabb, overlaps};
use super::grid::{Tile, TileGrid};
use super::state::{Explosive, FrameEvents, Projectile, World};
use crate::pixel_to_cell;

/// Spawn a projectile from the player if armed and off cooldown
pub fn fire(world: &mut World, events: &mut FrameEvents) -> bool {
    let player = &world.player;
    if !player.has_weapon || world.ammo == 0 || player.fire_cooldown > 0 {
        return false;
    }

    let tuning = &world.tuning;
    let dir = player.facing.sign();
    let center = player.body.center() + Vec2::new(dir * tuning.projectile_spawn_offset, 0.0);
    let rect = Aabb::new(center - tuning.projectile_size * 0.5, tuning.projectile_size);
    let vel_x = dir * tuning.projectile_speed;
    let cooldown = tuning.fire_cooldown_ticks;

    let id = world.next_entity_id();
    world.projectiles.push(Projectile { id, rect, vel_x });
    world.ammo -= 1;
    world.player.fire_cooldown = cooldown;
    events.projectile_fired = true;
    true
}

/// Move projectiles and resolve wall, closed door and monster hits
pub fn advance_projectiles(world: &mut World, events: &mut FrameEvents) {
    let projectiles = std::mem::take(&mut world.projectiles);
    let mut survivors = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        projectile.rect.min.x += projectile.vel_x;
        let rect = projectile.rect;

        let (col, row) = pixel_to_cell(rect.center());
        if !world.grid.in_bounds(col, row) {
            continue;
        }

        let hit_wall = world.grid.cells_around(&rect, 0).any(|(c, r)| {
            let blocking = world.is_solid_cell(c, r) || world.is_closed_door(c, r);
            blocking && overlaps(&rect, &TileGrid::cell_rect(c, r))
        });
        if hit_wall {
            continue;
        }

        if let Some(monster) = world.monsters.iter_mut().find(|m| overlaps(&rect, &m.rect())) {
            monster.health -= 1;
            continue;
        }

        survivors.push(projectile);
    }

    let before = world.monsters.len();
    world.monsters.retain(|m| m.health > 0);
    if world.monsters.len() < before {
        log::debug!("{} monster(s) killed", before - world.monsters.len());
        events.monster_killed = true;
    }
    world.projectiles = survivors;
}

/// Arm an explosive in the player's cell
pub fn place_explosive(world: &mut World) -> bool {
    let cell = pixel_to_cell(world.player.body.center());
    if world.explosive_charges == 0 || world.explosives.iter().any(|e| e.cell == cell) {
        return false;
    }
    let id = world.next_entity_id();
    let fuse_ticks = world.tuning.explosive_fuse_ticks;
    world.explosives.push(Explosive { id, cell, fuse_ticks });
    world.explosive_charges -= 1;
    true
}

/// Burn fuses and detonate the ones that run out
pub fn advance_explosives(world: &mut World, events: &mut FrameEvents) {
    let radius = world.tuning.blast_radius;
    let explosives = std::mem::take(&mut world.explosives);
    let mut armed = Vec::with_capacity(explosives.len());

    for mut explosive in explosives {
        explosive.fuse_ticks = explosive.fuse_ticks.saturating_sub(1);
        if explosive.fuse_ticks > 0 {
            armed.push(explosive);
            continue;
        }

        let cleared = detonate(&mut world.grid, explosive.cell, radius);
        log::debug!(
            "Explosive {} detonated at {:?}, cleared {} block(s)",
            explosive.id,
            explosive.cell,
            cleared
        );
        events.explosive_detonated = true;
    }
    world.explosives = armed;
}

/// Clear destructible blocks within a Chebyshev radius; returns the count
fn detonate(grid: &mut TileGrid, (col, row): (i32, i32), radius: i32) -> usize {
    let mut cleared = 0;
    for r in row - radius..=row + radius {
        for c in col - radius..=col + radius {
            if grid.get(c, r).is_some_and(Tile::is_destructible) {
                grid.set(c, r, Tile::Empty);
                cleared += 1;
            }
        }
    }
    cleared
}
