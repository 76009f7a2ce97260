//! Keys, doors and collectibles
//!
//! Closed doors are walls until the player spends a key on them. Opening is
//! an explicit action with a square reach around the player; touching a
//! door never opens it.

use super::collision::{overlaps, resolve};
use super::state::{CollectibleKind, FrameEvents, World};

/// Pick up every uncollected item overlapping the player
pub fn collect_items(world: &mut World, events: &mut FrameEvents) {
    let player = world.player.rect();
    let mut picked = Vec::new();
    for item in world.collectibles.iter_mut().filter(|c| !c.collected) {
        if overlaps(&player, &item.rect) {
            item.collected = true;
            picked.push(item.kind);
        }
    }

    for kind in picked {
        apply_pickup(world, kind);
        events.item_collected = true;
        events.collected.push(kind);
    }
}

fn apply_pickup(world: &mut World, kind: CollectibleKind) {
    match kind {
        CollectibleKind::Key => world.keys += 1,
        CollectibleKind::Weapon => {
            world.player.has_weapon = true;
            world.ammo += world.tuning.weapon_ammo_bonus;
        }
        CollectibleKind::ExplosiveCharge => world.explosive_charges += 1,
        CollectibleKind::HealthPickup => world.health = (world.health + 1).min(world.max_health),
        // Recorded as collected; no counter yet
        CollectibleKind::ScoreToken => {}
    }
}

/// Spend one key on the nearest closed door within reach
///
/// Reach is tested per axis from door center to player center, so the
/// eligible area is a square, not a circle. Returns the opened door's id.
pub fn open_nearest_door(world: &mut World, events: &mut FrameEvents) -> Option<u32> {
    if world.keys == 0 {
        return None;
    }

    let range = world.tuning.door_open_range();
    let center = world.player.body.center();
    let door = world
        .doors
        .iter_mut()
        .filter(|d| !d.open)
        .filter(|d| {
            let delta = (d.rect().center() - center).abs();
            delta.x <= range && delta.y <= range
        })
        .min_by(|a, b| {
            let da = a.rect().center().distance_squared(center);
            let db = b.rect().center().distance_squared(center);
            da.total_cmp(&db)
        })?;

    door.open = true;
    let id = door.id;
    world.keys -= 1;
    events.door_opened = true;
    log::debug!("Door {} opened, {} key(s) left", id, world.keys);
    Some(id)
}

/// Closed doors push the player back like walls
pub fn collide_doors(world: &mut World) {
    for door in world.doors.iter().filter(|d| !d.open) {
        resolve(&mut world.player.body, &door.rect());
    }
}
