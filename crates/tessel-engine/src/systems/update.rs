//! Per-entity game logic.

use tessel_entity::behavior::EntityContext;
use tessel_entity::manager::Partition;

use crate::system::{Priority, System};
use crate::world::World;

/// Runs every live entity's `on_update` hook, then advances its animation.
///
/// General entities go first, then projectiles, each in insertion order.
/// Skipped while the world is paused.
#[derive(Debug, Default)]
pub struct EntityUpdateSystem;

impl EntityUpdateSystem {
    /// Create the system.
    pub fn new() -> Self {
        Self
    }
}

impl System for EntityUpdateSystem {
    fn name(&self) -> &str {
        "entities"
    }

    fn priority(&self) -> Priority {
        Priority::GAME_LOGIC
    }

    fn update(&mut self, world: &mut World, dt: f64) -> anyhow::Result<()> {
        if world.paused {
            return Ok(());
        }
        let World {
            entities,
            input,
            frame,
            ..
        } = world;
        for partition in [Partition::General, Partition::Projectile] {
            entities.for_each_mut(partition, |_, entity, spawns| {
                let mut ctx = EntityContext::new(spawns, input, *frame);
                if entity.update(&mut ctx, dt) && !entity.is_destroyed() {
                    entity.body_mut().animation.advance(dt);
                }
            });
        }
        Ok(())
    }
}
