//! Walker: a ground enemy that patrols between walls.
//!
//! It walks at a constant speed, turns around when it bumps into a wall or
//! another enemy, loses health to player projectiles and drops a pickup when
//! it dies.

use std::any::Any;

use tessel_entity::behavior::{Behavior, EntityContext};
use tessel_entity::body::Body;
use tessel_entity::collision::{CollisionInfo, Side};
use tessel_entity::entity::Entity;
use tessel_entity::layer::PhysicsLayer;

/// Factory type key.
pub const TYPE_KEY: &str = "walker";

/// Walking speed in px/s.
pub const SPEED: f64 = 40.0;
/// Hits it takes to die.
pub const HEALTH: u32 = 3;

/// Walker state.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    direction: f64,
    health: u32,
}

impl Walker {
    /// Walking left with full health.
    pub fn new() -> Self {
        Self {
            direction: -1.0,
            health: HEALTH,
        }
    }

    /// `-1.0` for left, `1.0` for right.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Remaining health.
    pub fn health(&self) -> u32 {
        self.health
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory constructor.
pub fn create(x: f64, y: f64) -> anyhow::Result<Entity> {
    let mut body = Body::new(TYPE_KEY, x, y, 16.0, 16.0)
        .with_physics(true, true)
        .with_layer(PhysicsLayer::Enemy)
        .with_sprite(TYPE_KEY);
    body.projectile_target = true;
    body.contact_damage = 1;
    Ok(Entity::new(body, Walker::new()))
}

impl Behavior for Walker {
    fn on_update(&mut self, body: &mut Body, _ctx: &mut EntityContext<'_>, _dt: f64) -> anyhow::Result<()> {
        body.velocity.x = self.direction * SPEED;
        body.flip_x = self.direction > 0.0;
        body.animation.play("walk", 4, 0.15, true);
        Ok(())
    }

    fn on_collision(
        &mut self,
        body: &mut Body,
        info: &CollisionInfo,
        _ctx: &mut EntityContext<'_>,
    ) -> anyhow::Result<()> {
        let blocked_ahead = matches!(
            (info.side, self.direction > 0.0),
            (Side::Right, true) | (Side::Left, false)
        );
        match &info.other {
            None if blocked_ahead => self.direction = -self.direction,
            None => {}
            Some(other) if other.layer == PhysicsLayer::PlayerProjectile => {
                self.health = self.health.saturating_sub(other.contact_damage.max(1));
                if self.health == 0 {
                    body.destroy();
                }
            }
            Some(other) if other.layer == PhysicsLayer::Enemy && blocked_ahead => {
                self.direction = -self.direction;
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn on_destroy(&mut self, body: &mut Body, ctx: &mut EntityContext<'_>) -> anyhow::Result<()> {
        ctx.spawns
            .spawn_named(super::pickup::TYPE_KEY, body.position.x + 4.0, body.position.y);
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_entity::collision::{EntitySnapshot, TileCoord};
    use tessel_entity::id::EntityId;
    use tessel_entity::input::InputState;
    use tessel_entity::spawn::{SpawnQueue, SpawnRequest};

    fn shot() -> CollisionInfo {
        let body = Body::new("energy_bullet", 0.0, 0.0, 6.0, 4.0).with_layer(PhysicsLayer::PlayerProjectile);
        CollisionInfo::entity(EntitySnapshot::capture(EntityId::new(9, 0), &body), Side::Left, 1.0)
    }

    #[test]
    fn turns_around_at_walls_ahead_only() {
        let mut spawns = SpawnQueue::new();
        let input = InputState::default();
        let mut ctx = EntityContext::new(&mut spawns, &input, 0);
        let mut walker = create(0.0, 0.0).unwrap();

        let wall = |side| CollisionInfo::tile(side, 1.0, TileCoord { col: 0, row: 0 });
        walker.dispatch_collision(Some(&wall(Side::Bottom)), &mut ctx);
        assert_eq!(walker.behavior_as::<Walker>().unwrap().direction(), -1.0);
        walker.dispatch_collision(Some(&wall(Side::Left)), &mut ctx);
        assert_eq!(walker.behavior_as::<Walker>().unwrap().direction(), 1.0);
        walker.dispatch_collision(Some(&wall(Side::Left)), &mut ctx);
        assert_eq!(walker.behavior_as::<Walker>().unwrap().direction(), 1.0);

        walker.update(&mut ctx, 0.016);
        assert_eq!(walker.body().velocity.x, SPEED);
        assert!(walker.body().flip_x);
    }

    #[test]
    fn dies_after_three_hits_and_drops_a_pickup() {
        let mut spawns = SpawnQueue::new();
        let input = InputState::default();
        let mut walker = create(32.0, 16.0).unwrap();
        {
            let mut ctx = EntityContext::new(&mut spawns, &input, 0);
            for _ in 0..HEALTH {
                walker.dispatch_collision(Some(&shot()), &mut ctx);
            }
        }
        assert!(walker.is_destroyed());
        let drops: Vec<SpawnRequest> = spawns.drain().collect();
        assert_eq!(drops.len(), 1);
        assert!(matches!(
            &drops[0],
            SpawnRequest::Named { type_key, x, y } if type_key == "pickup" && *x == 36.0 && *y == 16.0
        ));
    }
}
