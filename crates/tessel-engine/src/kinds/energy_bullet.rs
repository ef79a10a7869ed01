//! Energy bullet: a straight-flying projectile with a limited life.
//!
//! Tile detection is discrete, so a fast shot can skip through thin walls.
//! The bullet bounds the damage by destroying itself once it has flown longer
//! than its lifetime or further than its range, whichever comes first.

use std::any::Any;

use tessel_entity::behavior::{Behavior, EntityContext};
use tessel_entity::body::{Body, Vec2};
use tessel_entity::collision::CollisionInfo;
use tessel_entity::entity::Entity;
use tessel_entity::layer::PhysicsLayer;
use tessel_entity::manager::Partition;

/// Factory type key.
pub const TYPE_KEY: &str = "energy_bullet";

/// Default speed in px/s.
pub const SPEED: f64 = 240.0;
/// Default lifetime in seconds.
pub const MAX_LIFETIME: f64 = 2.0;
/// Default range in px.
pub const MAX_RANGE: f64 = 320.0;

const WIDTH: f64 = 6.0;
const HEIGHT: f64 = 4.0;

/// Bullet state.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBullet {
    origin: Vec2,
    elapsed: f64,
    max_lifetime: f64,
    max_range: f64,
}

impl EnergyBullet {
    /// A bullet that will fly from `origin`.
    pub fn new(origin: Vec2, max_lifetime: f64, max_range: f64) -> Self {
        Self {
            origin,
            elapsed: 0.0,
            max_lifetime,
            max_range,
        }
    }

    /// A ready entity at `(x, y)` moving at `velocity` on `layer`.
    pub fn fired(x: f64, y: f64, velocity: Vec2, layer: PhysicsLayer) -> Entity {
        Self::fired_with(x, y, velocity, layer, MAX_LIFETIME, MAX_RANGE)
    }

    /// As [`fired`](Self::fired), with explicit limits.
    pub fn fired_with(
        x: f64,
        y: f64,
        velocity: Vec2,
        layer: PhysicsLayer,
        max_lifetime: f64,
        max_range: f64,
    ) -> Entity {
        let mut body = Body::new(TYPE_KEY, x, y, WIDTH, HEIGHT)
            .with_physics(false, false)
            .with_tile_notify()
            .with_layer(layer)
            .with_velocity(velocity.x, velocity.y)
            .with_sprite(TYPE_KEY);
        body.contact_damage = 1;
        body.flip_x = velocity.x < 0.0;
        body.z_order = 5;
        Entity::new(body, Self::new(Vec2::new(x, y), max_lifetime, max_range))
    }

    /// Seconds in flight.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Spawn point.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }
}

/// Factory constructor: a player shot flying right.
pub fn create(x: f64, y: f64) -> anyhow::Result<Entity> {
    Ok(EnergyBullet::fired(
        x,
        y,
        Vec2::new(SPEED, 0.0),
        PhysicsLayer::PlayerProjectile,
    ))
}

impl Behavior for EnergyBullet {
    fn init(&mut self, _body: &mut Body) -> Partition {
        Partition::Projectile
    }

    fn on_update(&mut self, body: &mut Body, _ctx: &mut EntityContext<'_>, dt: f64) -> anyhow::Result<()> {
        self.elapsed += dt;
        if self.elapsed > self.max_lifetime || body.position.distance(self.origin) > self.max_range {
            body.destroy();
        }
        Ok(())
    }

    fn on_collision(
        &mut self,
        body: &mut Body,
        info: &CollisionInfo,
        _ctx: &mut EntityContext<'_>,
    ) -> anyhow::Result<()> {
        let hit = match &info.other {
            None => true,
            Some(other) => other.projectile_target,
        };
        if hit {
            body.destroy();
        }
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
