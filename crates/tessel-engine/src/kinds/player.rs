//! The player character.
//!
//! Reads the `left`, `right`, `jump` and `shoot` actions. Collects pickups,
//! takes contact damage from enemies and enemy shots, and is briefly
//! invulnerable after each hit.

use std::any::Any;

use tessel_entity::behavior::{Behavior, EntityContext};
use tessel_entity::body::{Body, Vec2};
use tessel_entity::collision::CollisionInfo;
use tessel_entity::entity::Entity;
use tessel_entity::layer::PhysicsLayer;

use super::energy_bullet::{self, EnergyBullet};

/// Factory type key.
pub const TYPE_KEY: &str = "player";

/// Horizontal speed in px/s.
pub const RUN_SPEED: f64 = 120.0;
/// Initial upward speed of a jump in px/s.
pub const JUMP_SPEED: f64 = 360.0;
/// Seconds between shots.
pub const SHOT_COOLDOWN: f64 = 0.25;
/// Seconds of invulnerability after a hit.
pub const HURT_TIME: f64 = 1.0;
/// Starting health.
pub const HEALTH: u32 = 5;

const WIDTH: f64 = 12.0;
const HEIGHT: f64 = 20.0;

/// Player state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    health: u32,
    coins: u32,
    facing: f64,
    cooldown: f64,
    invulnerable: f64,
}

impl Player {
    /// Full health, facing right.
    pub fn new() -> Self {
        Self {
            health: HEALTH,
            coins: 0,
            facing: 1.0,
            cooldown: 0.0,
            invulnerable: 0.0,
        }
    }

    /// Remaining health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Pickups collected.
    pub fn coins(&self) -> u32 {
        self.coins
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory constructor.
pub fn create(x: f64, y: f64) -> anyhow::Result<Entity> {
    let mut body = Body::new(TYPE_KEY, x, y, WIDTH, HEIGHT)
        .with_physics(true, true)
        .with_layer(PhysicsLayer::Player)
        .with_sprite(TYPE_KEY);
    body.projectile_target = true;
    body.z_order = 10;
    Ok(Entity::new(body, Player::new()))
}

impl Behavior for Player {
    fn on_update(&mut self, body: &mut Body, ctx: &mut EntityContext<'_>, dt: f64) -> anyhow::Result<()> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);

        let run = ctx.input.axis("left", "right");
        body.velocity.x = run * RUN_SPEED;
        if run != 0.0 {
            self.facing = run.signum();
            body.flip_x = run < 0.0;
        }
        if ctx.input.just_pressed("jump") && body.on_ground {
            body.velocity.y = -JUMP_SPEED;
        }

        if ctx.input.is_down("shoot") && self.cooldown == 0.0 {
            self.cooldown = SHOT_COOLDOWN;
            let muzzle_x = if self.facing > 0.0 {
                body.position.x + body.size.x
            } else {
                body.position.x - 6.0
            };
            ctx.spawns.add_projectile(EnergyBullet::fired(
                muzzle_x,
                body.position.y + body.size.y * 0.4,
                Vec2::new(self.facing * energy_bullet::SPEED, 0.0),
                PhysicsLayer::PlayerProjectile,
            ));
        }

        match (body.on_ground, run != 0.0) {
            (false, _) => body.animation.play("jump", 1, 0.0, false),
            (true, true) => body.animation.play("run", 6, 0.08, true),
            (true, false) => body.animation.play("idle", 2, 0.5, true),
        }
        Ok(())
    }

    fn on_collision(
        &mut self,
        body: &mut Body,
        info: &CollisionInfo,
        _ctx: &mut EntityContext<'_>,
    ) -> anyhow::Result<()> {
        let Some(other) = &info.other else {
            return Ok(());
        };
        match other.layer {
            PhysicsLayer::Pickup => self.coins += 1,
            PhysicsLayer::Enemy | PhysicsLayer::EnemyProjectile
                if other.contact_damage > 0 && self.invulnerable == 0.0 =>
            {
                self.health = self.health.saturating_sub(other.contact_damage);
                self.invulnerable = HURT_TIME;
                if self.health == 0 {
                    body.destroy();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_entity::collision::{EntitySnapshot, Side};
    use tessel_entity::id::EntityId;
    use tessel_entity::input::{InputFrame, InputState};
    use tessel_entity::spawn::SpawnQueue;

    fn hit_by(layer: PhysicsLayer, damage: u32) -> CollisionInfo {
        let mut body = Body::new("thing", 0.0, 0.0, 8.0, 8.0).with_layer(layer);
        body.contact_damage = damage;
        CollisionInfo::entity(EntitySnapshot::capture(EntityId::new(3, 0), &body), Side::Right, 1.0)
    }

    #[test]
    fn runs_jumps_and_shoots_from_input() {
        let mut spawns = SpawnQueue::new();
        let mut input = InputState::default();
        input.advance(InputFrame::default().with("left", 1.0).with("jump", 1.0).with("shoot", 1.0));

        let mut player = create(50.0, 50.0).unwrap();
        player.body_mut().on_ground = true;
        {
            let mut ctx = EntityContext::new(&mut spawns, &input, 0);
            player.update(&mut ctx, 1.0 / 60.0);
            // Held shoot is throttled by the cooldown.
            player.update(&mut ctx, 1.0 / 60.0);
        }
        let body = player.body();
        assert_eq!(body.velocity.x, -RUN_SPEED);
        assert_eq!(body.velocity.y, -JUMP_SPEED);
        assert!(body.flip_x);
        assert_eq!(spawns.len(), 1);
    }

    #[test]
    fn no_jump_in_mid_air() {
        let mut spawns = SpawnQueue::new();
        let mut input = InputState::default();
        input.advance(InputFrame::default().with("jump", 1.0));
        let mut player = create(0.0, 0.0).unwrap();
        let mut ctx = EntityContext::new(&mut spawns, &input, 0);
        player.update(&mut ctx, 1.0 / 60.0);
        assert_eq!(player.body().velocity.y, 0.0);
    }

    #[test]
    fn collects_and_takes_damage_with_grace_period() {
        let mut spawns = SpawnQueue::new();
        let input = InputState::default();
        let mut ctx = EntityContext::new(&mut spawns, &input, 0);
        let mut player = create(0.0, 0.0).unwrap();

        player.dispatch_collision(Some(&hit_by(PhysicsLayer::Pickup, 0)), &mut ctx);
        player.dispatch_collision(Some(&hit_by(PhysicsLayer::Enemy, 2)), &mut ctx);
        player.dispatch_collision(Some(&hit_by(PhysicsLayer::Enemy, 2)), &mut ctx);

        let state = player.behavior_as::<Player>().unwrap();
        assert_eq!(state.coins(), 1);
        assert_eq!(state.health(), HEALTH - 2);
    }

    #[test]
    fn dies_when_health_runs_out() {
        let mut spawns = SpawnQueue::new();
        let input = InputState::default();
        let mut ctx = EntityContext::new(&mut spawns, &input, 0);
        let mut player = create(0.0, 0.0).unwrap();
        player.dispatch_collision(Some(&hit_by(PhysicsLayer::EnemyProjectile, HEALTH)), &mut ctx);
        assert!(player.is_destroyed());
    }
}
