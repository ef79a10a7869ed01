//! Collectible that disappears when the player touches it.

use std::any::Any;

use tessel_entity::behavior::{Behavior, EntityContext};
use tessel_entity::body::Body;
use tessel_entity::collision::CollisionInfo;
use tessel_entity::entity::Entity;
use tessel_entity::layer::PhysicsLayer;

/// Factory type key.
pub const TYPE_KEY: &str = "pickup";

/// Pickup state.
#[derive(Debug, Clone, Default)]
pub struct Pickup {
    collected: bool,
}

impl Pickup {
    /// Whether the player has taken it.
    pub fn collected(&self) -> bool {
        self.collected
    }
}

/// Factory constructor: a floating coin.
pub fn create(x: f64, y: f64) -> anyhow::Result<Entity> {
    let mut body = Body::new(TYPE_KEY, x, y, 8.0, 8.0)
        .with_physics(false, false)
        .with_layer(PhysicsLayer::Pickup)
        .with_sprite(TYPE_KEY);
    body.animation.play("spin", 4, 0.1, true);
    Ok(Entity::new(body, Pickup::default()))
}

impl Behavior for Pickup {
    fn on_collision(
        &mut self,
        body: &mut Body,
        info: &CollisionInfo,
        _ctx: &mut EntityContext<'_>,
    ) -> anyhow::Result<()> {
        if info.other_layer() == Some(PhysicsLayer::Player) {
            self.collected = true;
            body.destroy();
        }
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
