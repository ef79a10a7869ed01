//! The behavior table.
//!
//! An entity kind is a [`Behavior`] implementation paired with a [`Body`].
//! Every hook has a default, so a kind overrides only what it needs; there is
//! no inheritance chain. Kinds are made available to spawners by registering a
//! constructor with the [`EntityFactory`](crate::factory::EntityFactory).

use std::any::Any;

use crate::body::Body;
use crate::collision::CollisionInfo;
use crate::input::InputState;
use crate::manager::Partition;
use crate::render::{Color, Renderer};
use crate::spawn::SpawnQueue;

// ---------------------------------------------------------------------------
// EntityContext
// ---------------------------------------------------------------------------

/// What a hook may touch besides its own body.
///
/// Spawns go into a queue and become live at the next frame boundary. Other
/// live entities are not reachable from here.
pub struct EntityContext<'a> {
    /// Deferred spawns.
    pub spawns: &'a mut SpawnQueue,
    /// Input sampled at the start of this frame.
    pub input: &'a InputState,
    /// Index of the frame being simulated.
    pub frame: u64,
}

impl<'a> EntityContext<'a> {
    /// Bundle the pieces a hook needs.
    pub fn new(spawns: &'a mut SpawnQueue, input: &'a InputState, frame: u64) -> Self {
        Self {
            spawns,
            input,
            frame,
        }
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// Per-kind hooks.
///
/// To destroy itself a hook calls [`Body::destroy`]; `on_destroy` then runs
/// once, right after the hook returns.
pub trait Behavior {
    /// Called once when the entity becomes live. The returned partition is
    /// used when the entity was queued with [`SpawnQueue::spawn`].
    fn init(&mut self, body: &mut Body) -> Partition {
        if body.layer.is_projectile() {
            Partition::Projectile
        } else {
            Partition::General
        }
    }

    /// Per-frame game logic.
    fn on_update(
        &mut self,
        _body: &mut Body,
        _ctx: &mut EntityContext<'_>,
        _dt: f64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Describe this entity to the renderer.
    fn render(&self, body: &Body, renderer: &mut dyn Renderer) {
        draw_body(body, renderer);
    }

    /// Contact with terrain (`info.other == None`) or another entity.
    fn on_collision(
        &mut self,
        _body: &mut Body,
        _info: &CollisionInfo,
        _ctx: &mut EntityContext<'_>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Teardown, run exactly once after the body is marked destroyed.
    fn on_destroy(&mut self, _body: &mut Body, _ctx: &mut EntityContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Downcast hook for inspecting kind-specific state.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// Draw the body's sprite, or a filled box if it has none.
pub fn draw_body(body: &Body, renderer: &mut dyn Renderer) {
    match &body.sprite {
        Some(sprite) => renderer.draw_sprite(sprite, body.animation.frame, body.position, body.flip_x),
        None => renderer.draw_rect(body.position, body.size, Color::WHITE, true),
    }
}

/// A kind with no behavior of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl Behavior for Inert {}
