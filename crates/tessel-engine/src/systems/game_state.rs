//! The game-state hook.
//!
//! Menus, pause screens and level flow live outside the core behind
//! [`GameStateManager`]. The scheduler runs it like any other system, right
//! after entity logic.

use tessel_entity::render::Renderer;

use crate::system::{Priority, System};
use crate::world::World;

/// Entry points of the active game state.
pub trait GameStateManager {
    /// Advance the active state.
    fn update(&mut self, world: &mut World, dt: f64) -> anyhow::Result<()>;

    /// Draw the active state's overlay, if any.
    fn render(&mut self, _world: &World, _renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        Ok(())
    }

    /// Whether gameplay should be frozen.
    fn is_paused(&self) -> bool {
        false
    }
}

/// Adapts a [`GameStateManager`] to the scheduler and mirrors its pause flag
/// into [`World::paused`].
pub struct GameStateSystem {
    manager: Box<dyn GameStateManager>,
}

impl GameStateSystem {
    /// Wrap `manager`.
    pub fn new(manager: impl GameStateManager + 'static) -> Self {
        Self {
            manager: Box::new(manager),
        }
    }
}

impl System for GameStateSystem {
    fn name(&self) -> &str {
        "game_state"
    }

    fn priority(&self) -> Priority {
        Priority::GAME_LOGIC.offset(10)
    }

    fn has_render(&self) -> bool {
        true
    }

    fn update(&mut self, world: &mut World, dt: f64) -> anyhow::Result<()> {
        let result = self.manager.update(world, dt);
        world.paused = self.manager.is_paused();
        result
    }

    fn render(&mut self, world: &World, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        self.manager.render(world, renderer)
    }
}
