//! The presentation band.

use tessel_entity::entity::Entity;
use tessel_entity::render::Renderer;

use crate::system::{Priority, System};
use crate::world::World;

/// Draws every visible, non-destroyed entity, lowest `z_order` first.
/// Equal `z_order` keeps canonical entity order.
#[derive(Debug, Default)]
pub struct RenderSystem;

impl RenderSystem {
    /// Create the system.
    pub fn new() -> Self {
        Self
    }
}

impl System for RenderSystem {
    fn name(&self) -> &str {
        "render"
    }

    fn priority(&self) -> Priority {
        Priority::RENDER
    }

    fn has_update(&self) -> bool {
        false
    }

    fn has_render(&self) -> bool {
        true
    }

    fn render(&mut self, world: &World, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        let mut drawable: Vec<&Entity> = world
            .entities
            .iter()
            .map(|(_, entity)| entity)
            .filter(|entity| entity.body().is_drawable())
            .collect();
        drawable.sort_by_key(|entity| entity.body().z_order);
        for entity in drawable {
            entity.render(renderer);
        }
        Ok(())
    }
}
