//! Hitbox overlay and counters, drawn last.

use tessel_entity::body::Vec2;
use tessel_entity::render::{Color, Renderer};

use crate::system::{Priority, System};
use crate::world::World;

const LINE_HEIGHT: f64 = 10.0;

/// Outlines every live body and prints entity and contact counts.
///
/// Render-only. Usually registered disabled and toggled by the host.
#[derive(Debug, Default)]
pub struct DebugSystem;

impl DebugSystem {
    /// Create the system.
    pub fn new() -> Self {
        Self
    }
}

impl System for DebugSystem {
    fn name(&self) -> &str {
        "debug"
    }

    fn priority(&self) -> Priority {
        Priority::DEBUG
    }

    fn has_update(&self) -> bool {
        false
    }

    fn has_render(&self) -> bool {
        true
    }

    fn render(&mut self, world: &World, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        for (_, body) in world.entities.bodies() {
            if body.is_destroyed() {
                continue;
            }
            let color = if body.solid {
                Color::HITBOX_SOLID
            } else {
                Color::HITBOX
            };
            renderer.draw_rect(body.position, body.size, color, false);
        }

        let stats = &world.physics_stats;
        let lines = [
            format!("frame {}", world.frame),
            format!(
                "entities {} (projectiles {})",
                world.entities.len(),
                world.entities.projectile_len()
            ),
            format!(
                "contacts tile {} entity {}",
                stats.tile_contacts, stats.entity_contacts
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            renderer.draw_text(line, Vec2::new(4.0, 4.0 + i as f64 * LINE_HEIGHT), Color::WHITE);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_entity::body::Body;
    use tessel_entity::entity::Entity;
    use tessel_entity::render::{DrawCommand, RecordingRenderer};

    #[test]
    fn outlines_bodies_and_prints_counters() {
        let mut world = World::new();
        world.entities.add(Entity::inert(Body::new("wall", 0.0, 0.0, 16.0, 16.0).with_physics(false, true)));
        world.entities.add(Entity::inert(Body::new("mote", 20.0, 0.0, 2.0, 2.0)));
        world.entities.flush_pending(&world.factory);

        let mut renderer = RecordingRenderer::new();
        DebugSystem::new().render(&world, &mut renderer).unwrap();

        let rects: Vec<Color> = renderer
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { color, filled: false, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(rects, vec![Color::HITBOX_SOLID, Color::HITBOX]);
        assert!(renderer.commands.iter().any(
            |c| matches!(c, DrawCommand::Text { text, .. } if text == "entities 2 (projectiles 0)")
        ));
    }
}
