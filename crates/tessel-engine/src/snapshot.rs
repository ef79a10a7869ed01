//! Serializable world state with BLAKE3 hashing.
//!
//! A [`WorldSnapshot`] is a read-only copy of every live body in canonical
//! order, plus the frame counter and current input. Its hash is the BLAKE3
//! digest of its JSON encoding, so two runs that reach the same state on the
//! same frame produce the same hex string -- the basis of the determinism
//! tests.
//!
//! # What Is NOT Captured
//!
//! - **Behavior state** (kind-specific fields behind `Box<dyn Behavior>`) --
//!   not serializable. Only the shared [`Body`] is recorded.
//! - **Queued spawns** -- only their count.
//! - **Systems, factory, tile grid** -- these are setup, not state.
//!
//! Snapshots are for inspection and comparison; there is no restore.

use serde::{Deserialize, Serialize};
use tessel_entity::body::Body;
use tessel_entity::id::EntityId;
use tessel_entity::input::InputFrame;
use tessel_entity::manager::Partition;

use crate::world::World;

/// One live entity's shared data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    /// Slot id.
    pub id: EntityId,
    /// Partition it lives in.
    pub partition: Partition,
    /// The body, destroyed flag included.
    pub body: Body,
}

/// Copy of the simulation state at a frame boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Frames completed when captured.
    pub frame: u64,
    /// Whether gameplay was paused.
    pub paused: bool,
    /// Input of the last simulated frame.
    pub input: InputFrame,
    /// Live bodies in canonical order.
    pub bodies: Vec<BodyRecord>,
    /// Spawn requests waiting for the next flush.
    pub pending_spawns: usize,
}

impl WorldSnapshot {
    /// Capture `world` after `frame` completed frames.
    pub fn capture(world: &World, frame: u64) -> Self {
        let bodies = world
            .entities
            .iter()
            .map(|(id, entity)| BodyRecord {
                id,
                partition: world
                    .entities
                    .partition_of(id)
                    .unwrap_or(Partition::General),
                body: entity.body().clone(),
            })
            .collect();
        Self {
            frame,
            paused: world.paused,
            input: world.input.current().clone(),
            bodies,
            pending_spawns: world.entities.pending_len(),
        }
    }

    /// BLAKE3 hex digest (64 lowercase hex chars) of the JSON encoding.
    pub fn hash(&self) -> String {
        let json_bytes =
            serde_json::to_vec(self).expect("WorldSnapshot should always be JSON-serializable");
        blake3::hash(&json_bytes).to_hex().to_string()
    }

    /// Pretty JSON for dumps and diffs.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Record for `id`, if live.
    pub fn body(&self, id: EntityId) -> Option<&BodyRecord> {
        self.bodies.iter().find(|r| r.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_entity::entity::Entity;
    use tessel_entity::layer::PhysicsLayer;

    fn world_with(x: f64) -> World {
        let mut world = World::new();
        world.entities.add(Entity::inert(Body::new("crate", x, 0.0, 8.0, 8.0)));
        world.entities.add_projectile(Entity::inert(
            Body::new("shot", 0.0, 0.0, 2.0, 2.0).with_layer(PhysicsLayer::EnemyProjectile),
        ));
        world.entities.flush_pending(&world.factory);
        world
    }

    #[test]
    fn captures_bodies_in_canonical_order() {
        let snapshot = WorldSnapshot::capture(&world_with(4.0), 7);
        assert_eq!(snapshot.frame, 7);
        assert_eq!(snapshot.bodies.len(), 2);
        assert_eq!(snapshot.bodies[0].partition, Partition::General);
        assert_eq!(snapshot.bodies[1].partition, Partition::Projectile);
        assert!(snapshot.body(snapshot.bodies[1].id).is_some());
    }

    #[test]
    fn hash_is_stable_and_sensitive() {
        let a = WorldSnapshot::capture(&world_with(4.0), 1);
        let b = WorldSnapshot::capture(&world_with(4.0), 1);
        let c = WorldSnapshot::capture(&world_with(5.0), 1);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
        assert_ne!(a.hash(), c.hash());
        assert_ne!(a.hash(), WorldSnapshot::capture(&world_with(4.0), 2).hash());
    }

    #[test]
    fn json_round_trips() {
        let snapshot = WorldSnapshot::capture(&world_with(1.5), 3);
        let json = snapshot.to_json_pretty().unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
