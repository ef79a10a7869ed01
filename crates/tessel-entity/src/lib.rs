//! Tessel entities -- bodies, behaviors and the entity manager.
//!
//! An [`Entity`](entity::Entity) is a [`Body`](body::Body) (the data every
//! kind shares: position, velocity, extent, physics flags, layer) paired with
//! a boxed [`Behavior`](behavior::Behavior) (the per-kind hooks). The
//! [`EntityManager`](manager::EntityManager) owns live entities in two
//! ordered partitions, defers spawns to frame boundaries and sweeps destroyed
//! entities once per frame. Kinds are created by name through the
//! [`EntityFactory`](factory::EntityFactory).
//!
//! # Quick Start
//!
//! ```
//! use tessel_entity::prelude::*;
//!
//! let mut factory = EntityFactory::new();
//! factory.register("crate", |x, y| {
//!     Ok(Entity::inert(Body::new("crate", x, y, 16.0, 16.0).with_physics(true, true)))
//! });
//!
//! let mut manager = EntityManager::new();
//! manager.spawn_named("crate", 32.0, 0.0);
//! assert!(manager.is_empty());
//!
//! let report = manager.flush_pending(&factory);
//! assert_eq!(report.spawned, 1);
//! assert_eq!(manager.general_len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod behavior;
pub mod body;
pub mod collision;
pub mod entity;
pub mod factory;
pub mod id;
pub mod input;
pub mod layer;
pub mod manager;
pub mod render;
pub mod spawn;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while constructing entities.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// No constructor is registered under this key.
    #[error("no entity factory registered for type '{0}'")]
    UnknownType(String),

    /// The constructor returned an error.
    #[error("entity factory for '{type_key}' failed: {source}")]
    ConstructionFailed {
        type_key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The constructor panicked.
    #[error("entity factory for '{0}' panicked")]
    ConstructionPanicked(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::behavior::{draw_body, Behavior, EntityContext, Inert};
    pub use crate::body::{Aabb, AnimationState, Body, Vec2};
    pub use crate::collision::{CollisionInfo, EntitySnapshot, Side, TileCoord};
    pub use crate::entity::Entity;
    pub use crate::factory::{Constructor, EntityFactory};
    pub use crate::id::EntityId;
    pub use crate::input::{InputFrame, InputState};
    pub use crate::layer::{LayerMatrix, PhysicsLayer};
    pub use crate::manager::{EntityManager, FlushReport, Partition};
    pub use crate::render::{Color, DrawCommand, RecordingRenderer, Renderer};
    pub use crate::spawn::{Placement, SpawnQueue, SpawnRequest};
    pub use crate::EntityError;
}
