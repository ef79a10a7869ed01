//! Tessel engine -- priority-ordered frame scheduler with tile and entity
//! physics.
//!
//! This crate builds on [`tessel_entity`] to provide the runtime core of a
//! tile-based 2D action game: a [`SystemManager`](system::SystemManager)
//! that runs systems in a strict priority order (input, physics, game logic,
//! render, debug), a [`PhysicsSystem`](physics::PhysicsSystem) that moves
//! bodies and dispatches tile and entity collisions, and an
//! [`Engine`](engine::Engine) that drives frames with deferred spawns and an
//! end-of-frame destroyed sweep.
//!
//! # Quick Start
//!
//! ```
//! use tessel_engine::prelude::*;
//!
//! let level = TileMap::from_rows(&[
//!     "..........",
//!     "..........",
//!     "##########",
//! ], 16.0);
//!
//! let mut engine = Engine::new(World::with_tiles(level), EngineConfig::default());
//! engine.install_default_systems().unwrap();
//! kinds::register_defaults(&mut engine.world_mut().factory);
//!
//! engine.world_mut().entities.spawn_named("player", 48.0, 0.0);
//! engine.run_frames(60);
//!
//! let (_, player) = engine.world().entities.bodies().next().unwrap();
//! assert!(player.on_ground);
//! assert_eq!(player.position.y, 12.0);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod kinds;
pub mod logging;
pub mod physics;
pub mod snapshot;
pub mod system;
pub mod systems;
pub mod tiles;
pub mod world;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the entity crate for convenience.
pub use tessel_entity;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by engine setup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A system with this name is already registered.
    #[error("system '{0}' is already registered")]
    DuplicateSystem(String),

    /// No system is registered under this name.
    #[error("no system named '{0}'")]
    UnknownSystem(String),

    /// A configuration value is out of range.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    #[error("failed to parse engine config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the entity prelude.
    pub use tessel_entity::prelude::*;

    // Engine-specific exports.
    pub use crate::config::{EngineConfig, PhysicsConfig};
    pub use crate::engine::{Engine, FrameDiagnostics};
    pub use crate::kinds;
    pub use crate::physics::{PhysicsStats, PhysicsSystem, PHYSICS_SYSTEM_NAME};
    pub use crate::snapshot::{BodyRecord, WorldSnapshot};
    pub use crate::system::{Pass, PassReport, Priority, System, SystemFault, SystemManager};
    pub use crate::systems::{
        DebugSystem, EntityUpdateSystem, GameStateManager, GameStateSystem, InputSource,
        InputSystem, RenderSystem, ScriptedInput,
    };
    pub use crate::tiles::{TileGrid, TileMap};
    pub use crate::world::World;
    pub use crate::EngineError;
}
