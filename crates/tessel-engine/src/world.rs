//! The state every system operates on.

use tessel_entity::factory::EntityFactory;
use tessel_entity::input::InputState;
use tessel_entity::manager::EntityManager;

use crate::physics::PhysicsStats;
use crate::tiles::{TileGrid, TileMap};

/// Live entities plus the collaborators systems share.
///
/// Fields are public so a system can borrow disjoint parts at once, e.g. the
/// entity manager mutably while reading `input`.
pub struct World {
    /// The authoritative entity collection.
    pub entities: EntityManager,
    /// Named constructors used to resolve `spawn_named` requests.
    pub factory: EntityFactory,
    /// Input sampled by the input system this frame.
    pub input: InputState,
    /// The level's solidity grid.
    pub tiles: Box<dyn TileGrid>,
    /// Counters from the most recent physics step.
    pub physics_stats: PhysicsStats,
    /// Index of the frame being simulated.
    pub frame: u64,
    /// Gameplay is frozen: physics and entity updates are skipped.
    pub paused: bool,
}

impl World {
    /// An empty world over an empty tile map.
    pub fn new() -> Self {
        Self::with_tiles(TileMap::default())
    }

    /// An empty world over `tiles`.
    pub fn with_tiles(tiles: impl TileGrid + 'static) -> Self {
        Self {
            entities: EntityManager::new(),
            factory: EntityFactory::new(),
            input: InputState::default(),
            tiles: Box::new(tiles),
            physics_stats: PhysicsStats::default(),
            frame: 0,
            paused: false,
        }
    }

    /// Swap in a new level grid.
    pub fn set_tiles(&mut self, tiles: impl TileGrid + 'static) {
        self.tiles = Box::new(tiles);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("pending", &self.entities.pending_len())
            .field("factory", &self.factory)
            .field("frame", &self.frame)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}
