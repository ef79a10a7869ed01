//! The fixed-timestep frame driver.
//!
//! The [`Engine`] owns the [`World`] and the [`SystemManager`]. Each call to
//! [`frame`](Engine::frame):
//!
//! 1. Makes every queued spawn live (spawns from frame N first take part in
//!    frame N+1).
//! 2. Runs the update pass: every enabled system in priority order.
//! 3. Sweeps entities flagged destroyed during the frame.
//! 4. Advances the frame counter.
//!
//! Rendering is a separate pass driven by the host through
//! [`render`](Engine::render).
//!
//! # Example
//!
//! ```
//! use tessel_engine::prelude::*;
//!
//! let mut engine = Engine::new(World::new(), EngineConfig::default());
//! engine.install_default_systems().unwrap();
//! kinds::register_defaults(&mut engine.world_mut().factory);
//!
//! engine.world_mut().entities.spawn_named("walker", 32.0, 0.0);
//! engine.run_frames(10);
//!
//! assert_eq!(engine.frame_count(), 10);
//! assert_eq!(engine.world().entities.len(), 1);
//! ```

use std::time::{Duration, Instant};

use tessel_entity::render::Renderer;
use tracing::debug;

use crate::config::EngineConfig;
use crate::physics::PhysicsSystem;
use crate::snapshot::WorldSnapshot;
use crate::system::{PassReport, System, SystemManager, SystemFault};
use crate::systems::{DebugSystem, EntityUpdateSystem, RenderSystem};
use crate::world::World;
use crate::EngineError;

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// What happened during the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    /// Index of the frame.
    pub frame: u64,
    /// Entities made live by the start-of-frame flush.
    pub spawned: usize,
    /// Named spawns the factory could not build.
    pub failed_spawns: usize,
    /// Entities removed by the end-of-frame sweep.
    pub evicted: usize,
    /// Per-system timings and faults of the update pass.
    pub update: PassReport,
    /// Total wall-clock time for the frame.
    pub total_time: Duration,
}

impl FrameDiagnostics {
    /// Faults raised during the update pass.
    pub fn faults(&self) -> &[SystemFault] {
        &self.update.faults
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the world and the schedule and steps them one frame at a time.
pub struct Engine {
    /// The simulated state.
    world: World,
    /// Registered systems.
    systems: SystemManager,
    /// Configuration the engine was created with.
    config: EngineConfig,
    /// Number of frames executed so far.
    frame_counter: u64,
    /// Diagnostics from the last frame.
    last_diagnostics: FrameDiagnostics,
}

impl Engine {
    /// Create an engine over `world` with no systems registered.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(world: World, config: EngineConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            world,
            systems: SystemManager::new(),
            config,
            frame_counter: 0,
            last_diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Register the stock physics, entity-update, render and debug systems.
    /// The debug overlay starts disabled.
    ///
    /// Input and game-state systems need host collaborators and are
    /// registered separately.
    pub fn install_default_systems(&mut self) -> Result<(), EngineError> {
        self.systems
            .register(Box::new(PhysicsSystem::new(self.config.physics.clone())))?;
        self.systems.register(Box::new(EntityUpdateSystem::new()))?;
        self.systems.register(Box::new(RenderSystem::new()))?;
        self.systems.register(Box::new(DebugSystem::new()))?;
        self.systems.set_enabled("debug", false)?;
        Ok(())
    }

    /// Register an additional system.
    pub fn register_system(&mut self, system: impl System + 'static) -> Result<(), EngineError> {
        self.systems.register(Box::new(system))
    }

    /// Execute one frame.
    pub fn frame(&mut self) -> &FrameDiagnostics {
        let frame_start = Instant::now();
        self.world.frame = self.frame_counter;

        let flush = self.world.entities.flush_pending(&self.world.factory);
        let update = self.systems.update(&mut self.world, self.config.fixed_dt);
        let evicted = self.world.entities.remove_destroyed();

        if flush.spawned > 0 || evicted > 0 {
            debug!(
                frame = self.frame_counter,
                spawned = flush.spawned,
                evicted,
                live = self.world.entities.len(),
                "frame boundary"
            );
        }

        self.last_diagnostics = FrameDiagnostics {
            frame: self.frame_counter,
            spawned: flush.spawned,
            failed_spawns: flush.failed,
            evicted,
            update,
            total_time: frame_start.elapsed(),
        };
        self.frame_counter += 1;
        &self.last_diagnostics
    }

    /// Run `count` frames. Returns the number of system faults across them.
    pub fn run_frames(&mut self, count: u64) -> usize {
        let mut faults = 0;
        for _ in 0..count {
            faults += self.frame().update.faults.len();
        }
        faults
    }

    /// Run the render pass. Skipped entirely in headless mode.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> PassReport {
        if self.config.headless {
            return PassReport::default();
        }
        self.systems.render(&self.world, renderer)
    }

    // -- accessors ----------------------------------------------------------

    /// The number of frames executed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Simulation time in seconds, computed as `frame_count * fixed_dt`.
    pub fn sim_time(&self) -> f64 {
        self.frame_counter as f64 * self.config.fixed_dt
    }

    /// Seconds per frame.
    pub fn fixed_dt(&self) -> f64 {
        self.config.fixed_dt
    }

    /// Whether render passes are skipped.
    pub fn is_headless(&self) -> bool {
        self.config.headless
    }

    /// Configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only world access.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access, for setup and tests.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The schedule.
    pub fn systems(&self) -> &SystemManager {
        &self.systems
    }

    /// The schedule, mutably (enable/disable, unregister).
    pub fn systems_mut(&mut self) -> &mut SystemManager {
        &mut self.systems
    }

    /// Diagnostics from the last frame.
    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world, self.frame_counter)
    }

    /// BLAKE3 hex digest of the current state.
    pub fn state_hash(&self) -> String {
        self.snapshot().hash()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("frame", &self.frame_counter)
            .field("systems", &self.systems)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Priority;
    use tessel_entity::body::Body;
    use tessel_entity::entity::Entity;
    use tessel_entity::render::RecordingRenderer;

    struct Faulty;

    impl System for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        fn priority(&self) -> Priority {
            Priority::GAME_LOGIC
        }

        fn update(&mut self, _world: &mut World, _dt: f64) -> anyhow::Result<()> {
            anyhow::bail!("always fails")
        }
    }

    // -- 1. Counters ------------------------------------------------------------

    #[test]
    fn frame_counter_and_time_advance() {
        let mut engine = Engine::new(World::new(), EngineConfig::default());
        engine.run_frames(120);
        assert_eq!(engine.frame_count(), 120);
        assert!((engine.sim_time() - 2.0).abs() < 1e-9);
        assert_eq!(engine.world().frame, 119);
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive and finite")]
    fn zero_dt_panics() {
        let _ = Engine::new(
            World::new(),
            EngineConfig {
                fixed_dt: 0.0,
                ..Default::default()
            },
        );
    }

    // -- 2. Default schedule ----------------------------------------------------

    #[test]
    fn default_systems_are_ordered() {
        let mut engine = Engine::new(World::new(), EngineConfig::default());
        engine.install_default_systems().unwrap();
        assert_eq!(
            engine.systems().system_names(),
            vec!["physics", "entities", "render", "debug"]
        );
        assert!(!engine.systems().is_enabled("debug"));
        assert!(matches!(
            engine.install_default_systems(),
            Err(EngineError::DuplicateSystem(_))
        ));
    }

    // -- 3. Frame boundaries ------------------------------------------------------

    #[test]
    fn spawns_flush_at_frame_start_and_sweep_at_end() {
        let mut engine = Engine::new(World::new(), EngineConfig::default());
        engine.world_mut().entities.add(Entity::inert(Body::new("a", 0.0, 0.0, 1.0, 1.0)));
        engine.world_mut().entities.spawn_named("ghost", 0.0, 0.0);

        let diag = engine.frame();
        assert_eq!(diag.spawned, 1);
        assert_eq!(diag.failed_spawns, 1);
        assert_eq!(diag.evicted, 0);

        let id = engine.world().entities.ids()[0];
        engine.world_mut().entities.get_mut(id).unwrap().body_mut().destroy();
        assert_eq!(engine.frame().evicted, 1);
        assert!(engine.world().entities.is_empty());
    }

    // -- 4. Faults and rendering ------------------------------------------------

    #[test]
    fn faults_are_reported_and_frames_continue() {
        let mut engine = Engine::new(World::new(), EngineConfig::default());
        engine.install_default_systems().unwrap();
        engine.register_system(Faulty).unwrap();
        assert_eq!(engine.run_frames(3), 3);
        assert_eq!(engine.frame_count(), 3);
        assert_eq!(engine.last_diagnostics().faults()[0].system, "faulty");
    }

    #[test]
    fn headless_skips_render() {
        let mut world = World::new();
        world.entities.add(Entity::inert(Body::new("a", 0.0, 0.0, 1.0, 1.0).with_sprite("a")));
        let mut engine = Engine::new(
            world,
            EngineConfig {
                headless: true,
                ..Default::default()
            },
        );
        engine.install_default_systems().unwrap();
        engine.frame();

        let mut renderer = RecordingRenderer::new();
        assert!(engine.render(&mut renderer).ran().is_empty());
        assert!(renderer.commands.is_empty());
        assert!(engine.is_headless());
    }

    #[test]
    fn render_pass_draws_live_entities() {
        let mut world = World::new();
        world.entities.add(Entity::inert(Body::new("a", 0.0, 0.0, 1.0, 1.0).with_sprite("a")));
        let mut engine = Engine::new(world, EngineConfig::default());
        engine.install_default_systems().unwrap();
        engine.frame();

        let mut renderer = RecordingRenderer::new();
        assert_eq!(engine.render(&mut renderer).ran(), vec!["render"]);
        assert_eq!(renderer.sprites(), vec!["a"]);
    }
}
