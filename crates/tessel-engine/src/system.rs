//! Priority-ordered system scheduling.
//!
//! A [`System`] is a named unit with an integer [`Priority`] and optional
//! update/render hooks. The [`SystemManager`] keeps registered systems in a
//! single total order -- ascending priority, ties broken by registration
//! order -- and runs them in that order every pass:
//!
//! 1. `update` calls [`System::update`] on every enabled system that has an
//!    update hook.
//! 2. `render` calls [`System::render`] on every enabled system that has a
//!    render hook.
//!
//! A system that returns `Err` or panics is logged, recorded as a
//! [`SystemFault`] and skipped; the rest of the pass still runs.
//!
//! # Example
//!
//! ```
//! use tessel_engine::prelude::*;
//!
//! struct Score(u32);
//!
//! impl System for Score {
//!     fn name(&self) -> &str { "score" }
//!     fn priority(&self) -> Priority { Priority::GAME_LOGIC }
//!     fn update(&mut self, _world: &mut World, _dt: f64) -> anyhow::Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut systems = SystemManager::new();
//! systems.register(Box::new(Score(0))).unwrap();
//! let mut world = World::new();
//! let report = systems.update(&mut world, 1.0 / 60.0);
//! assert_eq!(report.ran(), vec!["score"]);
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tessel_entity::render::Renderer;
use tracing::{debug, error};

use crate::world::World;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Scheduling priority. Lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Input sampling.
    pub const INPUT: Priority = Priority(0);
    /// Integration and collision.
    pub const PHYSICS: Priority = Priority(100);
    /// Entity behavior and game state.
    pub const GAME_LOGIC: Priority = Priority(200);
    /// Presentation.
    pub const RENDER: Priority = Priority(300);
    /// Overlays drawn over the final frame.
    pub const DEBUG: Priority = Priority(400);

    /// A priority `delta` after `self`, for ordering within a band.
    pub const fn offset(self, delta: i32) -> Priority {
        Priority(self.0 + delta)
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// A schedulable unit.
///
/// Hooks default to no-ops. `has_update` / `has_render` tell the scheduler
/// which passes a system takes part in; a system without a hook is not even
/// called.
pub trait System {
    /// Unique name used for lookup and diagnostics.
    fn name(&self) -> &str;

    /// Position in the frame order.
    fn priority(&self) -> Priority;

    /// Whether this system takes part in the update pass.
    fn has_update(&self) -> bool {
        true
    }

    /// Whether this system takes part in the render pass.
    fn has_render(&self) -> bool {
        false
    }

    /// Advance by `dt` seconds.
    fn update(&mut self, _world: &mut World, _dt: f64) -> anyhow::Result<()> {
        Ok(())
    }

    /// Describe the current frame to `renderer`.
    fn render(&mut self, _world: &World, _renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PassReport / SystemFault
// ---------------------------------------------------------------------------

/// Which pass a fault happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// The update pass.
    Update,
    /// The render pass.
    Render,
}

/// A contained system failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemFault {
    /// Name of the failing system.
    pub system: String,
    /// Pass the failure happened in.
    pub pass: Pass,
    /// Error text or panic payload.
    pub message: String,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Wall-clock time per system that was called, in call order. Faulting
    /// systems are included.
    pub system_times: Vec<(String, Duration)>,
    /// Systems that failed during the pass.
    pub faults: Vec<SystemFault>,
}

impl PassReport {
    /// Names of the systems that were called, in order.
    pub fn ran(&self) -> Vec<&str> {
        self.system_times.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether every called system succeeded.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SystemManager
// ---------------------------------------------------------------------------

struct Registered {
    name: String,
    priority: Priority,
    sequence: u64,
    enabled: bool,
    system: Box<dyn System>,
}

/// Owns systems and runs them in priority order.
#[derive(Default)]
pub struct SystemManager {
    systems: Vec<Registered>,
    next_sequence: u64,
}

impl SystemManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `system`, enabled.
    ///
    /// It is placed after every system with a priority less than or equal to
    /// its own. Name and priority are read once here.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateSystem`] if a system with the same name is
    /// already registered; the manager is left unchanged.
    pub fn register(&mut self, system: Box<dyn System>) -> Result<(), EngineError> {
        let name = system.name().to_owned();
        if self.systems.iter().any(|s| s.name == name) {
            return Err(EngineError::DuplicateSystem(name));
        }
        let priority = system.priority();
        let at = self.systems.partition_point(|s| s.priority <= priority);
        debug!(system = %name, priority = priority.0, slot = at, "system registered");
        self.systems.insert(
            at,
            Registered {
                name,
                priority,
                sequence: self.next_sequence,
                enabled: true,
                system,
            },
        );
        self.next_sequence += 1;
        self.validate_order();
        Ok(())
    }

    /// Remove the system called `name`. Returns `false` if there was none.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(at) = self.position(name) else {
            return false;
        };
        self.systems.remove(at);
        debug!(system = %name, "system unregistered");
        self.validate_order();
        true
    }

    /// Enable or disable a system.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownSystem`] if nothing is registered under `name`.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), EngineError> {
        let at = self
            .position(name)
            .ok_or_else(|| EngineError::UnknownSystem(name.to_owned()))?;
        self.systems[at].enabled = enabled;
        debug!(system = %name, enabled, "system toggled");
        Ok(())
    }

    /// Whether `name` is registered and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.position(name).is_some_and(|at| self.systems[at].enabled)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Names in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Run the update pass.
    pub fn update(&mut self, world: &mut World, dt: f64) -> PassReport {
        let mut report = PassReport::default();
        for entry in self.systems.iter_mut() {
            if !entry.enabled || !entry.system.has_update() {
                continue;
            }
            let start = Instant::now();
            let system = &mut entry.system;
            let outcome = catch_unwind(AssertUnwindSafe(|| system.update(world, dt)));
            report.system_times.push((entry.name.clone(), start.elapsed()));
            if let Some(fault) = contain(&entry.name, Pass::Update, outcome) {
                report.faults.push(fault);
            }
        }
        report
    }

    /// Run the render pass.
    pub fn render(&mut self, world: &World, renderer: &mut dyn Renderer) -> PassReport {
        let mut report = PassReport::default();
        for entry in self.systems.iter_mut() {
            if !entry.enabled || !entry.system.has_render() {
                continue;
            }
            let start = Instant::now();
            let system = &mut entry.system;
            let outcome = catch_unwind(AssertUnwindSafe(|| system.render(world, &mut *renderer)));
            report.system_times.push((entry.name.clone(), start.elapsed()));
            if let Some(fault) = contain(&entry.name, Pass::Render, outcome) {
                report.faults.push(fault);
            }
        }
        report
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.systems.iter().position(|s| s.name == name)
    }

    /// Priority order must be total: ascending priority, then registration.
    /// Checked in debug builds only; sorted insertion maintains it.
    fn validate_order(&self) {
        for pair in self.systems.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            debug_assert!(
                (a.priority, a.sequence) < (b.priority, b.sequence),
                "system order corrupted: '{}' ({:?}) before '{}' ({:?})",
                a.name,
                a.priority,
                b.name,
                b.priority
            );
        }
    }
}

impl std::fmt::Debug for SystemManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.systems.iter().map(|s| (&s.name, s.priority.0, s.enabled)))
            .finish()
    }
}

/// Turn an `Err` or a panic into a logged fault.
fn contain(
    name: &str,
    pass: Pass,
    outcome: std::thread::Result<anyhow::Result<()>>,
) -> Option<SystemFault> {
    let message = match outcome {
        Ok(Ok(())) => return None,
        Ok(Err(e)) => format!("{e:#}"),
        Err(payload) => panic_message(payload.as_ref()),
    };
    error!(system = %name, pass = ?pass, error = %message, "system faulted; continuing frame");
    Some(SystemFault {
        system: name.to_owned(),
        pass,
        message,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_owned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tessel_entity::body::Vec2;
    use tessel_entity::render::{Color, RecordingRenderer};

    type Calls = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: String,
        priority: Priority,
        calls: Calls,
        render: bool,
        fail: Option<&'static str>,
    }

    impl Probe {
        fn boxed(name: &str, priority: i32, calls: &Calls) -> Box<Probe> {
            Box::new(Probe {
                name: name.to_owned(),
                priority: Priority(priority),
                calls: calls.clone(),
                render: false,
                fail: None,
            })
        }
    }

    impl System for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> Priority {
            self.priority
        }

        fn has_render(&self) -> bool {
            self.render
        }

        fn update(&mut self, _world: &mut World, _dt: f64) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(self.name.clone());
            match self.fail {
                Some("error") => anyhow::bail!("{} failed", self.name),
                Some(_) => panic!("{} blew up", self.name),
                None => Ok(()),
            }
        }

        fn render(&mut self, _world: &World, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
            renderer.draw_text(&self.name, Vec2::ZERO, Color::WHITE);
            Ok(())
        }
    }

    // -- 1. Ordering ----------------------------------------------------------

    #[test]
    fn runs_in_ascending_priority() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        systems.register(Probe::boxed("render", 300, &calls)).unwrap();
        systems.register(Probe::boxed("input", 0, &calls)).unwrap();
        systems.register(Probe::boxed("logic", 200, &calls)).unwrap();
        systems.register(Probe::boxed("physics", 100, &calls)).unwrap();

        systems.update(&mut World::new(), 0.016);
        assert_eq!(*calls.borrow(), vec!["input", "physics", "logic", "render"]);
        assert_eq!(systems.system_names(), vec!["input", "physics", "logic", "render"]);
    }

    #[test]
    fn ties_keep_registration_order() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        systems.register(Probe::boxed("b", 200, &calls)).unwrap();
        systems.register(Probe::boxed("a", 200, &calls)).unwrap();
        systems.register(Probe::boxed("first", 100, &calls)).unwrap();
        systems.register(Probe::boxed("c", 200, &calls)).unwrap();

        systems.update(&mut World::new(), 0.016);
        assert_eq!(*calls.borrow(), vec!["first", "b", "a", "c"]);
    }

    #[test]
    fn bands_are_ascending() {
        assert!(Priority::INPUT < Priority::PHYSICS);
        assert!(Priority::PHYSICS < Priority::GAME_LOGIC);
        assert!(Priority::GAME_LOGIC < Priority::RENDER);
        assert!(Priority::RENDER < Priority::DEBUG);
        assert_eq!(Priority::GAME_LOGIC.offset(10), Priority(210));
    }

    // -- 2. Registration ------------------------------------------------------

    #[test]
    fn duplicate_names_are_rejected() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        systems.register(Probe::boxed("physics", 100, &calls)).unwrap();
        let err = systems.register(Probe::boxed("physics", 5, &calls)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateSystem(ref n) if n == "physics"));
        assert_eq!(systems.len(), 1);

        systems.update(&mut World::new(), 0.016);
        assert_eq!(*calls.borrow(), vec!["physics"]);
    }

    #[test]
    fn unregister_is_noop_when_absent() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        systems.register(Probe::boxed("a", 1, &calls)).unwrap();
        assert!(!systems.unregister("missing"));
        assert!(systems.unregister("a"));
        assert!(systems.is_empty());
        assert!(!systems.unregister("a"));
    }

    // -- 3. Enable / disable ----------------------------------------------------

    #[test]
    fn disabled_systems_are_not_called() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        let mut probe = Probe::boxed("overlay", 400, &calls);
        probe.render = true;
        systems.register(probe).unwrap();
        systems.register(Probe::boxed("logic", 200, &calls)).unwrap();

        systems.set_enabled("overlay", false).unwrap();
        assert!(!systems.is_enabled("overlay"));

        let mut world = World::new();
        let mut renderer = RecordingRenderer::new();
        for _ in 0..3 {
            systems.update(&mut world, 0.016);
            let report = systems.render(&world, &mut renderer);
            assert!(report.ran().is_empty());
        }
        assert_eq!(*calls.borrow(), vec!["logic"; 3]);
        assert!(renderer.commands.is_empty());

        systems.set_enabled("overlay", true).unwrap();
        systems.update(&mut world, 0.016);
        assert_eq!(systems.render(&world, &mut renderer).ran(), vec!["overlay"]);
        assert!(matches!(
            systems.set_enabled("ghost", true),
            Err(EngineError::UnknownSystem(_))
        ));
    }

    #[test]
    fn systems_without_render_hook_skip_render_pass() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        systems.register(Probe::boxed("logic", 200, &calls)).unwrap();
        let report = systems.render(&World::new(), &mut RecordingRenderer::new());
        assert!(report.ran().is_empty());
    }

    // -- 4. Fault containment ---------------------------------------------------

    #[test]
    fn errors_and_panics_do_not_stop_the_pass() {
        let calls = Calls::default();
        let mut systems = SystemManager::new();
        let mut erring = Probe::boxed("erring", 100, &calls);
        erring.fail = Some("error");
        let mut panicking = Probe::boxed("panicking", 150, &calls);
        panicking.fail = Some("panic");
        systems.register(erring).unwrap();
        systems.register(panicking).unwrap();
        systems.register(Probe::boxed("after", 200, &calls)).unwrap();

        let report = systems.update(&mut World::new(), 0.016);
        assert_eq!(*calls.borrow(), vec!["erring", "panicking", "after"]);
        assert_eq!(report.ran(), vec!["erring", "panicking", "after"]);
        assert_eq!(report.faults.len(), 2);
        assert_eq!(report.faults[0].system, "erring");
        assert_eq!(report.faults[0].pass, Pass::Update);
        assert!(report.faults[1].message.contains("blew up"));

        // Faulting systems stay registered and run again next frame.
        calls.borrow_mut().clear();
        systems.update(&mut World::new(), 0.016);
        assert_eq!(calls.borrow().len(), 3);
    }
}
