//! [`Entity`]: a [`Body`] plus its [`Behavior`].

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::behavior::{Behavior, EntityContext, Inert};
use crate::body::Body;
use crate::collision::CollisionInfo;
use crate::manager::Partition;
use crate::render::Renderer;

/// One simulated game object.
///
/// All hook calls go through this type so the lifecycle rules hold no matter
/// which kind is behind the behavior table:
///
/// - destroyed or inactive entities are never updated or handed collisions;
/// - `on_destroy` runs exactly once, at the first hook boundary after the
///   body's `destroyed` flag flips;
/// - a hook that returns `Err` or panics is logged and otherwise ignored, so
///   one faulty entity never stops the rest of a pass.
pub struct Entity {
    body: Body,
    behavior: Box<dyn Behavior>,
    torn_down: bool,
}

impl Entity {
    /// Pair `body` with `behavior`.
    pub fn new(body: Body, behavior: impl Behavior + 'static) -> Self {
        Self {
            body,
            behavior: Box::new(behavior),
            torn_down: false,
        }
    }

    /// Pair `body` with an already boxed behavior.
    pub fn from_boxed(body: Body, behavior: Box<dyn Behavior>) -> Self {
        Self {
            body,
            behavior,
            torn_down: false,
        }
    }

    /// An entity with no behavior.
    pub fn inert(body: Body) -> Self {
        Self::new(body, Inert)
    }

    /// Shared data.
    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Shared data, mutably.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Whether the body is flagged destroyed.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.body.is_destroyed()
    }

    /// Kind-specific state, if the behavior exposes it and is a `T`.
    pub fn behavior_as<T: 'static>(&self) -> Option<&T> {
        self.behavior.as_any()?.downcast_ref::<T>()
    }

    /// Run the `init` hook and pick a partition.
    pub(crate) fn init(&mut self) -> Partition {
        self.behavior.init(&mut self.body)
    }

    /// Run `on_update`. Returns `false` if the entity was skipped.
    pub fn update(&mut self, ctx: &mut EntityContext<'_>, dt: f64) -> bool {
        if !self.body.is_live() {
            return false;
        }
        let (behavior, body) = (&mut self.behavior, &mut self.body);
        let outcome = catch_unwind(AssertUnwindSafe(|| behavior.on_update(body, &mut *ctx, dt)));
        self.report("on_update", outcome);
        self.settle(ctx);
        true
    }

    /// Render if visible and not destroyed.
    pub fn render(&self, renderer: &mut dyn Renderer) -> bool {
        if !self.body.is_drawable() {
            return false;
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.behavior.render(&self.body, &mut *renderer);
            anyhow::Ok(())
        }));
        self.report("render", outcome);
        true
    }

    /// Hand a contact to `on_collision`.
    ///
    /// `None` is a caller bug: it is logged and nothing else happens.
    /// Returns whether the hook ran.
    pub fn dispatch_collision(
        &mut self,
        info: Option<&CollisionInfo>,
        ctx: &mut EntityContext<'_>,
    ) -> bool {
        let Some(info) = info else {
            warn!(
                kind = %self.body.kind,
                "collision dispatched without contact info; ignoring"
            );
            return false;
        };
        if !self.body.is_live() {
            return false;
        }
        let (behavior, body) = (&mut self.behavior, &mut self.body);
        let outcome = catch_unwind(AssertUnwindSafe(|| behavior.on_collision(body, info, &mut *ctx)));
        self.report("on_collision", outcome);
        self.settle(ctx);
        true
    }

    /// Destroy the entity and run its teardown. Idempotent.
    ///
    /// Returns `true` on the call that performed the transition.
    pub fn destroy(&mut self, ctx: &mut EntityContext<'_>) -> bool {
        let transitioned = self.body.destroy();
        self.settle(ctx);
        transitioned
    }

    fn settle(&mut self, ctx: &mut EntityContext<'_>) {
        if self.body.is_destroyed() && !self.torn_down {
            self.torn_down = true;
            let (behavior, body) = (&mut self.behavior, &mut self.body);
            let outcome = catch_unwind(AssertUnwindSafe(|| behavior.on_destroy(body, &mut *ctx)));
            self.report("on_destroy", outcome);
        }
    }

    fn report(&self, hook: &str, outcome: std::thread::Result<anyhow::Result<()>>) {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(kind = %self.body.kind, hook, error = %e, "entity hook failed");
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(kind = %self.body.kind, hook, error = %message, "entity hook panicked");
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("body", &self.body)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
