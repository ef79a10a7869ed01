//! Deferred spawn requests.
//!
//! Nothing becomes live in the middle of a frame. Behavior hooks, systems and
//! setup code all push [`SpawnRequest`]s into a [`SpawnQueue`]; the manager
//! drains it at the next frame boundary.

use crate::entity::Entity;

/// Where a queued entity should be placed when it becomes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The general partition.
    General,
    /// The projectile partition.
    Projectile,
    /// Whatever the entity's own `init` hook chooses.
    Auto,
}

/// One queued spawn.
pub enum SpawnRequest {
    /// An already-constructed entity.
    Entity {
        /// The entity.
        entity: Entity,
        /// Target partition.
        placement: Placement,
    },
    /// Construct through the factory at flush time.
    Named {
        /// Factory type key.
        type_key: String,
        /// Spawn x.
        x: f64,
        /// Spawn y.
        y: f64,
    },
}

impl std::fmt::Debug for SpawnRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnRequest::Entity { entity, placement } => f
                .debug_struct("Entity")
                .field("kind", &entity.body().kind)
                .field("placement", placement)
                .finish(),
            SpawnRequest::Named { type_key, x, y } => f
                .debug_struct("Named")
                .field("type_key", type_key)
                .field("x", x)
                .field("y", y)
                .finish(),
        }
    }
}

/// FIFO of spawn requests.
#[derive(Debug, Default)]
pub struct SpawnQueue {
    requests: Vec<SpawnRequest>,
}

impl SpawnQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `entity` for the general partition.
    pub fn add(&mut self, entity: Entity) {
        self.push(SpawnRequest::Entity {
            entity,
            placement: Placement::General,
        });
    }

    /// Queue `entity` for the projectile partition.
    pub fn add_projectile(&mut self, entity: Entity) {
        self.push(SpawnRequest::Entity {
            entity,
            placement: Placement::Projectile,
        });
    }

    /// Queue `entity` and let its `init` hook pick the partition.
    pub fn spawn(&mut self, entity: Entity) {
        self.push(SpawnRequest::Entity {
            entity,
            placement: Placement::Auto,
        });
    }

    /// Queue a factory construction of `type_key` at `(x, y)`.
    pub fn spawn_named(&mut self, type_key: &str, x: f64, y: f64) {
        self.push(SpawnRequest::Named {
            type_key: type_key.to_owned(),
            x,
            y,
        });
    }

    /// Queue a prepared request.
    pub fn push(&mut self, request: SpawnRequest) {
        self.requests.push(request);
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Take every queued request in FIFO order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SpawnRequest> {
        self.requests.drain(..)
    }

    /// Move everything queued in `other` to the back of `self`.
    pub fn append(&mut self, other: &mut SpawnQueue) {
        self.requests.append(&mut other.requests);
    }
}
