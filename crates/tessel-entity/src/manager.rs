//! The authoritative collection of live entities.
//!
//! [`EntityManager`] owns every entity it holds. Storage is a generational slot
//! arena; membership is tracked in two ordered partitions so that passes that
//! only care about projectiles don't have to scan everything.
//!
//! # Mutation rules
//!
//! - `add` / `add_projectile` / `spawn` / `spawn_named` only *queue*. Queued
//!   entities become live in [`flush_pending`](EntityManager::flush_pending),
//!   which the frame driver calls once at the start of each frame.
//! - Destruction is a flag on the body. [`remove_destroyed`](EntityManager::remove_destroyed)
//!   evicts flagged entities once per frame, after all collision dispatch.
//! - Iteration hands out `&mut Entity` together with the pending queue, never
//!   the collection itself, so a pass cannot insert or remove structurally
//!   while it is running.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::body::Body;
use crate::entity::Entity;
use crate::factory::EntityFactory;
use crate::id::{EntityId, SlotAllocator};
use crate::spawn::{Placement, SpawnQueue, SpawnRequest};

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// Which ordered membership list an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Characters, pickups, props.
    General,
    /// Short-lived shots.
    Projectile,
}

// ---------------------------------------------------------------------------
// FlushReport
// ---------------------------------------------------------------------------

/// Outcome of one [`EntityManager::flush_pending`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entities that became live.
    pub spawned: usize,
    /// Named requests the factory could not satisfy.
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// EntityManager
// ---------------------------------------------------------------------------

struct Slot {
    id: EntityId,
    partition: Partition,
    entity: Entity,
}

/// Owns live entities, queues new ones, sweeps destroyed ones.
#[derive(Default)]
pub struct EntityManager {
    allocator: SlotAllocator,
    slots: Vec<Option<Slot>>,
    general: Vec<EntityId>,
    projectiles: Vec<EntityId>,
    pending: SpawnQueue,
}

impl EntityManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    // -- queueing -----------------------------------------------------------

    /// Queue `entity` for the general partition.
    pub fn add(&mut self, entity: Entity) {
        self.pending.add(entity);
    }

    /// Queue `entity` for the projectile partition.
    pub fn add_projectile(&mut self, entity: Entity) {
        self.pending.add_projectile(entity);
    }

    /// Queue `entity`; its `init` hook chooses the partition.
    pub fn spawn(&mut self, entity: Entity) {
        self.pending.spawn(entity);
    }

    /// Queue a factory construction resolved at the next flush.
    pub fn spawn_named(&mut self, type_key: &str, x: f64, y: f64) {
        self.pending.spawn_named(type_key, x, y);
    }

    /// The pending queue.
    pub fn pending_mut(&mut self) -> &mut SpawnQueue {
        &mut self.pending
    }

    /// Number of queued spawn requests.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // -- frame boundaries ---------------------------------------------------

    /// Make every queued entity live, in queue order.
    ///
    /// Named requests are built through `factory`; a request the factory
    /// cannot satisfy is skipped. Entities queued by `init` hooks during the
    /// flush wait for the next one.
    pub fn flush_pending(&mut self, factory: &EntityFactory) -> FlushReport {
        let mut report = FlushReport::default();
        let requests: Vec<SpawnRequest> = self.pending.drain().collect();
        for request in requests {
            let (mut entity, placement) = match request {
                SpawnRequest::Entity { entity, placement } => (entity, placement),
                SpawnRequest::Named { type_key, x, y } => match factory.create(&type_key, x, y) {
                    Some(entity) => (entity, Placement::Auto),
                    None => {
                        report.failed += 1;
                        continue;
                    }
                },
            };

            let chosen = entity.init();
            let partition = match placement {
                Placement::General => Partition::General,
                Placement::Projectile => Partition::Projectile,
                Placement::Auto => chosen,
            };
            let id = self.insert(entity, partition);
            debug!(entity = %id, partition = ?partition, "entity became live");
            report.spawned += 1;
        }
        report
    }

    /// Evict every entity whose body is flagged destroyed, releasing its slot.
    ///
    /// Returns the number of entities evicted.
    pub fn remove_destroyed(&mut self) -> usize {
        let Self {
            allocator,
            slots,
            general,
            projectiles,
            ..
        } = self;

        let mut evicted = 0;
        for list in [general, projectiles] {
            list.retain(|&id| {
                let idx = id.index() as usize;
                let destroyed = slots[idx]
                    .as_ref()
                    .is_some_and(|slot| slot.entity.is_destroyed());
                if destroyed {
                    slots[idx] = None;
                    allocator.release(id);
                    evicted += 1;
                }
                !destroyed
            });
        }
        if evicted > 0 {
            debug!(evicted, "swept destroyed entities");
        }
        evicted
    }

    // -- iteration ----------------------------------------------------------

    /// Visit every entity of `partition` that is not flagged destroyed at the
    /// moment it is reached.
    ///
    /// The callback may flag entities destroyed and queue spawns; queued
    /// entities are not visited by this pass.
    pub fn for_each_mut<F>(&mut self, partition: Partition, mut f: F)
    where
        F: FnMut(EntityId, &mut Entity, &mut SpawnQueue),
    {
        let Self {
            slots,
            general,
            projectiles,
            pending,
            ..
        } = self;
        let list = match partition {
            Partition::General => general,
            Partition::Projectile => projectiles,
        };
        for &id in list.iter() {
            if let Some(Some(slot)) = slots.get_mut(id.index() as usize) {
                if slot.entity.is_destroyed() {
                    continue;
                }
                f(id, &mut slot.entity, pending);
            }
        }
    }

    /// Live ids in canonical order: general partition, then projectiles,
    /// each in insertion order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.general
            .iter()
            .chain(self.projectiles.iter())
            .copied()
            .collect()
    }

    /// Ids of one partition in insertion order.
    pub fn partition_ids(&self, partition: Partition) -> &[EntityId] {
        match partition {
            Partition::General => &self.general,
            Partition::Projectile => &self.projectiles,
        }
    }

    /// `(id, entity)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.general
            .iter()
            .chain(self.projectiles.iter())
            .filter_map(move |&id| self.get(id).map(|e| (id, e)))
    }

    /// `(id, body)` pairs in canonical order.
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Body)> + '_ {
        self.iter().map(|(id, e)| (id, e.body()))
    }

    // -- lookup -------------------------------------------------------------

    /// The entity in slot `id`, destroyed-flagged or not.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slot(id).map(|s| &s.entity)
    }

    /// Mutable access to the entity in slot `id`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slot_mut(id).map(|s| &mut s.entity)
    }

    /// The entity in slot `id` together with the pending queue, for running a
    /// hook that may spawn.
    pub fn entity_and_queue_mut(&mut self, id: EntityId) -> Option<(&mut Entity, &mut SpawnQueue)> {
        let Self { slots, pending, .. } = self;
        let slot = slots.get_mut(id.index() as usize)?.as_mut()?;
        if slot.id != id {
            return None;
        }
        Some((&mut slot.entity, pending))
    }

    /// Whether `id` is in the collection (it may be flagged destroyed).
    pub fn contains(&self, id: EntityId) -> bool {
        self.slot(id).is_some()
    }

    /// Partition of `id`, if present.
    pub fn partition_of(&self, id: EntityId) -> Option<Partition> {
        self.slot(id).map(|s| s.partition)
    }

    /// Number of entities in the collection, both partitions.
    pub fn len(&self) -> usize {
        self.general.len() + self.projectiles.len()
    }

    /// Whether the collection holds nothing (queued entities don't count).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities in the general partition.
    pub fn general_len(&self) -> usize {
        self.general.len()
    }

    /// Entities in the projectile partition.
    pub fn projectile_len(&self) -> usize {
        self.projectiles.len()
    }

    /// Drop every live and queued entity without running teardown. Slots are
    /// released, so ids held from before the clear read as stale.
    pub fn clear(&mut self) {
        let ids = self.ids();
        for &id in &ids {
            self.allocator.release(id);
        }
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.general.clear();
        self.projectiles.clear();
        let dropped_pending = self.pending.len();
        self.pending = SpawnQueue::new();
        if dropped_pending > 0 {
            warn!(dropped_pending, "queued spawns discarded by clear");
        }
        debug!(count = ids.len(), "entity manager cleared");
    }

    // -- internal helpers ---------------------------------------------------

    fn insert(&mut self, entity: Entity, partition: Partition) -> EntityId {
        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(Slot {
            id,
            partition,
            entity,
        });
        match partition {
            Partition::General => self.general.push(id),
            Partition::Projectile => self.projectiles.push(id),
        }
        id
    }

    fn slot(&self, id: EntityId) -> Option<&Slot> {
        self.slots
            .get(id.index() as usize)?
            .as_ref()
            .filter(|s| s.id == id)
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)?
            .as_mut()
            .filter(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
