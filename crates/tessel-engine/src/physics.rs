//! Integration, tile collision and entity collision.
//!
//! The [`PhysicsSystem`] advances every simulated body (active, not destroyed,
//! `physics_enabled`) once per frame:
//!
//! 1. **Integrate.** Gravity is added to `velocity.y` (clamped to the
//!    configured fall speed), then `position += velocity * dt`.
//! 2. **Tile pass.** Solid bodies are resolved against the grid one axis at a
//!    time, x first, each blocked axis snapping the body flush to the tile
//!    edge and zeroing that velocity component. Non-solid bodies with
//!    `notify_tile_collision` are not moved; they receive at most one contact
//!    for the first solid cell they overlap.
//! 3. **Tile dispatch.** Tile contacts are handed to their bodies in
//!    canonical entity order, with `other == None`.
//! 4. **Entity pass.** Overlapping simulated pairs whose layers interact are
//!    found once by sweep-and-prune on x, from the post-integration boxes,
//!    and processed in canonical pair order. For each pair, both parties are
//!    snapshotted first; solid-solid pairs still overlapping are then pushed
//!    apart along the axis of least penetration; then `a` and `b` each
//!    receive a contact describing the other's snapshot. A push never
//!    cancels a contact that was detected.
//!
//! Handlers never remove entities. A body destroyed by its own handler stays
//! in the collection until the end-of-frame sweep, and any later pair that
//! involves it is skipped.
//!
//! Detection uses end-of-step positions; a body fast enough to cross a whole
//! tile in one frame can tunnel through it.

use serde::{Deserialize, Serialize};
use tessel_entity::behavior::EntityContext;
use tessel_entity::body::{Aabb, Body, Vec2};
use tessel_entity::collision::{CollisionInfo, EntitySnapshot, Side, TileCoord};
use tessel_entity::id::EntityId;
use tessel_entity::layer::PhysicsLayer;
use tessel_entity::manager::EntityManager;
use tracing::trace;

use crate::config::PhysicsConfig;
use crate::system::{Priority, System};
use crate::tiles::{cell_span, TileGrid};
use crate::world::World;

/// Registered name of the physics system.
pub const PHYSICS_SYSTEM_NAME: &str = "physics";

// ---------------------------------------------------------------------------
// PhysicsStats
// ---------------------------------------------------------------------------

/// Counters from one physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsStats {
    /// Bodies integrated.
    pub integrated: usize,
    /// Tile contacts handed to a live body.
    pub tile_contacts: usize,
    /// Overlapping, layer-compatible pairs found by the broad phase.
    pub candidate_pairs: usize,
    /// Pairs whose parties were both still live when processed.
    pub entity_contacts: usize,
    /// Solid-solid pairs pushed apart.
    pub separations: usize,
}

// ---------------------------------------------------------------------------
// PhysicsSystem
// ---------------------------------------------------------------------------

/// The physics pass. Runs in the [`Priority::PHYSICS`] band.
#[derive(Debug, Clone, Default)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
}

impl PhysicsSystem {
    /// Create a physics system with `config`.
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Current tunables.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Mutable tunables. Changes apply from the next step.
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Run one full step over `world`.
    pub fn step(&self, world: &mut World, dt: f64) -> PhysicsStats {
        let mut stats = PhysicsStats::default();
        let ids = world.entities.ids();

        let mut tile_contacts = Vec::new();
        for &id in &ids {
            let Some(entity) = world.entities.get_mut(id) else {
                continue;
            };
            let body = entity.body_mut();
            if !body.is_simulated() {
                continue;
            }
            let previous = integrate(body, &self.config, dt);
            stats.integrated += 1;
            for info in resolve_tiles(body, previous, world.tiles.as_ref()) {
                tile_contacts.push((id, info));
            }
        }

        for (id, info) in &tile_contacts {
            if dispatch(world, *id, info) {
                stats.tile_contacts += 1;
            }
        }

        let pairs = self.candidate_pairs(&world.entities);
        stats.candidate_pairs = pairs.len();
        for pair in &pairs {
            match self.resolve_pair(world, pair) {
                PairOutcome::Skipped => {}
                PairOutcome::Touched => stats.entity_contacts += 1,
                PairOutcome::Separated => {
                    stats.entity_contacts += 1;
                    stats.separations += 1;
                }
            }
        }

        stats
    }

    /// Broad phase: overlapping simulated pairs whose layers interact, as
    /// `(a, b)` with `a` before `b` in canonical order, sorted by that order.
    ///
    /// Side and penetration are taken here, from the boxes as they stand
    /// after integration and the tile pass. Separations applied while the
    /// pairs are processed do not change which pairs make contact.
    fn candidate_pairs(&self, entities: &EntityManager) -> Vec<PairContact> {
        struct Candidate {
            rank: usize,
            id: EntityId,
            aabb: Aabb,
            layer: PhysicsLayer,
        }

        let mut candidates: Vec<Candidate> = entities
            .bodies()
            .enumerate()
            .filter(|(_, (_, body))| body.is_simulated())
            .map(|(rank, (id, body))| Candidate {
                rank,
                id,
                aabb: body.aabb(),
                layer: body.layer,
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.aabb
                .min
                .x
                .total_cmp(&b.aabb.min.x)
                .then(a.rank.cmp(&b.rank))
        });

        let mut pairs = Vec::new();
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if b.aabb.min.x >= a.aabb.max.x {
                    break;
                }
                if !a.aabb.overlaps(&b.aabb) || !self.config.layers.interacts(a.layer, b.layer) {
                    continue;
                }
                let (first, second) = if a.rank < b.rank { (a, b) } else { (b, a) };
                let (side, penetration) = contact(&first.aabb, &second.aabb);
                pairs.push((
                    first.rank,
                    second.rank,
                    PairContact {
                        a: first.id,
                        b: second.id,
                        side,
                        penetration,
                    },
                ));
            }
        }
        pairs.sort_unstable_by_key(|&(ra, rb, _)| (ra, rb));
        pairs.into_iter().map(|(_, _, pair)| pair).collect()
    }

    fn resolve_pair(&self, world: &mut World, pair: &PairContact) -> PairOutcome {
        let PairContact {
            a,
            b,
            side,
            penetration,
        } = *pair;
        let (Some(ea), Some(eb)) = (world.entities.get(a), world.entities.get(b)) else {
            return PairOutcome::Skipped;
        };
        let (body_a, body_b) = (ea.body(), eb.body());
        if !body_a.is_simulated() || !body_b.is_simulated() {
            return PairOutcome::Skipped;
        }

        let snap_a = EntitySnapshot::capture(a, body_a);
        let snap_b = EntitySnapshot::capture(b, body_b);

        // Earlier pushes in this step may have moved either party, so the
        // push itself is measured on the current boxes.
        let push = if body_a.solid && body_b.solid {
            let (box_a, box_b) = (body_a.aabb(), body_b.aabb());
            let (share_a, share_b) = push_shares(body_a.layer, body_b.layer);
            box_a
                .overlaps(&box_b)
                .then(|| (contact(&box_a, &box_b), share_a, share_b))
        } else {
            None
        };

        if let Some(((push_side, depth), share_a, share_b)) = push {
            if let Some(entity) = world.entities.get_mut(a) {
                push_out(entity.body_mut(), push_side, depth * share_a);
            }
            if let Some(entity) = world.entities.get_mut(b) {
                push_out(entity.body_mut(), push_side.opposite(), depth * share_b);
            }
        }

        let info_a = CollisionInfo::entity(snap_b, side, penetration);
        let info_b = CollisionInfo::entity(snap_a, side.opposite(), penetration);
        dispatch(world, a, &info_a);
        dispatch(world, b, &info_b);

        if push.is_some() {
            PairOutcome::Separated
        } else {
            PairOutcome::Touched
        }
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        PHYSICS_SYSTEM_NAME
    }

    fn priority(&self) -> Priority {
        Priority::PHYSICS
    }

    fn update(&mut self, world: &mut World, dt: f64) -> anyhow::Result<()> {
        if world.paused {
            return Ok(());
        }
        world.physics_stats = self.step(world, dt);
        Ok(())
    }
}

/// An overlapping pair as detected, before any separation.
#[derive(Debug, Clone, Copy)]
struct PairContact {
    a: EntityId,
    b: EntityId,
    /// Side of `a` touching `b`.
    side: Side,
    penetration: f64,
}

enum PairOutcome {
    Skipped,
    Touched,
    Separated,
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// Apply gravity and velocity. Returns the position before the move.
fn integrate(body: &mut Body, config: &PhysicsConfig, dt: f64) -> Vec2 {
    let previous = body.position;
    if body.gravity {
        body.velocity.y = (body.velocity.y + config.gravity * dt).min(config.max_fall_speed);
    }
    body.position.x += body.velocity.x * dt;
    body.position.y += body.velocity.y * dt;
    body.on_ground = false;
    previous
}

// ---------------------------------------------------------------------------
// Tile collision
// ---------------------------------------------------------------------------

fn resolve_tiles(body: &mut Body, previous: Vec2, tiles: &dyn TileGrid) -> Vec<CollisionInfo> {
    let mut contacts = Vec::new();
    if body.solid {
        contacts.extend(block_x(body, previous, tiles));
        contacts.extend(block_y(body, previous, tiles));
    } else if body.notify_tile_collision {
        contacts.extend(first_touch(body, tiles));
    }
    contacts
}

/// First solid cell in column `col` between `rows`, top to bottom.
fn solid_in_col(tiles: &dyn TileGrid, col: i64, (r0, r1): (i64, i64)) -> Option<TileCoord> {
    (r0..=r1)
        .find(|&row| tiles.is_solid_cell(col, row))
        .map(|row| TileCoord { col, row })
}

/// First solid cell in row `row` between `cols`, left to right.
fn solid_in_row(tiles: &dyn TileGrid, row: i64, (c0, c1): (i64, i64)) -> Option<TileCoord> {
    (c0..=c1)
        .find(|&col| tiles.is_solid_cell(col, row))
        .map(|col| TileCoord { col, row })
}

/// Horizontal trial at the new x and the old y.
fn block_x(body: &mut Body, previous: Vec2, tiles: &dyn TileGrid) -> Option<CollisionInfo> {
    let dx = body.position.x - previous.x;
    if dx == 0.0 {
        return None;
    }
    let ts = tiles.tile_size();
    let (c0, c1) = cell_span(body.position.x, body.size.x, ts);
    let rows = cell_span(previous.y, body.size.y, ts);

    let (side, penetration, tile) = if dx > 0.0 {
        // Only columns the leading edge moved into.
        let lead = ((previous.x + body.size.x) / ts).floor() as i64;
        let tile = (lead.max(c0)..=c1).find_map(|col| solid_in_col(tiles, col, rows))?;
        let edge = tile.col as f64 * ts;
        let penetration = body.position.x + body.size.x - edge;
        body.position.x = edge - body.size.x;
        (Side::Right, penetration, tile)
    } else {
        let lead = (previous.x / ts).ceil() as i64 - 1;
        let tile = (c0..=lead.min(c1))
            .rev()
            .find_map(|col| solid_in_col(tiles, col, rows))?;
        let edge = (tile.col + 1) as f64 * ts;
        let penetration = edge - body.position.x;
        body.position.x = edge;
        (Side::Left, penetration, tile)
    };
    body.velocity.x = 0.0;
    Some(CollisionInfo::tile(side, penetration, tile))
}

/// Vertical trial at the resolved x and the new y.
fn block_y(body: &mut Body, previous: Vec2, tiles: &dyn TileGrid) -> Option<CollisionInfo> {
    let dy = body.position.y - previous.y;
    if dy == 0.0 {
        return None;
    }
    let ts = tiles.tile_size();
    let (r0, r1) = cell_span(body.position.y, body.size.y, ts);
    let cols = cell_span(body.position.x, body.size.x, ts);

    let (side, penetration, tile) = if dy > 0.0 {
        let lead = ((previous.y + body.size.y) / ts).floor() as i64;
        let tile = (lead.max(r0)..=r1).find_map(|row| solid_in_row(tiles, row, cols))?;
        let edge = tile.row as f64 * ts;
        let penetration = body.position.y + body.size.y - edge;
        body.position.y = edge - body.size.y;
        body.on_ground = true;
        (Side::Bottom, penetration, tile)
    } else {
        let lead = (previous.y / ts).ceil() as i64 - 1;
        let tile = (r0..=lead.min(r1))
            .rev()
            .find_map(|row| solid_in_row(tiles, row, cols))?;
        let edge = (tile.row + 1) as f64 * ts;
        let penetration = edge - body.position.y;
        body.position.y = edge;
        (Side::Top, penetration, tile)
    };
    body.velocity.y = 0.0;
    Some(CollisionInfo::tile(side, penetration, tile))
}

/// Contact for a non-solid body: the first overlapped solid cell in
/// row-major order. The body is not moved.
fn first_touch(body: &Body, tiles: &dyn TileGrid) -> Option<CollisionInfo> {
    let ts = tiles.tile_size();
    let cols = cell_span(body.position.x, body.size.x, ts);
    let (r0, r1) = cell_span(body.position.y, body.size.y, ts);
    let tile = (r0..=r1).find_map(|row| solid_in_row(tiles, row, cols))?;

    let cell = Aabb {
        min: Vec2::new(tile.col as f64 * ts, tile.row as f64 * ts),
        max: Vec2::new((tile.col + 1) as f64 * ts, (tile.row + 1) as f64 * ts),
    };
    let depth = body.aabb().overlap_depth(&cell);
    let (own, other) = (body.center(), cell.center());
    let side = if depth.x < depth.y {
        facing(body.velocity.x, own.x, other.x, Side::Left, Side::Right)
    } else {
        facing(body.velocity.y, own.y, other.y, Side::Top, Side::Bottom)
    };
    Some(CollisionInfo::tile(side, depth.x.min(depth.y), tile))
}

/// Side facing the obstacle: by direction of travel, or by relative position
/// when not moving on that axis.
fn facing(velocity: f64, own: f64, other: f64, negative: Side, positive: Side) -> Side {
    if velocity > 0.0 {
        positive
    } else if velocity < 0.0 {
        negative
    } else if own < other {
        positive
    } else {
        negative
    }
}

// ---------------------------------------------------------------------------
// Entity collision
// ---------------------------------------------------------------------------

/// Side of `a` touching `b` and the penetration along that axis.
fn contact(a: &Aabb, b: &Aabb) -> (Side, f64) {
    let depth = a.overlap_depth(b);
    let (ca, cb) = (a.center(), b.center());
    if depth.x < depth.y {
        let side = if ca.x < cb.x { Side::Right } else { Side::Left };
        (side, depth.x)
    } else {
        let side = if ca.y < cb.y { Side::Bottom } else { Side::Top };
        (side, depth.y)
    }
}

/// Fraction of the separation each party takes. Platform bodies don't move.
fn push_shares(a: PhysicsLayer, b: PhysicsLayer) -> (f64, f64) {
    match (a == PhysicsLayer::Platform, b == PhysicsLayer::Platform) {
        (true, true) => (0.0, 0.0),
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (false, false) => (0.5, 0.5),
    }
}

/// Move `body` away from whatever touches its `side` and stop it moving
/// further into it.
fn push_out(body: &mut Body, side: Side, amount: f64) {
    if amount <= 0.0 {
        return;
    }
    match side {
        Side::Right => {
            body.position.x -= amount;
            body.velocity.x = body.velocity.x.min(0.0);
        }
        Side::Left => {
            body.position.x += amount;
            body.velocity.x = body.velocity.x.max(0.0);
        }
        Side::Bottom => {
            body.position.y -= amount;
            body.velocity.y = body.velocity.y.min(0.0);
            body.on_ground = true;
        }
        Side::Top => {
            body.position.y += amount;
            body.velocity.y = body.velocity.y.max(0.0);
        }
    }
}

/// Hand `info` to entity `id` with a context over the world's queue and input.
fn dispatch(world: &mut World, id: EntityId, info: &CollisionInfo) -> bool {
    let World {
        entities,
        input,
        frame,
        ..
    } = world;
    let Some((entity, spawns)) = entities.entity_and_queue_mut(id) else {
        return false;
    };
    let mut ctx = EntityContext::new(spawns, input, *frame);
    let ran = entity.dispatch_collision(Some(info), &mut ctx);
    if ran {
        trace!(entity = %id, side = ?info.side, tile = info.is_tile(), "collision dispatched");
    }
    ran
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
