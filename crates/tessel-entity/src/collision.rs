//! Contact metadata handed to [`Behavior::on_collision`](crate::behavior::Behavior::on_collision).

use serde::{Deserialize, Serialize};

use crate::body::{Body, Vec2};
use crate::id::EntityId;
use crate::layer::PhysicsLayer;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which side of the *receiving* body made contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The receiver's left edge.
    Left,
    /// The receiver's right edge.
    Right,
    /// The receiver's top edge (e.g. head bump).
    Top,
    /// The receiver's bottom edge (e.g. landing).
    Bottom,
}

impl Side {
    /// The side the other party touched with.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Whether the contact is along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

// ---------------------------------------------------------------------------
// TileCoord
// ---------------------------------------------------------------------------

/// Column/row of a tile grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column.
    pub col: i64,
    /// Row.
    pub row: i64,
}

// ---------------------------------------------------------------------------
// EntitySnapshot
// ---------------------------------------------------------------------------

/// Frozen copy of the other party in an entity-entity contact.
///
/// Both snapshots of a pair are taken before either side is dispatched, so
/// what one handler does to its own body can never leak into what the other
/// handler sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Slot of the other entity.
    pub id: EntityId,
    /// Factory type key. For logging; branch on `layer` or flags instead.
    pub kind: String,
    /// Collision layer.
    pub layer: PhysicsLayer,
    /// Top-left corner at contact time.
    pub position: Vec2,
    /// Velocity at contact time.
    pub velocity: Vec2,
    /// Bounding box extent.
    pub size: Vec2,
    /// Whether the other body is solid.
    pub solid: bool,
    /// Whether projectiles treat the other body as a target.
    pub projectile_target: bool,
    /// Damage the other body deals on contact.
    pub contact_damage: u32,
}

impl EntitySnapshot {
    /// Capture `body` living in slot `id`.
    pub fn capture(id: EntityId, body: &Body) -> Self {
        Self {
            id,
            kind: body.kind.clone(),
            layer: body.layer,
            position: body.position,
            velocity: body.velocity,
            size: body.size,
            solid: body.solid,
            projectile_target: body.projectile_target,
            contact_damage: body.contact_damage,
        }
    }
}

// ---------------------------------------------------------------------------
// CollisionInfo
// ---------------------------------------------------------------------------

/// Everything a receiver gets told about one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionInfo {
    /// The entity hit, or `None` for terrain.
    pub other: Option<EntitySnapshot>,
    /// Receiver side that made contact.
    pub side: Side,
    /// Overlap depth along the contact axis before any resolution.
    pub penetration: f64,
    /// The tile hit, for terrain contacts.
    pub tile: Option<TileCoord>,
}

impl CollisionInfo {
    /// A terrain contact.
    pub fn tile(side: Side, penetration: f64, tile: TileCoord) -> Self {
        Self {
            other: None,
            side,
            penetration,
            tile: Some(tile),
        }
    }

    /// An entity contact.
    pub fn entity(other: EntitySnapshot, side: Side, penetration: f64) -> Self {
        Self {
            other: Some(other),
            side,
            penetration,
            tile: None,
        }
    }

    /// Whether the contact was with the tile grid.
    #[inline]
    pub fn is_tile(&self) -> bool {
        self.other.is_none()
    }

    /// Layer of the other entity, `None` for terrain.
    pub fn other_layer(&self) -> Option<PhysicsLayer> {
        self.other.as_ref().map(|o| o.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_and_entity_contacts_are_distinguishable() {
        let wall = CollisionInfo::tile(Side::Right, 2.0, TileCoord { col: 3, row: 1 });
        assert!(wall.is_tile());
        assert_eq!(wall.other_layer(), None);

        let body = Body::new("walker", 10.0, 20.0, 16.0, 16.0).with_layer(PhysicsLayer::Enemy);
        let hit = CollisionInfo::entity(EntitySnapshot::capture(EntityId::new(4, 0), &body), Side::Left, 1.0);
        assert!(!hit.is_tile());
        assert_eq!(hit.other_layer(), Some(PhysicsLayer::Enemy));
        assert_eq!(hit.other.as_ref().map(|o| o.kind.as_str()), Some("walker"));
    }

    #[test]
    fn opposite_sides() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Bottom.opposite(), Side::Top);
        assert!(Side::Right.is_horizontal());
        assert!(!Side::Top.is_horizontal());
    }
}
