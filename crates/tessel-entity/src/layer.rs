//! Physics layers and the layer interaction matrix.
//!
//! Every body carries one [`PhysicsLayer`]. Whether two bodies are tested for
//! overlap at all is decided by a symmetric [`LayerMatrix`] lookup, never by
//! inspecting what kind of entity either party is.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PhysicsLayer
// ---------------------------------------------------------------------------

/// Categorical collision tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsLayer {
    /// Untagged scenery; interacts with every layer.
    #[default]
    Default,
    /// The player character.
    Player,
    /// Hostile characters.
    Enemy,
    /// Shots fired by the player.
    PlayerProjectile,
    /// Shots fired by enemies.
    EnemyProjectile,
    /// Collectibles.
    Pickup,
    /// Moving or static platforms that behave as entities rather than tiles.
    Platform,
}

impl PhysicsLayer {
    /// Number of layers.
    pub const COUNT: usize = 7;

    /// All layers in declaration order.
    pub const ALL: [PhysicsLayer; Self::COUNT] = [
        PhysicsLayer::Default,
        PhysicsLayer::Player,
        PhysicsLayer::Enemy,
        PhysicsLayer::PlayerProjectile,
        PhysicsLayer::EnemyProjectile,
        PhysicsLayer::Pickup,
        PhysicsLayer::Platform,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Whether this is one of the projectile layers.
    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            PhysicsLayer::PlayerProjectile | PhysicsLayer::EnemyProjectile
        )
    }
}

// ---------------------------------------------------------------------------
// LayerMatrix
// ---------------------------------------------------------------------------

/// Symmetric table of which layer pairs interact.
///
/// Serialized as the list of interacting `[a, b]` pairs so configuration files
/// stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<[PhysicsLayer; 2]>", into = "Vec<[PhysicsLayer; 2]>")]
pub struct LayerMatrix {
    rows: [u8; PhysicsLayer::COUNT],
}

impl LayerMatrix {
    /// A matrix where nothing interacts.
    pub fn empty() -> Self {
        Self {
            rows: [0; PhysicsLayer::COUNT],
        }
    }

    /// Enable or disable interaction between `a` and `b` (both directions).
    pub fn set(&mut self, a: PhysicsLayer, b: PhysicsLayer, interacts: bool) -> &mut Self {
        if interacts {
            self.rows[a as usize] |= b.bit();
            self.rows[b as usize] |= a.bit();
        } else {
            self.rows[a as usize] &= !b.bit();
            self.rows[b as usize] &= !a.bit();
        }
        self
    }

    /// Whether bodies on `a` and `b` are tested against each other.
    #[inline]
    pub fn interacts(&self, a: PhysicsLayer, b: PhysicsLayer) -> bool {
        self.rows[a as usize] & b.bit() != 0
    }

    /// The interacting pairs, each listed once with `a <= b`.
    pub fn pairs(&self) -> Vec<[PhysicsLayer; 2]> {
        let mut out = Vec::new();
        for (i, &a) in PhysicsLayer::ALL.iter().enumerate() {
            for &b in &PhysicsLayer::ALL[i..] {
                if self.interacts(a, b) {
                    out.push([a, b]);
                }
            }
        }
        out
    }
}

impl Default for LayerMatrix {
    /// Player/enemy/projectile/pickup interactions of a typical action game.
    /// Projectiles never test against other projectiles.
    fn default() -> Self {
        use PhysicsLayer::*;
        let mut m = Self::empty();
        for layer in PhysicsLayer::ALL {
            m.set(Default, layer, true);
        }
        m.set(Player, Enemy, true)
            .set(Player, EnemyProjectile, true)
            .set(Player, Pickup, true)
            .set(Player, Platform, true)
            .set(Enemy, PlayerProjectile, true)
            .set(Enemy, Platform, true)
            .set(Enemy, Enemy, true);
        m
    }
}

impl From<Vec<[PhysicsLayer; 2]>> for LayerMatrix {
    fn from(pairs: Vec<[PhysicsLayer; 2]>) -> Self {
        let mut m = Self::empty();
        for [a, b] in pairs {
            m.set(a, b, true);
        }
        m
    }
}

impl From<LayerMatrix> for Vec<[PhysicsLayer; 2]> {
    fn from(m: LayerMatrix) -> Self {
        m.pairs()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
