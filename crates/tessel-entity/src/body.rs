//! The shared data layout every entity kind uses.
//!
//! Kinds differ only in their [`Behavior`](crate::behavior::Behavior); the
//! spatial state, physics flags and lifecycle flags all live in [`Body`] so
//! the physics pass can treat every entity uniformly.

use serde::{Deserialize, Serialize};

use crate::layer::PhysicsLayer;

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector in world pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (+y points down).
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Construct a vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// Axis-aligned box, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Whether the interiors of `self` and `other` intersect. Touching edges
    /// do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Overlap depth along each axis (zero or negative when apart).
    pub fn overlap_depth(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }
}

// ---------------------------------------------------------------------------
// AnimationState
// ---------------------------------------------------------------------------

/// Frame-timer animation cursor.
///
/// Animation *definitions* are asset data owned elsewhere; the runtime only
/// needs to know which clip is playing and which frame is current.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    /// Name of the playing clip, if any.
    pub clip: Option<String>,
    /// Current frame index within the clip.
    pub frame: u32,
    /// Number of frames in the clip. Zero means static.
    pub frame_count: u32,
    /// Seconds each frame is shown.
    pub frame_time: f64,
    /// Time accumulated on the current frame.
    pub elapsed: f64,
    /// Whether the clip wraps around at the end.
    pub looping: bool,
}

impl AnimationState {
    /// Start `clip` from frame zero. Restarting the clip that is already
    /// playing is a no-op so per-frame calls don't pin it to frame zero.
    pub fn play(&mut self, clip: &str, frame_count: u32, frame_time: f64, looping: bool) {
        if self.clip.as_deref() == Some(clip) {
            return;
        }
        self.clip = Some(clip.to_owned());
        self.frame = 0;
        self.frame_count = frame_count;
        self.frame_time = frame_time;
        self.elapsed = 0.0;
        self.looping = looping;
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if self.frame_count <= 1 || self.frame_time <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frame_time {
            self.elapsed -= self.frame_time;
            if self.frame + 1 < self.frame_count {
                self.frame += 1;
            } else if self.looping {
                self.frame = 0;
            } else {
                self.elapsed = 0.0;
                break;
            }
        }
    }

    /// Whether a non-looping clip has reached its last frame.
    pub fn finished(&self) -> bool {
        !self.looping && self.frame_count > 0 && self.frame + 1 >= self.frame_count
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Spatial state, physics flags and lifecycle flags of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Factory type key this body was created under. Diagnostics only.
    pub kind: String,
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    /// Bounding box extent from `position`.
    pub size: Vec2,

    /// Participates in integration and collision.
    pub physics_enabled: bool,
    /// Gravity acceleration applies.
    pub gravity: bool,
    /// Blocks and is blocked by terrain and other solid bodies.
    pub solid: bool,
    /// Receive tile contacts even when not solid.
    pub notify_tile_collision: bool,
    /// Collision filter category.
    pub layer: PhysicsLayer,
    /// Projectiles treat this body as something they can hit.
    pub projectile_target: bool,
    /// Damage dealt to whatever this body touches.
    pub contact_damage: u32,

    /// Participates in update and physics.
    pub active: bool,
    /// Participates in render.
    pub visible: bool,
    destroyed: bool,
    /// Set by the physics pass when the body rests on something below it.
    pub on_ground: bool,

    /// Draw order, lower first.
    pub z_order: i32,
    /// Sprite sheet key.
    pub sprite: Option<String>,
    /// Current animation cursor.
    pub animation: AnimationState,
    /// Mirror the sprite horizontally.
    pub flip_x: bool,
}

impl Body {
    /// A visible, active body of the given size with physics off.
    pub fn new(kind: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind: kind.to_owned(),
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: Vec2::new(width, height),
            physics_enabled: false,
            gravity: false,
            solid: false,
            notify_tile_collision: false,
            layer: PhysicsLayer::Default,
            projectile_target: false,
            contact_damage: 0,
            active: true,
            visible: true,
            destroyed: false,
            on_ground: false,
            z_order: 0,
            sprite: None,
            animation: AnimationState::default(),
            flip_x: false,
        }
    }

    /// Builder: enable physics with the given gravity and solidity flags.
    pub fn with_physics(mut self, gravity: bool, solid: bool) -> Self {
        self.physics_enabled = true;
        self.gravity = gravity;
        self.solid = solid;
        self
    }

    /// Builder: set the collision layer.
    pub fn with_layer(mut self, layer: PhysicsLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Builder: set the initial velocity.
    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    /// Builder: request tile contact callbacks for a non-solid body.
    pub fn with_tile_notify(mut self) -> Self {
        self.notify_tile_collision = true;
        self
    }

    /// Builder: set the sprite key.
    pub fn with_sprite(mut self, sprite: &str) -> Self {
        self.sprite = Some(sprite.to_owned());
        self
    }

    /// The bounding box in world space.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.position,
            max: Vec2::new(self.position.x + self.size.x, self.position.y + self.size.y),
        }
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Vec2 {
        self.aabb().center()
    }

    /// Mark the body destroyed. Terminal; calling again has no effect.
    ///
    /// Returns `true` on the call that performed the transition.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Active and not destroyed.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.active && !self.destroyed
    }

    /// Live and taking part in integration/collision.
    #[inline]
    pub fn is_simulated(&self) -> bool {
        self.is_live() && self.physics_enabled
    }

    /// Visible and not destroyed.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.destroyed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_is_terminal_and_idempotent() {
        let mut body = Body::new("crate", 0.0, 0.0, 16.0, 16.0);
        assert!(body.destroy());
        let after_first = body.clone();
        assert!(!body.destroy());
        assert_eq!(body, after_first);
        assert!(!body.is_live());
        assert!(!body.is_drawable());
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Body::new("a", 0.0, 0.0, 16.0, 16.0).aabb();
        let b = Body::new("b", 16.0, 0.0, 16.0, 16.0).aabb();
        assert!(!a.overlaps(&b));
        let c = Body::new("c", 15.5, 4.0, 16.0, 16.0).aabb();
        assert!(a.overlaps(&c));
        let depth = a.overlap_depth(&c);
        assert!((depth.x - 0.5).abs() < 1e-12);
        assert!((depth.y - 12.0).abs() < 1e-12);
    }

    #[test]
    fn builder_sets_physics_flags() {
        let body = Body::new("bullet", 1.0, 2.0, 4.0, 4.0)
            .with_physics(false, false)
            .with_tile_notify()
            .with_layer(PhysicsLayer::PlayerProjectile)
            .with_velocity(300.0, 0.0);
        assert!(body.is_simulated());
        assert!(!body.solid);
        assert!(body.notify_tile_collision);
        assert_eq!(body.velocity, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn looping_animation_wraps() {
        let mut anim = AnimationState::default();
        anim.play("walk", 4, 0.1, true);
        anim.advance(0.35);
        assert_eq!(anim.frame, 3);
        anim.advance(0.1);
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn one_shot_animation_holds_last_frame() {
        let mut anim = AnimationState::default();
        anim.play("die", 3, 0.1, false);
        anim.advance(1.0);
        assert_eq!(anim.frame, 2);
        assert!(anim.finished());
    }

    #[test]
    fn replaying_current_clip_keeps_frame() {
        let mut anim = AnimationState::default();
        anim.play("walk", 4, 0.1, true);
        anim.advance(0.15);
        anim.play("walk", 4, 0.1, true);
        assert_eq!(anim.frame, 1);
    }
}
