//! Sampled input visible to entity behavior.
//!
//! Devices are polled outside this crate; what arrives here is an
//! [`InputFrame`] of named actions. The scheduler's input band copies it into
//! the world's [`InputState`] before physics and game logic run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// InputFrame
// ---------------------------------------------------------------------------

/// One frame of sampled input: action name to value.
///
/// Buttons use `1.0` for held and are absent (or `0.0`) otherwise; axes use
/// `-1.0..=1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Action values for this frame.
    pub inputs: BTreeMap<String, f64>,
}

impl InputFrame {
    /// Builder: set `action` to `value`.
    pub fn with(mut self, action: &str, value: f64) -> Self {
        self.inputs.insert(action.to_owned(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Current and previous input frames, for edge detection.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: InputFrame,
    previous: InputFrame,
}

impl InputState {
    /// Make `frame` current, keeping the old current frame as previous.
    pub fn advance(&mut self, frame: InputFrame) {
        self.previous = std::mem::replace(&mut self.current, frame);
    }

    /// Raw value of `action` this frame.
    pub fn value(&self, action: &str) -> f64 {
        self.current.inputs.get(action).copied().unwrap_or(0.0)
    }

    /// Whether `action` is held this frame.
    pub fn is_down(&self, action: &str) -> bool {
        self.value(action) > 0.5
    }

    /// Whether `action` went from released to held this frame.
    pub fn just_pressed(&self, action: &str) -> bool {
        self.is_down(action) && self.previous.inputs.get(action).copied().unwrap_or(0.0) <= 0.5
    }

    /// `positive` minus `negative`, each read as a button.
    pub fn axis(&self, negative: &str, positive: &str) -> f64 {
        let pos = if self.is_down(positive) { 1.0 } else { 0.0 };
        let neg = if self.is_down(negative) { 1.0 } else { 0.0 };
        pos - neg
    }

    /// The current frame.
    pub fn current(&self) -> &InputFrame {
        &self.current
    }
}
