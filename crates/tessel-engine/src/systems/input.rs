//! The input band.
//!
//! Device polling is the host's business. An [`InputSource`] hands over one
//! [`InputFrame`] per frame and [`InputSystem`] makes it the world's current
//! input before anything else runs.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tessel_entity::input::InputFrame;

use crate::system::{Priority, System};
use crate::world::World;

/// Supplies one input frame per simulated frame.
pub trait InputSource {
    /// Sample input for frame `frame`.
    fn poll(&mut self, frame: u64) -> InputFrame;
}

/// Queue-backed source for headless runs and tests.
///
/// Clones share the same queue, so a test can keep one handle and push
/// frames while the engine owns the other. An empty queue polls as "nothing
/// pressed".
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Rc<RefCell<VecDeque<InputFrame>>>,
}

impl ScriptedInput {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `frame` for a future poll.
    pub fn push(&self, frame: InputFrame) {
        self.frames.borrow_mut().push_back(frame);
    }

    /// Queue `frame` for the next `count` polls.
    pub fn hold(&self, frame: InputFrame, count: usize) {
        let mut frames = self.frames.borrow_mut();
        frames.extend(std::iter::repeat(frame).take(count));
    }

    /// Frames still queued.
    pub fn remaining(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _frame: u64) -> InputFrame {
        self.frames.borrow_mut().pop_front().unwrap_or_default()
    }
}

/// Copies the source's frame into [`World::input`]. Runs while paused.
pub struct InputSystem {
    source: Box<dyn InputSource>,
}

impl InputSystem {
    /// Read from `source`.
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl System for InputSystem {
    fn name(&self) -> &str {
        "input"
    }

    fn priority(&self) -> Priority {
        Priority::INPUT
    }

    fn update(&mut self, world: &mut World, _dt: f64) -> anyhow::Result<()> {
        let frame = self.source.poll(world.frame);
        world.input.advance(frame);
        Ok(())
    }
}
