//! Stock systems, one per priority band.
//!
//! | System | Name | Priority |
//! |---|---|---|
//! | [`InputSystem`] | `input` | [`Priority::INPUT`](crate::system::Priority::INPUT) |
//! | [`PhysicsSystem`](crate::physics::PhysicsSystem) | `physics` | [`Priority::PHYSICS`](crate::system::Priority::PHYSICS) |
//! | [`EntityUpdateSystem`] | `entities` | [`Priority::GAME_LOGIC`](crate::system::Priority::GAME_LOGIC) |
//! | [`GameStateSystem`] | `game_state` | `GAME_LOGIC + 10` |
//! | [`RenderSystem`] | `render` | [`Priority::RENDER`](crate::system::Priority::RENDER) |
//! | [`DebugSystem`] | `debug` | [`Priority::DEBUG`](crate::system::Priority::DEBUG) |

pub mod debug;
pub mod game_state;
pub mod input;
pub mod render;
pub mod update;

pub use debug::DebugSystem;
pub use game_state::{GameStateManager, GameStateSystem};
pub use input::{InputSource, InputSystem, ScriptedInput};
pub use render::RenderSystem;
pub use update::EntityUpdateSystem;
