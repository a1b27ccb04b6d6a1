//! Keyboard and pointer state, independent of the windowing backend.
//!
//! `platform` turns winit events into [`InputEvent`]s; the camera reads the
//! resulting [`InputState`] and [`InputFrame`] once per redraw.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, MouseButton};
