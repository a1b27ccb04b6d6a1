//! Ray-generation camera.
//!
//! The compute kernel builds primary rays from `position`, the
//! `front`/`right`/`up` basis and the half-extents `dim`; nothing else about
//! the camera reaches the GPU.

mod controls;
mod fly;

pub use controls::CameraInput;
pub use fly::{Camera, WORLD_UP};
