//! Raylume engine crate.
//!
//! Platform runtime (window, input, time, device) plus the ray-tracing
//! pipeline built on top of it: scene contract, geometry flattening, camera
//! and the frame orchestrator.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod scene;
pub mod trace;
pub mod camera;
pub mod render;
