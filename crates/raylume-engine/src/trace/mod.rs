//! Geometry flattening.
//!
//! Turns the hierarchical scene (entities → meshes → sub-meshes → shapes)
//! into the flat, tightly packed arrays the compute kernel reads from its
//! storage buffers.

mod flatten;
mod gpu_types;

pub use flatten::{flatten, SceneBuffers, TransformPolicy, LIGHT_COUNT};
pub use gpu_types::{GpuBound, GpuModel, GpuSphere, GpuSurface, GpuTriangle};
