//! wgpu instance, device and window surface.
//!
//! Adapter selection honours [`GpuInit`]; the surface is reconfigured on
//! resize and after `Lost`/`Outdated` errors. Offscreen targets query the
//! adapter through [`Gpu::adapter`].

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
