//! GPU rendering subsystem.
//!
//! `Renderer` sequences each frame; `RenderBackend` carries it out. The wgpu
//! backend owns every GPU object:
//! - six read-only storage buffers holding the flattened scene and its surface lookup
//! - the tracer uniform block
//! - the `Rgba32Float` frame image the compute kernel writes
//! - the `Rgba8Unorm` offscreen composite the bloom pass draws into
//!
//! The composite reaches the window through a full-screen quad pass.

mod backend;
mod bindings;
mod buffers;
mod config;
mod ctx;
mod error;
mod plan;
mod programs;
mod renderer;
mod targets;
mod uniforms;
mod wgpu_backend;

pub use backend::RenderBackend;
pub use bindings::{Binding, BindingTable};
pub use buffers::{storage_bytes, SceneStorage, StorageBuffer};
pub use config::{DebugKnobs, TracerConfig, OVERLAY_ENV, SHADER_DIR_ENV};
pub use ctx::{RenderCtx, RenderTarget};
pub use error::RenderError;
pub use plan::{workgroups_for, FramePass, FramePlan, WORKGROUP_SIZE};
pub use programs::{load_source, validate_wgsl, FullscreenProgram, ProgramKind, TracerProgram};
pub use renderer::{Renderer, RendererState};
pub use targets::{check_completeness, RenderTargets, TargetCaps, COMPOSITE_FORMAT, FRAME_FORMAT};
pub use uniforms::{SceneCounts, TraceUniforms};
pub use wgpu_backend::WgpuBackend;
