use crate::core::Layout;
use crate::trace::SceneBuffers;

use super::error::RenderError;
use super::plan::FramePlan;

/// GPU operations the orchestrator sequences.
///
/// `WgpuBackend` is the real implementation; the orchestrator itself only
/// decides what happens and in which order.
pub trait RenderBackend {
    /// Where the final composite lands (the acquired surface for wgpu).
    type Target<'a>;

    /// (Re)creates the frame image and offscreen composite at `layout`.
    fn allocate_targets(&mut self, layout: Layout) -> Result<(), RenderError>;

    /// Replaces every scene buffer.
    fn upload_scene(&mut self, scene: &SceneBuffers);

    /// Builds a tracer program from WGSL. On error the current program stays.
    fn compile_tracer(&mut self, source: &str) -> Result<(), RenderError>;

    /// Encodes `plan` against `target`.
    fn encode(&mut self, target: &mut Self::Target<'_>, plan: &FramePlan);

    /// Drops every GPU object. Safe to call repeatedly.
    fn release(&mut self);
}
