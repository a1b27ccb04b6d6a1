use crate::core::Layout;

use super::uniforms::TraceUniforms;

/// Tracer workgroup edge, matching `@workgroup_size(8, 8, 1)` in the kernel.
pub const WORKGROUP_SIZE: u32 = 8;

/// Workgroup counts giving one invocation per pixel; edge invocations past
/// the image bail out in the kernel.
pub fn workgroups_for(layout: Layout) -> [u32; 3] {
    [
        layout.width.div_ceil(WORKGROUP_SIZE),
        layout.height.div_ceil(WORKGROUP_SIZE),
        1,
    ]
}

/// One step of a frame, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum FramePass {
    /// Run the tracer into the frame image.
    Dispatch { workgroups: [u32; 3] },
    /// Tracer storage writes become visible to sampling passes.
    StorageBarrier,
    ClearOffscreen { color: [f32; 4] },
    /// Frame image → offscreen composite.
    Bloom,
    /// Offscreen composite → window surface.
    Composite,
}

/// Passes recorded by the orchestrator for the backend to encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub passes: Vec<FramePass>,
    pub uniforms: Option<TraceUniforms>,
    pub overlay: Vec<String>,
}

impl FramePlan {
    pub fn clear(&mut self) {
        self.passes.clear();
        self.uniforms = None;
        self.overlay.clear();
    }

    pub fn push(&mut self, pass: FramePass) {
        self.passes.push(pass);
    }

    pub fn dispatch(&self) -> Option<[u32; 3]> {
        self.passes.iter().find_map(|p| match p {
            FramePass::Dispatch { workgroups } => Some(*workgroups),
            _ => None,
        })
    }
}
