use std::path::PathBuf;

use super::renderer::RendererState;

/// Failures surfaced by the frame orchestrator and its backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A render target cannot be created or attached at the requested size.
    #[error("framebuffer `{target}` is incomplete: {reason}")]
    IncompleteFramebuffer { target: &'static str, reason: String },

    /// WGSL failed to parse, validate or match the binding table.
    #[error("program `{program}` failed to compile:\n{message}")]
    Compile { program: &'static str, message: String },

    #[error("failed to read shader source {}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer is not ready (state: {0:?})")]
    NotReady(RendererState),
}

impl RenderError {
    /// Fatal errors leave the renderer unable to draw until re-initialized.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IncompleteFramebuffer { .. })
    }
}
