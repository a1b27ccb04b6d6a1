use crate::core::Layout;

/// GPU handles lent to the renderer for one frame.
pub struct RenderCtx<'a> {
    pub device:         &'a wgpu::Device,
    pub queue:          &'a wgpu::Queue,
    pub adapter:        &'a wgpu::Adapter,
    pub surface_format: wgpu::TextureFormat,
    /// Surface extent in physical pixels.
    pub layout:         Layout,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        adapter: &'a wgpu::Adapter,
        surface_format: wgpu::TextureFormat,
        layout: Layout,
    ) -> Self {
        Self { device, queue, adapter, surface_format, layout }
    }
}

/// The encoder of the current frame and the swapchain view the composite
/// pass writes to.
pub struct RenderTarget<'a> {
    pub encoder:      &'a mut wgpu::CommandEncoder,
    pub surface_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, surface_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, surface_view }
    }
}
