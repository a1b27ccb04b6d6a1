//! Offscreen render targets and their completeness check.

use crate::core::Layout;

use super::error::RenderError;

/// Compute-output image written by the tracer.
pub const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Composite target the bloom pass draws into.
pub const COMPOSITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Device capabilities relevant to target allocation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetCaps {
    pub max_dimension: u32,
    pub composite_usages: wgpu::TextureUsages,
    pub frame_usages: wgpu::TextureUsages,
}

impl TargetCaps {
    pub fn query(adapter: &wgpu::Adapter, device: &wgpu::Device) -> Self {
        Self {
            max_dimension: device.limits().max_texture_dimension_2d,
            composite_usages: adapter.get_texture_format_features(COMPOSITE_FORMAT).allowed_usages,
            frame_usages: adapter.get_texture_format_features(FRAME_FORMAT).allowed_usages,
        }
    }
}

/// Validates that both targets can be created at `layout`.
pub fn check_completeness(layout: Layout, caps: &TargetCaps) -> Result<(), RenderError> {
    if layout.is_empty() {
        return Err(RenderError::IncompleteFramebuffer {
            target: "composite",
            reason: format!("zero-sized attachment {}x{}", layout.width, layout.height),
        });
    }

    if layout.width > caps.max_dimension || layout.height > caps.max_dimension {
        return Err(RenderError::IncompleteFramebuffer {
            target: "composite",
            reason: format!(
                "{}x{} exceeds the device limit of {}",
                layout.width, layout.height, caps.max_dimension
            ),
        });
    }

    let composite = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
    if !caps.composite_usages.contains(composite) {
        return Err(RenderError::IncompleteFramebuffer {
            target: "composite",
            reason: format!("{COMPOSITE_FORMAT:?} cannot be rendered to and sampled"),
        });
    }

    let frame = wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING;
    if !caps.frame_usages.contains(frame) {
        return Err(RenderError::IncompleteFramebuffer {
            target: "frame",
            reason: format!("{FRAME_FORMAT:?} cannot be used as a storage image"),
        });
    }

    Ok(())
}

/// The two textures every frame passes through.
pub struct RenderTargets {
    pub layout: Layout,
    pub frame: wgpu::Texture,
    pub frame_view: wgpu::TextureView,
    pub composite: wgpu::Texture,
    pub composite_view: wgpu::TextureView,
}

impl RenderTargets {
    /// Creates both textures; callers run `check_completeness` first.
    pub fn new(device: &wgpu::Device, layout: Layout) -> Self {
        let size = wgpu::Extent3d {
            width: layout.width,
            height: layout.height,
            depth_or_array_layers: 1,
        };

        let frame = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("raylume frame"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let composite = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("raylume composite"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COMPOSITE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let frame_view = frame.create_view(&wgpu::TextureViewDescriptor::default());
        let composite_view = composite.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            layout,
            frame,
            frame_view,
            composite,
            composite_view,
        }
    }
}
