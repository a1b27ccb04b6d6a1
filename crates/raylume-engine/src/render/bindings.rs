//! Named slots of the tracer's bind group.

use std::num::NonZeroU64;

use super::error::RenderError;
use super::targets::FRAME_FORMAT;
use super::uniforms::TraceUniforms;

/// Resources the tracer reads or writes, in slot order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Binding {
    Frame,
    Spheres,
    Triangles,
    Models,
    Bounds,
    Surfaces,
    Uniforms,
    SurfaceIds,
}

impl Binding {
    pub const ALL: [Binding; 8] = [
        Binding::Frame,
        Binding::Spheres,
        Binding::Triangles,
        Binding::Models,
        Binding::Bounds,
        Binding::Surfaces,
        Binding::Uniforms,
        Binding::SurfaceIds,
    ];

    /// Global variable name in the tracer WGSL.
    pub const fn name(self) -> &'static str {
        match self {
            Binding::Frame => "frame",
            Binding::Spheres => "spheres",
            Binding::Triangles => "triangles",
            Binding::Models => "models",
            Binding::Bounds => "bounds",
            Binding::Surfaces => "surfaces",
            Binding::Uniforms => "uniforms",
            Binding::SurfaceIds => "surface_ids",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Binding numbers in group 0, resolved once per compiled tracer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingTable {
    slots: [u32; 8],
}

impl Default for BindingTable {
    /// Frame image 0, the five scene buffers, the uniform block at 6 and the
    /// surface lookup at 7.
    fn default() -> Self {
        Self {
            slots: [0, 1, 2, 3, 4, 5, 6, 7],
        }
    }
}

impl BindingTable {
    /// Looks up every named resource in a validated tracer module.
    pub fn resolve(module: &naga::Module) -> Result<Self, RenderError> {
        let mut slots = [u32::MAX; Binding::ALL.len()];

        for binding in Binding::ALL {
            let found = module
                .global_variables
                .iter()
                .find(|(_, var)| var.name.as_deref() == Some(binding.name()))
                .and_then(|(_, var)| var.binding.as_ref());

            let Some(rb) = found else {
                return Err(RenderError::Compile {
                    program: "tracer",
                    message: format!("missing resource binding `{}`", binding.name()),
                });
            };

            if rb.group != 0 {
                return Err(RenderError::Compile {
                    program: "tracer",
                    message: format!("`{}` must live in group 0, found group {}", binding.name(), rb.group),
                });
            }

            slots[binding.index()] = rb.binding;
        }

        Ok(Self { slots })
    }

    pub fn slot(&self, binding: Binding) -> u32 {
        self.slots[binding.index()]
    }

    /// Bind group layout entries for the tracer compute pipeline.
    pub fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        Binding::ALL
            .iter()
            .map(|&binding| wgpu::BindGroupLayoutEntry {
                binding: self.slot(binding),
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: binding_type(binding),
                count: None,
            })
            .collect()
    }
}

fn binding_type(binding: Binding) -> wgpu::BindingType {
    match binding {
        Binding::Frame => wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format: FRAME_FORMAT,
            view_dimension: wgpu::TextureViewDimension::D2,
        },
        Binding::Uniforms => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(std::mem::size_of::<TraceUniforms>() as u64),
        },
        _ => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
    }
}
