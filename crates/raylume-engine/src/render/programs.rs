//! WGSL programs: source loading, validation and pipeline creation.

use std::borrow::Cow;
use std::path::Path;

use super::bindings::BindingTable;
use super::error::RenderError;
use super::targets::COMPOSITE_FORMAT;

/// The three programs a frame runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgramKind {
    Tracer,
    Bloom,
    Quad,
}

impl ProgramKind {
    pub const fn name(self) -> &'static str {
        match self {
            ProgramKind::Tracer => "tracer",
            ProgramKind::Bloom => "bloom",
            ProgramKind::Quad => "quad",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            ProgramKind::Tracer => "raytracer.wgsl",
            ProgramKind::Bloom => "bloom.wgsl",
            ProgramKind::Quad => "quad.wgsl",
        }
    }

    pub const fn embedded_source(self) -> &'static str {
        match self {
            ProgramKind::Tracer => include_str!("shaders/raytracer.wgsl"),
            ProgramKind::Bloom => include_str!("shaders/bloom.wgsl"),
            ProgramKind::Quad => include_str!("shaders/quad.wgsl"),
        }
    }
}

/// Reads `kind` from `dir`, or returns the embedded copy when `dir` is `None`.
pub fn load_source(kind: ProgramKind, dir: Option<&Path>) -> Result<Cow<'static, str>, RenderError> {
    let Some(dir) = dir else {
        return Ok(Cow::Borrowed(kind.embedded_source()));
    };

    let path = dir.join(kind.file_name());
    std::fs::read_to_string(&path)
        .map(Cow::Owned)
        .map_err(|source| RenderError::ShaderSource { path, source })
}

/// Parses and validates WGSL before it reaches the device.
pub fn validate_wgsl(kind: ProgramKind, source: &str) -> Result<naga::Module, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| RenderError::Compile {
        program: kind.name(),
        message: err.emit_to_string(source),
    })?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
        .validate(&module)
        .map_err(|err| RenderError::Compile {
            program: kind.name(),
            message: err.as_inner().to_string(),
        })?;

    if kind == ProgramKind::Tracer {
        let has_main = module
            .entry_points
            .iter()
            .any(|ep| ep.name == "main" && ep.stage == naga::ShaderStage::Compute);
        if !has_main {
            return Err(RenderError::Compile {
                program: kind.name(),
                message: "no `@compute fn main` entry point".to_string(),
            });
        }
    }

    Ok(module)
}

/// Runs `build` inside validation and internal error scopes.
///
/// naga accepts shaders the device can still reject (resource access that
/// disagrees with the bind group layout, features the adapter lacks). Those
/// errors would otherwise reach the uncaptured handler, which panics.
fn scoped<T>(
    device: &wgpu::Device,
    kind: ProgramKind,
    build: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    let internal = device.push_error_scope(wgpu::ErrorFilter::Internal);
    let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let built = build();

    let rejected = pollster::block_on(validation.pop());
    let failed = pollster::block_on(internal.pop());
    match rejected.or(failed) {
        None => Ok(built),
        Some(err) => Err(RenderError::Compile {
            program: kind.name(),
            message: err.to_string(),
        }),
    }
}

/// Tracer compute pipeline with the binding table it was built against.
pub struct TracerProgram {
    pub pipeline: wgpu::ComputePipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bindings: BindingTable,
}

impl TracerProgram {
    pub fn compile(device: &wgpu::Device, source: &str) -> Result<Self, RenderError> {
        let module = validate_wgsl(ProgramKind::Tracer, source)?;
        let bindings = BindingTable::resolve(&module)?;
        scoped(device, ProgramKind::Tracer, || Self::build(device, source, bindings))
    }

    fn build(device: &wgpu::Device, source: &str, bindings: BindingTable) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("raylume tracer shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("raylume tracer bgl"),
            entries: &bindings.layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raylume tracer pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("raylume tracer pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            bindings,
        }
    }
}

/// Full-screen pass reading one texture: bloom (frame → composite) and
/// quad (composite → surface).
pub struct FullscreenProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FullscreenProgram {
    pub fn bloom(device: &wgpu::Device) -> Result<Self, RenderError> {
        let entries = [wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }];
        Self::build(device, ProgramKind::Bloom, &entries, COMPOSITE_FORMAT)
    }

    pub fn quad(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self, RenderError> {
        let entries = [
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ];
        Self::build(device, ProgramKind::Quad, &entries, surface_format)
    }

    fn build(
        device: &wgpu::Device,
        kind: ProgramKind,
        entries: &[wgpu::BindGroupLayoutEntry],
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        let source = kind.embedded_source();
        validate_wgsl(kind, source)?;
        scoped(device, kind, || Self::create(device, kind, source, entries, format))
    }

    fn create(
        device: &wgpu::Device,
        kind: ProgramKind,
        source: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
        format: wgpu::TextureFormat,
    ) -> Self {
        let label = format!("raylume {}", kind.name());

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&label),
            entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }
}
