use crate::core::Layout;
use crate::trace::SceneBuffers;

use super::backend::RenderBackend;
use super::bindings::Binding;
use super::buffers::SceneStorage;
use super::ctx::{RenderCtx, RenderTarget};
use super::error::RenderError;
use super::plan::{FramePass, FramePlan};
use super::programs::{FullscreenProgram, TracerProgram};
use super::targets::{check_completeness, RenderTargets, TargetCaps};
use super::uniforms::TraceUniforms;

/// `RenderBackend` over a wgpu device.
///
/// Every GPU object sits in an `Option`: `None` means "not created yet" or
/// "released". Bind groups are rebuilt lazily after targets, buffers or the
/// tracer change.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    caps: TargetCaps,
    surface_format: wgpu::TextureFormat,

    targets: Option<RenderTargets>,
    storage: Option<SceneStorage>,
    uniforms: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    tracer: Option<TracerProgram>,
    bloom: Option<FullscreenProgram>,
    quad: Option<FullscreenProgram>,

    tracer_group: Option<wgpu::BindGroup>,
    bloom_group: Option<wgpu::BindGroup>,
    quad_group: Option<wgpu::BindGroup>,
}

impl WgpuBackend {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            caps: TargetCaps::query(ctx.adapter, ctx.device),
            surface_format: ctx.surface_format,
            targets: None,
            storage: None,
            uniforms: None,
            sampler: None,
            tracer: None,
            bloom: None,
            quad: None,
            tracer_group: None,
            bloom_group: None,
            quad_group: None,
        }
    }

    /// Creates the objects that never depend on layout or scene.
    fn ensure_fixed(&mut self) -> Result<(), RenderError> {
        if self.bloom.is_none() {
            self.bloom = Some(FullscreenProgram::bloom(&self.device)?);
        }
        if self.quad.is_none() {
            self.quad = Some(FullscreenProgram::quad(&self.device, self.surface_format)?);
        }
        if self.uniforms.is_none() {
            self.uniforms = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("raylume trace uniforms"),
                size: std::mem::size_of::<TraceUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if self.sampler.is_none() {
            self.sampler = Some(self.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("raylume composite sampler"),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            }));
        }
        Ok(())
    }

    fn ensure_bind_groups(&mut self) {
        let Some(targets) = self.targets.as_ref() else { return };

        if self.tracer_group.is_none()
            && let (Some(tracer), Some(storage), Some(uniforms)) =
                (self.tracer.as_ref(), self.storage.as_ref(), self.uniforms.as_ref())
        {
            let slot = |b: Binding| tracer.bindings.slot(b);
            self.tracer_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("raylume tracer bind group"),
                layout: &tracer.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Frame),
                        resource: wgpu::BindingResource::TextureView(&targets.frame_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Spheres),
                        resource: storage.spheres.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Triangles),
                        resource: storage.triangles.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Models),
                        resource: storage.models.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Bounds),
                        resource: storage.bounds.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Surfaces),
                        resource: storage.surfaces.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::Uniforms),
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: slot(Binding::SurfaceIds),
                        resource: storage.surface_ids.buffer.as_entire_binding(),
                    },
                ],
            }));
        }

        if self.bloom_group.is_none()
            && let Some(bloom) = self.bloom.as_ref()
        {
            self.bloom_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("raylume bloom bind group"),
                layout: &bloom.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.frame_view),
                }],
            }));
        }

        if self.quad_group.is_none()
            && let (Some(quad), Some(sampler)) = (self.quad.as_ref(), self.sampler.as_ref())
        {
            self.quad_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("raylume quad bind group"),
                layout: &quad.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&targets.composite_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            }));
        }
    }
}

impl RenderBackend for WgpuBackend {
    type Target<'a> = RenderTarget<'a>;

    fn allocate_targets(&mut self, layout: Layout) -> Result<(), RenderError> {
        check_completeness(layout, &self.caps)?;
        self.ensure_fixed()?;

        self.targets = Some(RenderTargets::new(&self.device, layout));
        self.tracer_group = None;
        self.bloom_group = None;
        self.quad_group = None;

        log::debug!("allocated render targets {}x{}", layout.width, layout.height);
        Ok(())
    }

    fn upload_scene(&mut self, scene: &SceneBuffers) {
        self.storage = Some(SceneStorage::upload(&self.device, scene));
        self.tracer_group = None;
    }

    fn compile_tracer(&mut self, source: &str) -> Result<(), RenderError> {
        let program = TracerProgram::compile(&self.device, source)?;
        self.tracer = Some(program);
        self.tracer_group = None;
        Ok(())
    }

    fn encode(&mut self, target: &mut RenderTarget<'_>, plan: &FramePlan) {
        if let (Some(u), Some(buffer)) = (plan.uniforms.as_ref(), self.uniforms.as_ref()) {
            self.queue.write_buffer(buffer, 0, bytemuck::bytes_of(u));
        }

        self.ensure_bind_groups();

        for pass in &plan.passes {
            match pass {
                FramePass::Dispatch { workgroups } => {
                    let (Some(tracer), Some(group)) = (self.tracer.as_ref(), self.tracer_group.as_ref()) else {
                        log::warn!("skipping dispatch: tracer not bound");
                        continue;
                    };

                    let mut cpass = target.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some("raylume trace pass"),
                        timestamp_writes: None,
                    });
                    cpass.set_pipeline(&tracer.pipeline);
                    cpass.set_bind_group(0, group, &[]);
                    cpass.dispatch_workgroups(workgroups[0], workgroups[1], workgroups[2]);
                }

                // The compute pass has ended; wgpu orders the storage writes
                // before the next pass samples the frame image.
                FramePass::StorageBarrier => {}

                FramePass::ClearOffscreen { color } => {
                    let Some(targets) = self.targets.as_ref() else { continue };
                    let [r, g, b, a] = color.map(f64::from);
                    let _rpass = begin_pass(
                        target.encoder,
                        &targets.composite_view,
                        wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        "raylume offscreen clear",
                    );
                }

                FramePass::Bloom => {
                    let (Some(targets), Some(bloom), Some(group)) =
                        (self.targets.as_ref(), self.bloom.as_ref(), self.bloom_group.as_ref())
                    else {
                        continue;
                    };
                    let mut rpass = begin_pass(
                        target.encoder,
                        &targets.composite_view,
                        wgpu::LoadOp::Load,
                        "raylume bloom pass",
                    );
                    rpass.set_pipeline(&bloom.pipeline);
                    rpass.set_bind_group(0, group, &[]);
                    rpass.draw(0..3, 0..1);
                }

                FramePass::Composite => {
                    let (Some(quad), Some(group)) = (self.quad.as_ref(), self.quad_group.as_ref()) else {
                        continue;
                    };
                    let mut rpass = begin_pass(
                        target.encoder,
                        target.surface_view,
                        wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        "raylume composite pass",
                    );
                    rpass.set_pipeline(&quad.pipeline);
                    rpass.set_bind_group(0, group, &[]);
                    rpass.draw(0..3, 0..1);
                }
            }
        }
    }

    fn release(&mut self) {
        self.tracer_group = None;
        self.bloom_group = None;
        self.quad_group = None;
        self.tracer = None;
        self.bloom = None;
        self.quad = None;
        self.targets = None;
        self.storage = None;
        self.uniforms = None;
        self.sampler = None;
    }
}

fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}
