//! Frame orchestrator.
//!
//! Drives `pre_render → render → post_render` once per frame and records
//! each step as a `FramePlan` that the backend encodes.

use crate::camera::{Camera, CameraInput};
use crate::core::Layout;
use crate::scene::Scene;
use crate::trace::flatten;

use super::backend::RenderBackend;
use super::config::TracerConfig;
use super::error::RenderError;
use super::plan::{workgroups_for, FramePass, FramePlan};
use super::programs::{load_source, ProgramKind};
use super::uniforms::{SceneCounts, TraceUniforms};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    PreRender,
    Rendering,
    PostRender,
    TornDown,
    /// `init` hit a fatal configuration error; nothing renders until re-init.
    Failed,
}

impl RendererState {
    /// GPU resources exist and the frame loop may run.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            RendererState::Ready | RendererState::PreRender | RendererState::Rendering | RendererState::PostRender
        )
    }
}

pub struct Renderer<B: RenderBackend> {
    backend: B,
    config: TracerConfig,
    state: RendererState,
    camera: Option<Camera>,
    layout: Layout,
    counts: SceneCounts,
    plan: FramePlan,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(backend: B, config: TracerConfig) -> Self {
        Self {
            backend,
            config,
            state: RendererState::Uninitialized,
            camera: None,
            layout: Layout::default(),
            counts: SceneCounts::default(),
            plan: FramePlan::default(),
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TracerConfig {
        &mut self.config
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Overlay lines from the most recent `render`; empty when disabled.
    pub fn overlay_lines(&self) -> &[String] {
        &self.plan.overlay
    }

    /// Allocates targets, builds the tracer, places the camera and uploads
    /// `scene`. Fatal failures leave the renderer in `Failed`.
    pub fn init(&mut self, scene: &Scene, layout: Layout) -> Result<(), RenderError> {
        if let Err(err) = self.backend.allocate_targets(layout) {
            log::error!("renderer init failed: {err}");
            self.state = RendererState::Failed;
            return Err(err);
        }

        if let Err(err) = self.build_tracer() {
            log::error!("renderer init failed: {err}");
            self.state = RendererState::Failed;
            return Err(err);
        }

        let mut camera = Camera::default();
        camera.update_dim(self.config.fov, layout);
        self.camera = Some(camera);
        self.layout = layout;

        self.upload(scene);
        self.state = RendererState::Ready;

        log::info!(
            "renderer ready at {}x{} ({} spheres, {} models)",
            layout.width,
            layout.height,
            self.counts.sphere_count,
            self.counts.model_count,
        );
        Ok(())
    }

    /// Extension point before the frame is recorded.
    pub fn pre_render(&mut self) -> Result<(), RenderError> {
        self.ensure_frame_start()?;
        self.state = RendererState::PreRender;
        Ok(())
    }

    /// Updates the camera, then records and encodes trace, barrier, clear
    /// and bloom.
    pub fn render(&mut self, dt: f32, input: &CameraInput, target: &mut B::Target<'_>) -> Result<(), RenderError> {
        self.ensure_frame_start()?;
        let Some(camera) = self.camera.as_mut() else {
            return Err(RenderError::NotReady(self.state));
        };

        camera.update(dt, input);
        camera.update_dim(self.config.fov, self.layout);

        self.plan.clear();
        self.plan.uniforms = Some(TraceUniforms::new(camera, &self.config, self.counts, rand::random::<f32>()));
        self.plan.push(FramePass::Dispatch {
            workgroups: workgroups_for(self.layout),
        });
        self.plan.push(FramePass::StorageBarrier);
        self.plan.push(FramePass::ClearOffscreen {
            color: self.config.clear_color,
        });
        self.plan.push(FramePass::Bloom);

        if self.config.overlay {
            self.plan.overlay = overlay_lines(camera);
        }

        self.backend.encode(target, &self.plan);
        self.state = RendererState::Rendering;
        Ok(())
    }

    /// Composites the offscreen target onto `target`.
    pub fn post_render(&mut self, target: &mut B::Target<'_>) -> Result<(), RenderError> {
        if self.state != RendererState::Rendering {
            return Err(RenderError::NotReady(self.state));
        }

        self.plan.passes.clear();
        self.plan.uniforms = None;
        self.plan.push(FramePass::Composite);

        self.backend.encode(target, &self.plan);
        self.state = RendererState::PostRender;
        Ok(())
    }

    /// Reallocates both targets at `layout`. An empty layout (minimized
    /// window) is ignored.
    pub fn resize(&mut self, layout: Layout) -> Result<(), RenderError> {
        if layout.is_empty() {
            log::debug!("ignoring resize to {}x{}", layout.width, layout.height);
            return Ok(());
        }

        self.layout = layout;
        if !self.state.is_live() {
            return Ok(());
        }

        if let Err(err) = self.backend.allocate_targets(layout) {
            log::error!("resize to {}x{} failed: {err}", layout.width, layout.height);
            if err.is_fatal() {
                self.state = RendererState::Failed;
            }
            return Err(err);
        }

        if let Some(camera) = self.camera.as_mut() {
            camera.update_dim(self.config.fov, layout);
        }
        Ok(())
    }

    /// Rebuilds the tracer from the configured source. On failure the
    /// previous program stays in use.
    pub fn recompile_raytracer(&mut self) -> Result<(), RenderError> {
        if !self.state.is_live() {
            return Err(RenderError::NotReady(self.state));
        }

        let result = load_source(ProgramKind::Tracer, self.config.shader_dir.as_deref())
            .and_then(|source| self.backend.compile_tracer(&source));

        match &result {
            Ok(()) => log::info!("tracer recompiled"),
            Err(err) => log::error!("tracer recompile failed, keeping previous program: {err}"),
        }
        result
    }

    /// Re-flattens and re-uploads `scene`.
    pub fn reload_scene(&mut self, scene: &Scene) -> Result<(), RenderError> {
        if !self.state.is_live() {
            return Err(RenderError::NotReady(self.state));
        }
        self.upload(scene);
        Ok(())
    }

    /// Releases every GPU object and the camera.
    pub fn teardown(&mut self) {
        if self.state == RendererState::TornDown {
            return;
        }

        self.backend.release();
        self.camera = None;
        self.counts = SceneCounts::default();
        self.plan.clear();
        self.state = RendererState::TornDown;
        log::debug!("renderer torn down");
    }

    fn ensure_frame_start(&self) -> Result<(), RenderError> {
        match self.state {
            RendererState::Ready | RendererState::PreRender | RendererState::PostRender => Ok(()),
            other => Err(RenderError::NotReady(other)),
        }
    }

    fn build_tracer(&mut self) -> Result<(), RenderError> {
        let configured = load_source(ProgramKind::Tracer, self.config.shader_dir.as_deref())
            .and_then(|source| self.backend.compile_tracer(&source));

        match configured {
            Err(err) if self.config.shader_dir.is_some() => {
                log::warn!("{err}; using the embedded tracer");
                self.backend.compile_tracer(ProgramKind::Tracer.embedded_source())
            }
            other => other,
        }
    }

    fn upload(&mut self, scene: &Scene) {
        let buffers = flatten(scene, self.config.transform_policy);
        self.counts = SceneCounts {
            light_count: buffers.light_count,
            sphere_count: buffers.sphere_count,
            model_count: buffers.model_count(),
        };
        self.backend.upload_scene(&buffers);
    }
}

fn overlay_lines(camera: &Camera) -> Vec<String> {
    let p = camera.position;
    let f = camera.front;
    vec![
        format!("Camera Pos: {:.3}, {:.3}, {:.3}", p.x, p.y, p.z),
        format!("Camera Front: {:.3}, {:.3}, {:.3}", f.x, f.y, f.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::bindings::BindingTable;
    use crate::render::programs::validate_wgsl;
    use crate::render::targets::{check_completeness, TargetCaps};
    use crate::scene::{Entity, Geometry, Material, Mesh, Transform};
    use crate::trace::SceneBuffers;
    use glam::Vec3;

    struct RecordingBackend {
        caps: TargetCaps,
        fail_compile: bool,
        layouts: Vec<Layout>,
        uploads: Vec<SceneBuffers>,
        compiled: usize,
        frames: Vec<FramePlan>,
        releases: usize,
    }

    impl Default for RecordingBackend {
        fn default() -> Self {
            Self {
                caps: TargetCaps {
                    max_dimension: 8192,
                    composite_usages: wgpu::TextureUsages::all(),
                    frame_usages: wgpu::TextureUsages::all(),
                },
                fail_compile: false,
                layouts: Vec::new(),
                uploads: Vec::new(),
                compiled: 0,
                frames: Vec::new(),
                releases: 0,
            }
        }
    }

    impl RenderBackend for RecordingBackend {
        type Target<'a> = ();

        fn allocate_targets(&mut self, layout: Layout) -> Result<(), RenderError> {
            check_completeness(layout, &self.caps)?;
            self.layouts.push(layout);
            Ok(())
        }

        fn upload_scene(&mut self, scene: &SceneBuffers) {
            self.uploads.push(scene.clone());
        }

        fn compile_tracer(&mut self, source: &str) -> Result<(), RenderError> {
            if self.fail_compile {
                return Err(RenderError::Compile {
                    program: "tracer",
                    message: "forced failure".into(),
                });
            }
            let module = validate_wgsl(ProgramKind::Tracer, source)?;
            BindingTable::resolve(&module)?;
            self.compiled += 1;
            Ok(())
        }

        fn encode(&mut self, _target: &mut (), plan: &FramePlan) {
            self.frames.push(plan.clone());
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    const HD: Layout = Layout::new(1280, 720);

    fn renderer() -> Renderer<RecordingBackend> {
        Renderer::new(RecordingBackend::default(), TracerConfig::default())
    }

    fn red_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        scene.push(Entity::new(
            "ball",
            Mesh::single("ball", Geometry::sphere(Vec3::ZERO, 1.0, Material::diffuse(Vec3::X))),
            Transform::IDENTITY,
        ));
        scene
    }

    fn frame(r: &mut Renderer<RecordingBackend>) {
        r.pre_render().unwrap();
        r.render(0.016, &CameraInput::default(), &mut ()).unwrap();
        r.post_render(&mut ()).unwrap();
    }

    #[test]
    fn frame_records_passes_in_order() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        frame(&mut r);

        let frames = &r.backend().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0].passes,
            vec![
                FramePass::Dispatch { workgroups: [160, 90, 1] },
                FramePass::StorageBarrier,
                FramePass::ClearOffscreen {
                    color: [0.9, 0.0, 0.0, 1.0]
                },
                FramePass::Bloom,
            ]
        );
        assert_eq!(frames[1].passes, vec![FramePass::Composite]);
        assert_eq!(r.state(), RendererState::PostRender);
    }

    #[test]
    fn uniforms_carry_scene_counts_and_seed() {
        let mut r = renderer();
        r.init(&red_sphere_scene(), HD).unwrap();
        frame(&mut r);

        let u = r.backend().frames[0].uniforms.unwrap();
        assert_eq!(u.sphere_count, 1);
        assert_eq!(u.model_count, 0);
        assert_eq!(u.light_count, 1);
        assert_eq!(u.void_color, [0.35, 0.6, 0.392]);
        assert!((0.0..1.0).contains(&u.seed));

        let upload = &r.backend().uploads[0];
        assert_eq!(u.light_count as u32, upload.light_count);
        assert_eq!(upload.spheres.len(), 1);
        assert_eq!(upload.surfaces[0].color, [1.0, 0.0, 0.0]);
        assert!(upload.triangles.is_empty());
        assert!(upload.models.is_empty());
    }

    #[test]
    fn empty_scene_is_renderable() {
        let mut r = renderer();
        r.init(&Scene::new(), HD).unwrap();
        assert!(r.backend().uploads[0].is_empty());

        frame(&mut r);
        let u = r.backend().frames[0].uniforms.unwrap();
        assert_eq!(u.sphere_count, 0);
        assert_eq!(u.light_count, 1);
    }

    #[test]
    fn incomplete_framebuffer_fails_init() {
        let mut backend = RecordingBackend::default();
        backend.caps.frame_usages = wgpu::TextureUsages::TEXTURE_BINDING;
        let mut r = Renderer::new(backend, TracerConfig::default());

        let err = r.init(&Scene::demo(), HD).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(r.state(), RendererState::Failed);

        let err = r.render(0.016, &CameraInput::default(), &mut ()).unwrap_err();
        assert!(matches!(err, RenderError::NotReady(RendererState::Failed)));
        assert!(r.backend().frames.is_empty());
    }

    #[test]
    fn reinit_after_teardown_uploads_identical_buffers() {
        let scene = Scene::demo();
        let mut r = renderer();
        r.init(&scene, HD).unwrap();
        r.teardown();
        r.init(&scene, HD).unwrap();

        let uploads = &r.backend().uploads;
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0], uploads[1]);
    }

    #[test]
    fn resize_reallocates_and_updates_dim() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        r.resize(Layout::new(1920, 1080)).unwrap();

        let fov = r.config().fov;
        let dim = r.camera().unwrap().dim;
        assert_eq!(dim.y, (fov / 2.0).tan());
        assert_eq!(dim.x, (fov / 2.0).tan() * (1920.0 / 1080.0));
        assert_eq!(r.backend().layouts, vec![HD, Layout::new(1920, 1080)]);

        frame(&mut r);
        assert_eq!(r.backend().frames[0].dispatch(), Some([240, 135, 1]));
    }

    #[test]
    fn minimized_resize_is_ignored() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        r.resize(Layout::new(0, 0)).unwrap();
        assert_eq!(r.backend().layouts, vec![HD]);
    }

    #[test]
    fn failed_recompile_keeps_previous_program() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        assert_eq!(r.backend().compiled, 1);

        r.backend_mut().fail_compile = true;
        let err = r.recompile_raytracer().unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(r.backend().compiled, 1);

        frame(&mut r);
        assert_eq!(r.backend().frames.len(), 2);
    }

    #[test]
    fn recompile_from_embedded_source_succeeds() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        r.recompile_raytracer().unwrap();
        assert_eq!(r.backend().compiled, 2);
    }

    #[test]
    fn missing_shader_dir_falls_back_at_init_only() {
        let config = TracerConfig {
            shader_dir: Some(std::env::temp_dir().join("raylume-missing-shaders")),
            ..TracerConfig::default()
        };
        let mut r = Renderer::new(RecordingBackend::default(), config);
        r.init(&Scene::demo(), HD).unwrap();
        assert_eq!(r.backend().compiled, 1);

        let err = r.recompile_raytracer().unwrap_err();
        assert!(matches!(err, RenderError::ShaderSource { .. }));
        assert_eq!(r.state(), RendererState::Ready);
    }

    #[test]
    fn render_before_init_is_not_ready() {
        let mut r = renderer();
        let err = r.render(0.016, &CameraInput::default(), &mut ()).unwrap_err();
        assert!(matches!(err, RenderError::NotReady(RendererState::Uninitialized)));
    }

    #[test]
    fn recompile_after_failed_init_is_not_ready() {
        let mut backend = RecordingBackend::default();
        backend.caps.frame_usages = wgpu::TextureUsages::TEXTURE_BINDING;
        let mut r = Renderer::new(backend, TracerConfig::default());
        r.init(&Scene::demo(), HD).unwrap_err();
        let compiled = r.backend().compiled;

        let err = r.recompile_raytracer().unwrap_err();
        assert!(matches!(err, RenderError::NotReady(RendererState::Failed)));
        assert_eq!(r.backend().compiled, compiled);
    }

    #[test]
    fn post_render_requires_render() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        r.pre_render().unwrap();
        assert!(r.post_render(&mut ()).is_err());
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        r.teardown();
        r.teardown();

        assert_eq!(r.backend().releases, 1);
        assert!(r.camera().is_none());
        assert_eq!(r.state(), RendererState::TornDown);
        assert!(r.render(0.016, &CameraInput::default(), &mut ()).is_err());
    }

    #[test]
    fn overlay_reports_camera() {
        let mut r = renderer();
        r.init(&Scene::demo(), HD).unwrap();
        frame(&mut r);

        let lines = r.overlay_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Camera Pos: 0.000, 1.000, 4.000");
        assert!(lines[1].starts_with("Camera Front: "));
    }

    #[test]
    fn overlay_can_be_disabled() {
        let config = TracerConfig {
            overlay: false,
            ..TracerConfig::default()
        };
        let mut r = Renderer::new(RecordingBackend::default(), config);
        r.init(&Scene::demo(), HD).unwrap();
        frame(&mut r);
        assert!(r.overlay_lines().is_empty());
    }

    #[test]
    fn reload_scene_replaces_buffers() {
        let mut r = renderer();
        r.init(&Scene::new(), HD).unwrap();
        r.reload_scene(&red_sphere_scene()).unwrap();
        frame(&mut r);

        assert_eq!(r.backend().uploads.len(), 2);
        assert_eq!(r.backend().frames[0].uniforms.unwrap().sphere_count, 1);
    }
}
