use raylume_engine::camera::CameraInput;
use raylume_engine::core::{App, AppControl, FrameCtx, Layout};
use raylume_engine::input::Key;
use raylume_engine::render::{RenderError, RenderTarget, Renderer, TracerConfig, WgpuBackend};
use raylume_engine::scene::Scene;

const TITLE: &str = "raylume";

/// Interactive viewer: one window, one renderer, the demo scene.
pub struct Studio {
    config: TracerConfig,
    scene: Scene,
    renderer: Option<Renderer<WgpuBackend>>,
    title: String,
}

impl Studio {
    pub fn new(config: TracerConfig, scene: Scene) -> Self {
        Self {
            config,
            scene,
            renderer: None,
            title: TITLE.to_string(),
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let frame = ctx.input_frame;
        if frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        if frame.pressed(Key::F1) {
            let overlay = &mut renderer.config_mut().overlay;
            *overlay = !*overlay;
            log::info!("overlay {}", if *overlay { "on" } else { "off" });
        }

        if frame.pressed(Key::F5) {
            match renderer.recompile_raytracer() {
                Ok(()) => {}
                Err(RenderError::NotReady(state)) => {
                    log::warn!("tracer recompile skipped, renderer is {state:?}");
                }
                // logged by the renderer, the previous tracer stays bound
                Err(_) => {}
            }
        }

        if frame.pressed(Key::R) {
            self.scene = Scene::demo();
            if let Err(err) = renderer.reload_scene(&self.scene) {
                log::error!("scene reload failed: {err}");
            }
        }

        AppControl::Continue
    }

    fn update_title(&mut self, ctx: &FrameCtx<'_, '_>) {
        let lines = self.renderer.as_ref().map(|r| r.overlay_lines()).unwrap_or_default();
        let title = if lines.is_empty() {
            TITLE.to_string()
        } else {
            format!("{TITLE} | {}", lines.join(" | "))
        };

        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }
    }
}

impl App for Studio {
    fn on_resize(&mut self, layout: Layout) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        match renderer.resize(layout) {
            Err(err) if err.is_fatal() => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        let input = CameraInput::gather(ctx.input, ctx.input_frame);
        let dt = ctx.time.dt;
        let (slot, scene, config) = (&mut self.renderer, &self.scene, &self.config);

        let control = ctx.render(|rctx, target| {
            if slot.is_none() {
                let mut renderer = Renderer::new(WgpuBackend::new(rctx), config.clone());
                if let Err(err) = renderer.init(scene, rctx.layout) {
                    log::error!("cannot start renderer: {err}");
                    return AppControl::Exit;
                }
                *slot = Some(renderer);
            }

            let Some(renderer) = slot.as_mut() else {
                return AppControl::Exit;
            };

            match draw_frame(renderer, dt, &input, target) {
                Ok(()) => AppControl::Continue,
                Err(err) if err.is_fatal() => {
                    log::error!("{err}");
                    AppControl::Exit
                }
                Err(err) => {
                    log::warn!("frame skipped: {err}");
                    AppControl::Continue
                }
            }
        });

        self.update_title(ctx);
        control
    }

    fn on_exit(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.teardown();
        }
    }
}

fn draw_frame(
    renderer: &mut Renderer<WgpuBackend>,
    dt: f32,
    input: &CameraInput,
    target: &mut RenderTarget<'_>,
) -> Result<(), RenderError> {
    renderer.pre_render()?;
    renderer.render(dt, input, target)?;
    renderer.post_render(target)
}
