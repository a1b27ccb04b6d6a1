use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, Layout, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title:        String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "raylume".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Requests an app can make from inside `on_frame`; applied once it returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens the viewer window, binds a GPU surface to it and drives `app`
    /// until the window closes or the app exits.
    ///
    /// Window or device creation failures end the loop and are returned.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            viewport: None,
            closing: false,
            fatal: None,
        };
        event_loop.run_app(&mut driver).context("event loop failed")?;

        driver.fatal.map_or(Ok(()), Err)
    }
}

/// The window with the input, clock and surface state bound to it.
#[self_referencing]
struct Viewport {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Viewport {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        ViewportTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |window| {
                pollster::block_on(Gpu::new(window, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

struct Driver<A: App + 'static> {
    config:   RuntimeConfig,
    gpu_init: GpuInit,
    app:      A,
    viewport: Option<Viewport>,
    closing:  bool,
    fatal:    Option<anyhow::Error>,
}

impl<A: App + 'static> Driver<A> {
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewport.take().is_some() {
            self.app.on_exit();
        }
        self.closing = true;
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> AppControl {
        let Some(viewport) = self.viewport.as_mut() else {
            return AppControl::Continue;
        };
        viewport.with_gpu_mut(|gpu| gpu.resize(size));
        viewport.request_redraw();
        self.app.on_resize(Layout::from(size))
    }

    fn redraw(&mut self, id: WindowId) -> AppControl {
        let Some(viewport) = self.viewport.as_mut() else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        let control = viewport.with_mut(|v| {
            let time = v.clock.tick();
            let control = app.on_frame(&mut FrameCtx {
                window: WindowCtx { id, window: v.window },
                gpu: v.gpu,
                input: v.input,
                input_frame: v.input_frame,
                time,
                runtime: &mut runtime,
            });
            v.input_frame.clear();
            control
        });

        if runtime.exit { AppControl::Exit } else { control }
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewport.is_some() {
            return;
        }
        match Viewport::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(viewport) => {
                viewport.request_redraw();
                self.viewport = Some(viewport);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.fatal = Some(err);
                self.close(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.closing {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(viewport) = &self.viewport {
            viewport.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.closing {
            event_loop.exit();
            return;
        }
        let Some(viewport) = self.viewport.as_mut() else {
            return;
        };

        viewport.with_mut(|v| {
            if let Some(ev) = translate_window_event(v.window, &event) {
                v.input.apply_event(v.input_frame, ev);
            }
        });

        let control = match self.app.on_window_event(id, &event) {
            AppControl::Exit => AppControl::Exit,
            AppControl::Continue => match event {
                WindowEvent::CloseRequested => AppControl::Exit,
                WindowEvent::Resized(size) => self.resize(size),
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = viewport_size(self.viewport.as_ref());
                    size.map_or(AppControl::Continue, |size| self.resize(size))
                }
                WindowEvent::RedrawRequested => self.redraw(id),
                _ => AppControl::Continue,
            },
        };

        if control == AppControl::Exit {
            self.close(event_loop);
        }
    }
}

fn viewport_size(viewport: Option<&Viewport>) -> Option<PhysicalSize<u32>> {
    viewport.map(|v| v.with_window(|w| w.inner_size()))
}
