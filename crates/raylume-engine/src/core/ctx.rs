use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;
use super::layout::Layout;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn layout(&self) -> Layout {
        Layout::from(self.window.inner_size())
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Everything `App::on_frame` may touch during one redraw.
pub struct FrameCtx<'a, 'w> {
    pub window:       WindowCtx<'a>,
    pub gpu:          &'a mut Gpu<'w>,
    pub input:        &'a InputState,
    pub input_frame:  &'a InputFrame,
    pub time:         FrameTime,
    pub runtime:      &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Runs `draw` against the next swapchain image and presents it.
    ///
    /// A skipped or reconfigured surface yields `Continue` without drawing;
    /// an out-of-memory surface yields `Exit`.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> AppControl,
    {
        let mut frame = match self.gpu.acquire() {
            Ok(frame) => frame,
            Err(SurfaceErrorAction::Fatal) => return AppControl::Exit,
            Err(_) => return AppControl::Continue,
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.adapter(),
            self.gpu.surface_format(),
            self.gpu.layout(),
        );
        let control = draw(&rctx, &mut RenderTarget::new(&mut frame.encoder, &frame.view));

        self.window.window.pre_present_notify();
        self.gpu.present(frame);
        control
    }
}
