use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;
use super::layout::Layout;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives. Returning `Exit` from any of them closes
/// the window, after which `on_exit` runs exactly once.
pub trait App {
    /// Sees every raw window event before the runtime acts on it.
    fn on_window_event(&mut self, _id: WindowId, _event: &WindowEvent) -> AppControl {
        AppControl::Continue
    }

    /// The surface already has the new extent when this runs.
    fn on_resize(&mut self, _layout: Layout) -> AppControl {
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    fn on_exit(&mut self) {}
}
