//! Contracts between the runtime loop and the application driving it.

mod app;
mod ctx;
mod layout;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub use layout::Layout;
