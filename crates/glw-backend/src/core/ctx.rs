use crate::platform::Platform;
use crate::render::{Renderer, WgpuApi};
use crate::window::RuntimeCtx;

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// The surface frame is already acquired and cleared; draws issued through
/// `renderer` between `begin` and `end` land in it.
pub struct FrameCtx<'a> {
    pub platform: &'a Platform,
    pub renderer: &'a mut Renderer<WgpuApi>,
    /// Window size in logical pixels.
    pub logical_size: (f32, f32),
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Logical size rounded to whole GUI units, as `Renderer::begin` takes it.
    pub fn gui_size(&self) -> (u32, u32) {
        (
            self.logical_size.0.round().max(0.0) as u32,
            self.logical_size.1.round().max(0.0) as u32,
        )
    }
}
