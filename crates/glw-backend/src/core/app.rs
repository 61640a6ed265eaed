use winit::event::WindowEvent;

use crate::platform::Platform;
use crate::render::{Renderer, WgpuApi};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the host GUI.
pub trait App {
    /// Called once after the window, GPU and renderer exist.
    ///
    /// The place to load images and create textures.
    fn on_start(&mut self, platform: &Platform, renderer: &mut Renderer<WgpuApi>) -> AppControl {
        let _ = (platform, renderer);
        AppControl::Continue
    }

    /// Called for every raw window event, before the runtime handles it.
    fn on_window_event(&mut self, platform: &Platform, event: &WindowEvent) -> AppControl {
        let _ = (platform, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
