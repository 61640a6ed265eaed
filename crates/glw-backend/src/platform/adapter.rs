use std::path::Path;

use winit::event_loop::EventLoop;
use winit::window::{CursorGrabMode, Window};

use crate::error::{BackendError, Result};

use super::{CursorKind, CursorSet, DisplayMetrics};

/// Brings up the native video subsystem (the winit event loop).
///
/// Failure here is fatal: there is nothing to render into without it.
pub fn initialize() -> Result<EventLoop<()>> {
    EventLoop::new().map_err(|e| {
        log::error!("video subsystem could not initialize: {e}");
        BackendError::VideoInit(e)
    })
}

/// Owns the application window and its cursor set.
///
/// Dropping the platform releases the cursors and closes the window.
pub struct Platform {
    window: Window,
    cursors: CursorSet,
}

impl Platform {
    pub fn new(window: Window) -> Self {
        log::debug!("platform adapter created for window {:?}", window.id());
        Self {
            window,
            cursors: CursorSet::new(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Activates the pre-created cursor for `kind`.
    pub fn set_cursor(&self, kind: CursorKind) {
        self.window.set_cursor(self.cursors.get(kind).clone());
    }

    /// Keeps mouse input with this window while `set` is true.
    ///
    /// Uses a confined grab. The cursor is never frozen in place; platforms
    /// without confinement (macOS) leave it free.
    pub fn capture_mouse(&self, set: bool) {
        let mode = grab_mode(set);
        if let Err(e) = self.window.set_cursor_grab(mode) {
            log::debug!("cursor grab {mode:?} unsupported: {e}");
        }
    }

    /// Reads a whole file into memory. See [`super::load_file`].
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        super::load_file(path).inspect_err(|e| log::warn!("{e}"))
    }

    pub fn display_metrics(&self) -> DisplayMetrics {
        DisplayMetrics::from_window(&self.window)
    }

    /// Per-axis DPI scale (`drawable / logical`).
    pub fn scale_factor(&self) -> (f32, f32) {
        self.display_metrics().scale_factor()
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        log::debug!("platform adapter released for window {:?}", self.window.id());
    }
}

fn grab_mode(capture: bool) -> CursorGrabMode {
    if capture {
        CursorGrabMode::Confined
    } else {
        CursorGrabMode::None
    }
}
