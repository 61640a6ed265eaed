//! glw backend crate.
//!
//! Platform adapter (window, cursors, mouse capture, file loading) and a
//! fixed-pipeline renderer for an immediate-mode GUI, on top of winit + wgpu.

pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod platform;
pub mod render;
pub mod window;

pub use error::{BackendError, Result};
