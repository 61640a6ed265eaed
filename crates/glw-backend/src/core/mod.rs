//! Host-facing contracts.
//!
//! The runtime owns the platform loop; the host GUI implements [`App`] and
//! draws through the [`FrameCtx`] it receives once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
