//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for a window, keeps the
//! surface configured across resizes and hands out one acquired frame at a
//! time.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{log_uncaptured_errors, scoped};
pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
