/// One acquired surface frame.
///
/// Short-lived: the surface cannot hand out another texture until this one is
/// submitted and dropped.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Size of the surface texture in physical pixels.
    pub size: (u32, u32),
}

/// What the runtime should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Out of memory or similar; stop the run.
    Fatal,
}
