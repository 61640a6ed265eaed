use std::path::PathBuf;

use crate::render::TextureId;

/// Backend error.
///
/// Variants fall in two classes. Fatal ones (`is_fatal() == true`) come from
/// bringing up the window/GPU stack and end the run. Everything else is
/// recoverable: it is logged where it happens and handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("video subsystem could not initialize: {0}")]
    VideoInit(#[source] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[source] winit::error::OsError),

    #[error("gpu initialization failed: {0}")]
    Gpu(String),

    #[error("unable to compile {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("unable to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u32),

    #[error("pixel buffer holds {actual} bytes, {expected} required")]
    PixelSizeMismatch { expected: usize, actual: usize },

    #[error("invalid texture size {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },

    #[error("region {x},{y} {width}x{height} exceeds texture {id:?}")]
    RegionOutOfBounds {
        id: TextureId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("gpu rejected {op}: {message}")]
    Validation { op: &'static str, message: String },

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    #[error("no frame is bound to the renderer")]
    NoFrame,
}

impl BackendError {
    /// True for failures that leave no usable window or GPU context.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BackendError::VideoInit(_) | BackendError::Window(_) | BackendError::Gpu(_)
        )
    }
}

/// Shader stage named in compile errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
