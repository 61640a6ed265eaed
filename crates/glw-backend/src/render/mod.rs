//! GPU rendering subsystem.
//!
//! [`Renderer`] drives the per-frame mesh lifecycle through a [`GraphicsApi`].
//! [`WgpuApi`] is the wgpu implementation; it owns every GPU object.
//!
//! Convention:
//! - GUI geometry is in logical pixels (bottom-left origin, +Y up).
//! - The vertex shader converts to NDC using a screen-size uniform.
//! - Scissor rectangles are given in logical pixels and scaled by the DPI factor.

mod api;
mod blend;
mod decode;
mod mesh;
mod renderer;
mod scissor;
mod shader;
mod texture;
mod vertex;
mod wgpu_api;

#[cfg(test)]
mod recording;

pub use api::GraphicsApi;
pub use blend::{BlendFunc, BlendMode};
pub use decode::{load_image, load_image_from_memory, Image};
pub use mesh::MeshAccumulator;
pub use renderer::Renderer;
pub use scissor::ScissorRect;
pub use shader::{ScreenUniform, ShaderSource, FRAGMENT_SHADER, VERTEX_SHADER};
pub use texture::{expand_luminance, rgb_to_rgba, PixelFormat, TextureId, TextureRegion, TextureUpload};
pub use vertex::Vertex;
pub use wgpu_api::{FrameTarget, WgpuApi};
