use std::ops::Range;

use crate::error::Result;

use super::{BlendFunc, ScissorRect, ShaderSource, TextureId, TextureRegion, TextureUpload, Vertex};

/// Graphics API calls issued by the [`Renderer`](super::Renderer).
///
/// State set here persists across calls until changed, the way a GL context
/// behaves. [`WgpuApi`](super::WgpuApi) is the production implementation.
pub trait GraphicsApi {
    /// Compiles the shader pair, binds the vertex attributes at their fixed
    /// locations and allocates the vertex buffer and screen-size uniform.
    fn create_program(&mut self, vertex: &ShaderSource, fragment: &ShaderSource) -> Result<()>;

    /// Viewport in physical pixels, anchored at the origin.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Resets per-frame state: clears depth, enables the depth test
    /// (less-or-equal), disables culling, opens the color mask, binds the
    /// program with its attributes and sets the screen-size uniform.
    fn begin_frame(&mut self, screen_size: [f32; 2]);

    /// Uploads the mesh accumulated since `begin_frame`. Ranges passed to
    /// `draw_triangles` index into this upload.
    fn upload_vertices(&mut self, vertices: &[Vertex]);

    /// Draws `range` of the uploaded vertices as a triangle list.
    fn draw_triangles(&mut self, range: Range<u32>);

    fn set_blend(&mut self, func: BlendFunc);

    fn enable_scissor(&mut self, enabled: bool);

    fn set_scissor_rect(&mut self, rect: ScissorRect);

    /// Disables the vertex attributes and unbinds the program.
    fn end_frame(&mut self);

    /// Creates a texture and leaves it bound. Sizes beyond the device limit
    /// are rejected.
    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureId>;

    /// Overwrites `region` of texture `id` with tightly packed RGBA texels.
    fn update_texture(&mut self, id: TextureId, region: TextureRegion, rgba: &[u8]) -> Result<()>;

    /// Destroys texture `id`; unknown ids are ignored.
    fn delete_texture(&mut self, id: TextureId);

    fn bind_texture(&mut self, id: TextureId) -> Result<()>;
}
