//! Recording [`GraphicsApi`] for call-sequence tests.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::{BackendError, Result};

use super::{
    BlendFunc, GraphicsApi, PixelFormat, ScissorRect, ShaderSource, TextureId, TextureRegion,
    TextureUpload, Vertex,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateProgram,
    Viewport(u32, u32),
    BeginFrame([f32; 2]),
    Upload(Vec<Vertex>),
    Draw(Range<u32>),
    Blend(BlendFunc),
    EnableScissor(bool),
    ScissorRect(ScissorRect),
    EndFrame,
    CreateTexture {
        id: TextureId,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    },
    UpdateTexture {
        id: TextureId,
        region: TextureRegion,
        len: usize,
    },
    DeleteTexture(TextureId),
    BindTexture(TextureId),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingApi {
    pub calls: Vec<Call>,
    pub fail_program: Option<BackendError>,
    pub fail_texture: Option<BackendError>,
    textures: HashSet<TextureId>,
    next_texture: u32,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl GraphicsApi for RecordingApi {
    fn create_program(&mut self, _vertex: &ShaderSource, _fragment: &ShaderSource) -> Result<()> {
        if let Some(err) = self.fail_program.take() {
            return Err(err);
        }
        self.calls.push(Call::CreateProgram);
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn begin_frame(&mut self, screen_size: [f32; 2]) {
        self.calls.push(Call::BeginFrame(screen_size));
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.calls.push(Call::Upload(vertices.to_vec()));
    }

    fn draw_triangles(&mut self, range: Range<u32>) {
        self.calls.push(Call::Draw(range));
    }

    fn set_blend(&mut self, func: BlendFunc) {
        self.calls.push(Call::Blend(func));
    }

    fn enable_scissor(&mut self, enabled: bool) {
        self.calls.push(Call::EnableScissor(enabled));
    }

    fn set_scissor_rect(&mut self, rect: ScissorRect) {
        self.calls.push(Call::ScissorRect(rect));
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::EndFrame);
    }

    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureId> {
        if let Some(err) = self.fail_texture.take() {
            return Err(err);
        }
        self.next_texture += 1;
        let id = TextureId::from_raw(self.next_texture);
        self.textures.insert(id);
        self.calls.push(Call::CreateTexture {
            id,
            width: upload.width,
            height: upload.height,
            format: upload.format,
            pixels: upload.pixels.to_vec(),
        });
        Ok(id)
    }

    fn update_texture(&mut self, id: TextureId, region: TextureRegion, rgba: &[u8]) -> Result<()> {
        if !self.textures.contains(&id) {
            return Err(BackendError::UnknownTexture(id));
        }
        self.calls.push(Call::UpdateTexture {
            id,
            region,
            len: rgba.len(),
        });
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
        self.calls.push(Call::DeleteTexture(id));
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        if !self.textures.contains(&id) {
            return Err(BackendError::UnknownTexture(id));
        }
        self.calls.push(Call::BindTexture(id));
        Ok(())
    }
}
