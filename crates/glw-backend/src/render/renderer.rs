use std::path::Path;

use crate::error::{BackendError, Result};
use crate::platform::DisplayMetrics;

use super::decode::{self, Image};
use super::shader::{FRAGMENT_SHADER, VERTEX_SHADER};
use super::texture::prepare_upload;
use super::{BlendMode, GraphicsApi, MeshAccumulator, ScissorRect, TextureId, TextureRegion, Vertex};

/// Immediate-mode GUI renderer.
///
/// One program, one dynamic vertex buffer and a per-frame mesh accumulator.
/// A frame is `begin`, any number of `render_mesh` / texture / state calls,
/// then `end`.
pub struct Renderer<A: GraphicsApi> {
    api: A,
    mesh: MeshAccumulator,
    display: DisplayMetrics,
    blend: BlendMode,
}

impl<A: GraphicsApi> Renderer<A> {
    /// Compiles the fixed shader pair and allocates the vertex buffer.
    pub fn create(mut api: A) -> Result<Self> {
        api.create_program(&VERTEX_SHADER, &FRAGMENT_SHADER)
            .inspect_err(|e| log::error!("{e}"))?;

        log::debug!("renderer created");

        Ok(Self {
            api,
            mesh: MeshAccumulator::new(),
            display: DisplayMetrics::default(),
            blend: BlendMode::None,
        })
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// Updates the drawable/logical sizes used by `begin` and `set_scissor`.
    ///
    /// The runtime calls this before every frame.
    pub fn set_display_metrics(&mut self, display: DisplayMetrics) {
        self.display = display;
    }

    pub fn display_metrics(&self) -> DisplayMetrics {
        self.display
    }

    /// Vertices accumulated since the last `end`.
    pub fn mesh_len(&self) -> usize {
        self.mesh.len()
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Starts a frame for a GUI of `width` x `height` logical units.
    ///
    /// The viewport covers the drawable's physical size, which exceeds the
    /// logical size under high-DPI.
    pub fn begin(&mut self, width: u32, height: u32) {
        let (dw, dh) = self.display.drawable;
        self.api.set_viewport(dw, dh);
        self.api.begin_frame([width as f32, height as f32]);
    }

    /// Appends `vertices` (a triangle list) and draws them.
    ///
    /// Every call uploads the whole accumulated mesh, not just the new
    /// vertices, then draws only the newly appended range. Cost grows
    /// quadratically with the number of calls per frame.
    pub fn render_mesh(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }

        let range = self.mesh.push(vertices);
        self.api.upload_vertices(self.mesh.as_slice());
        self.api.draw_triangles(range);
    }

    /// Ends the frame. Nothing happens when no mesh was drawn.
    pub fn end(&mut self) {
        if self.mesh.is_empty() {
            return;
        }

        self.mesh.clear();
        self.api.enable_scissor(false);
        self.api.end_frame();
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.api.set_blend(mode.func());
    }

    /// Decodes an image file, keeping its native channel count.
    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<Image> {
        decode::load_image(path)
    }

    /// Decodes an image already in memory (e.g. from `Platform::load_file`).
    pub fn load_image_from_memory(&self, bytes: &[u8]) -> Result<Image> {
        decode::load_image_from_memory(bytes)
    }

    /// Creates a 2D texture from 1, 3 or 4 channel pixels.
    ///
    /// Gray input is expanded to RGB before upload; storage is always RGBA8
    /// with linear minification.
    pub fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        channels: u32,
        pixels: &[u8],
    ) -> Result<TextureId> {
        let upload = prepare_upload(width, height, channels, pixels)
            .inspect_err(|e| log::warn!("create_texture: {e}"))?;
        let id = self
            .api
            .create_texture(&upload)
            .inspect_err(|e| log::warn!("create_texture: {e}"))?;
        log::debug!("created texture {id:?} ({width}x{height}, {channels} ch)");
        Ok(id)
    }

    /// Creates a texture from a decoded [`Image`].
    pub fn create_texture_from_image(&mut self, image: &Image) -> Result<TextureId> {
        self.create_texture(image.width, image.height, image.channels, &image.pixels)
    }

    /// Overwrites a region of `texture`. `pixels` is always RGBA.
    pub fn copy_sub_texture(
        &mut self,
        texture: TextureId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() < expected {
            return Err(BackendError::PixelSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let region = TextureRegion { x, y, width, height };
        self.api
            .update_texture(texture, region, &pixels[..expected])
            .inspect_err(|e| log::warn!("copy_sub_texture: {e}"))
    }

    pub fn remove_texture(&mut self, texture: TextureId) {
        self.api.delete_texture(texture);
    }

    pub fn bind_texture(&mut self, texture: TextureId) -> Result<()> {
        self.api.bind_texture(texture)
    }

    /// Sets the clip rectangle in logical units and toggles the scissor test.
    ///
    /// The rectangle is scaled to physical pixels by the display's DPI scale.
    pub fn set_scissor(&mut self, x: i32, y: i32, width: i32, height: i32, enable: bool) {
        let rect = ScissorRect::from_logical(x, y, width, height, self.display.scale_factor());
        self.api.enable_scissor(enable);
        self.api.set_scissor_rect(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShaderStage;
    use crate::render::recording::{Call, RecordingApi};
    use crate::render::{BlendFunc, PixelFormat};

    fn renderer() -> Renderer<RecordingApi> {
        let mut r = Renderer::create(RecordingApi::new()).unwrap();
        r.api_mut().take_calls();
        r
    }

    fn verts(n: usize, z: f32) -> Vec<Vertex> {
        vec![Vertex::new([1.0, 2.0, z], [255, 0, 0, 255], [0.5, 0.5]); n]
    }


    #[test]
    fn create_compiles_program() {
        let mut r = Renderer::create(RecordingApi::new()).unwrap();
        assert_eq!(r.api_mut().take_calls(), vec![Call::CreateProgram]);
    }

    #[test]
    fn create_propagates_compile_error() {
        let mut api = RecordingApi::new();
        api.fail_program = Some(BackendError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "bad".into(),
        });
        let err = Renderer::create(api).err().unwrap();
        assert!(matches!(err, BackendError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
        assert!(!err.is_fatal());
    }


    #[test]
    fn begin_uses_drawable_size_for_viewport() {
        let mut r = renderer();
        r.set_display_metrics(DisplayMetrics::new((1600, 1200), (800.0, 600.0)));
        r.begin(800, 600);
        assert_eq!(
            r.api_mut().take_calls(),
            vec![Call::Viewport(1600, 1200), Call::BeginFrame([800.0, 600.0])]
        );
    }

    #[test]
    fn meshes_accumulate_and_each_draw_covers_new_range() {
        let mut r = renderer();
        r.begin(100, 100);
        r.api_mut().take_calls();

        let a = verts(3, 0.0);
        let b = verts(6, 1.0);
        r.render_mesh(&a);
        r.render_mesh(&b);
        assert_eq!(r.mesh_len(), 9);

        let calls = r.api_mut().take_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::Upload(a.clone()));
        assert_eq!(calls[1], Call::Draw(0..3));
        // Second upload carries everything accumulated so far.
        let mut all = a.clone();
        all.extend_from_slice(&b);
        assert_eq!(calls[2], Call::Upload(all));
        assert_eq!(calls[3], Call::Draw(3..9));
    }

    #[test]
    fn end_clears_mesh_and_resets_state() {
        let mut r = renderer();
        r.begin(100, 100);
        r.render_mesh(&verts(3, 0.0));
        r.api_mut().take_calls();

        r.end();
        assert_eq!(r.mesh_len(), 0);
        assert_eq!(
            r.api_mut().take_calls(),
            vec![Call::EnableScissor(false), Call::EndFrame]
        );
    }

    #[test]
    fn end_without_draws_is_noop() {
        let mut r = renderer();
        r.begin(100, 100);
        r.api_mut().take_calls();
        r.end();
        assert!(r.api_mut().take_calls().is_empty());
    }

    #[test]
    fn empty_mesh_issues_nothing() {
        let mut r = renderer();
        r.render_mesh(&[]);
        assert!(r.api_mut().take_calls().is_empty());
        assert_eq!(r.mesh_len(), 0);
    }

    #[test]
    fn next_frame_starts_from_zero() {
        let mut r = renderer();
        r.begin(10, 10);
        r.render_mesh(&verts(3, 0.0));
        r.end();
        r.begin(10, 10);
        r.api_mut().take_calls();
        r.render_mesh(&verts(3, 0.0));
        assert_eq!(r.api_mut().take_calls()[1], Call::Draw(0..3));
    }


    #[test]
    fn blend_modes_emit_fixed_triples() {
        use wgpu::BlendFactor as F;
        let mut r = renderer();
        r.set_blend_mode(BlendMode::Text);
        r.set_blend_mode(BlendMode::Rect);
        r.set_blend_mode(BlendMode::None);
        assert_eq!(r.blend_mode(), BlendMode::None);
        assert_eq!(
            r.api_mut().take_calls(),
            vec![
                Call::Blend(BlendFunc { enabled: true, src: F::One, dst: F::One }),
                Call::Blend(BlendFunc {
                    enabled: true,
                    src: F::SrcAlpha,
                    dst: F::OneMinusSrcAlpha,
                }),
                Call::Blend(BlendFunc::DISABLED),
            ]
        );
    }


    #[test]
    fn scissor_scales_with_dpi() {
        let mut r = renderer();
        r.set_display_metrics(DisplayMetrics::new((1600, 1200), (800.0, 600.0)));
        r.set_scissor(10, 20, 30, 40, true);
        assert_eq!(
            r.api_mut().take_calls(),
            vec![Call::EnableScissor(true), Call::ScissorRect(ScissorRect::new(20, 40, 60, 80))]
        );
    }

    #[test]
    fn scissor_disable_still_sets_rect() {
        let mut r = renderer();
        r.set_display_metrics(DisplayMetrics::new((800, 600), (800.0, 600.0)));
        r.set_scissor(1, 2, 3, 4, false);
        assert_eq!(
            r.api_mut().take_calls(),
            vec![Call::EnableScissor(false), Call::ScissorRect(ScissorRect::new(1, 2, 3, 4))]
        );
    }


    #[test]
    fn luminance_texture_uploads_tripled_buffer() {
        let mut r = renderer();
        let id = r.create_texture(2, 1, 1, &[7, 9]).unwrap();
        match r.api_mut().take_calls().as_slice() {
            [Call::CreateTexture { id: got, width: 2, height: 1, format, pixels }] => {
                assert_eq!(*got, id);
                assert_eq!(*format, PixelFormat::Rgb);
                assert_eq!(pixels, &vec![7, 7, 7, 9, 9, 9]);
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn rgba_texture_uploads_as_given() {
        let mut r = renderer();
        let px = [1u8, 2, 3, 4];
        r.create_texture(1, 1, 4, &px).unwrap();
        let calls = r.api_mut().take_calls();
        assert!(matches!(
            &calls[0],
            Call::CreateTexture { format: PixelFormat::Rgba, pixels, .. } if pixels == &px.to_vec()
        ));
    }

    #[test]
    fn bad_channel_count_creates_nothing() {
        let mut r = renderer();
        assert!(matches!(
            r.create_texture(1, 1, 2, &[0, 0]),
            Err(BackendError::UnsupportedChannels(2))
        ));
        assert!(r.api_mut().take_calls().is_empty());
    }

    #[test]
    fn texture_rejected_by_api_is_returned() {
        let mut r = renderer();
        r.api_mut().fail_texture = Some(BackendError::InvalidTextureSize { width: 9000, height: 1 });
        assert!(matches!(
            r.create_texture(9000, 1, 4, &vec![0; 36000]),
            Err(BackendError::InvalidTextureSize { width: 9000, height: 1 })
        ));
        assert!(r.api_mut().take_calls().is_empty());
    }

    #[test]
    fn sub_texture_update_is_rgba() {
        let mut r = renderer();
        let id = r.create_texture(4, 4, 4, &[0; 64]).unwrap();
        r.api_mut().take_calls();

        r.copy_sub_texture(id, 1, 1, 2, 2, &[0xff; 16]).unwrap();
        assert_eq!(
            r.api_mut().take_calls(),
            vec![Call::UpdateTexture {
                id,
                region: TextureRegion { x: 1, y: 1, width: 2, height: 2 },
                len: 16,
            }]
        );

        assert!(matches!(
            r.copy_sub_texture(id, 0, 0, 2, 2, &[0; 15]),
            Err(BackendError::PixelSizeMismatch { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn bind_and_remove() {
        let mut r = renderer();
        let id = r.create_texture(1, 1, 3, &[1, 2, 3]).unwrap();
        r.bind_texture(id).unwrap();
        r.remove_texture(id);
        assert!(matches!(r.bind_texture(id), Err(BackendError::UnknownTexture(t)) if t == id));

        let calls = r.api_mut().take_calls();
        assert_eq!(calls[1], Call::BindTexture(id));
        assert_eq!(calls[2], Call::DeleteTexture(id));
    }
}
