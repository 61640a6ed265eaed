//! Exercises the glw backend end to end: textures from disk or memory,
//! the three blend modes, scissor clipping, cursors and mouse capture.
//!
//! Usage: `glw-demo [image-path]`

use anyhow::Result;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use glw_backend::core::{App, AppControl, FrameCtx};
use glw_backend::device::GpuInit;
use glw_backend::logging::{init_logging, LoggingConfig};
use glw_backend::platform::{CursorKind, Platform};
use glw_backend::render::{BlendMode, Renderer, TextureId, Vertex, WgpuApi};
use glw_backend::window::{Runtime, RuntimeConfig};

const CHECKER_SIZE: u32 = 64;
const STRIP_WIDTH: u32 = 16;
const IDLE_CLEAR: [f32; 4] = [0.1, 0.1, 0.12, 1.0];
const CAPTURED_CLEAR: [f32; 4] = [0.16, 0.1, 0.1, 1.0];
/// Distance from a window edge, in logical pixels, that shows a resize cursor.
const EDGE: f32 = 12.0;

struct Demo {
    image_path: Option<String>,
    white: Option<TextureId>,
    image: Option<TextureId>,
    strip: Option<TextureId>,
    frame: u32,
    cursor: CursorKind,
    captured: bool,
}

impl Demo {
    fn new(image_path: Option<String>) -> Self {
        Self {
            image_path,
            white: None,
            image: None,
            strip: None,
            frame: 0,
            cursor: CursorKind::Arrow,
            captured: false,
        }
    }

    fn load_image(&self, platform: &Platform, renderer: &mut Renderer<WgpuApi>) -> Option<TextureId> {
        let path = self.image_path.as_ref()?;
        let bytes = platform.load_file(path).ok()?;
        let image = renderer.load_image_from_memory(&bytes).ok()?;
        log::info!("loaded {path}: {}x{} ({} ch)", image.width, image.height, image.channels);
        renderer.create_texture_from_image(&image).ok()
    }
}

impl App for Demo {
    fn on_start(&mut self, platform: &Platform, renderer: &mut Renderer<WgpuApi>) -> AppControl {
        let white = renderer.create_texture(1, 1, 4, &[0xff; 4]);

        // Gray checkerboard, expanded to RGB by the renderer.
        let checker: Vec<u8> = (0..CHECKER_SIZE * CHECKER_SIZE)
            .map(|i| {
                let (x, y) = (i % CHECKER_SIZE, i / CHECKER_SIZE);
                if (x / 8 + y / 8) % 2 == 0 { 0xe0 } else { 0x40 }
            })
            .collect();

        let image = match self.load_image(platform, renderer) {
            Some(id) => Ok(id),
            None => renderer.create_texture(CHECKER_SIZE, CHECKER_SIZE, 1, &checker),
        };

        let strip = renderer.create_texture(STRIP_WIDTH, 1, 4, &vec![0; (STRIP_WIDTH * 4) as usize]);

        match (white, image, strip) {
            (Ok(white), Ok(image), Ok(strip)) => {
                self.white = Some(white);
                self.image = Some(image);
                self.strip = Some(strip);
                AppControl::Continue
            }
            _ => {
                log::error!("could not create demo textures");
                AppControl::Exit
            }
        }
    }

    fn on_window_event(&mut self, platform: &Platform, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let metrics = platform.display_metrics();
                let (sx, sy) = platform.scale_factor();
                let (x, y) = (position.x as f32 / sx, position.y as f32 / sy);
                let near_right = x > metrics.logical.0 - EDGE;
                let near_bottom = y > metrics.logical.1 - EDGE;

                let kind = match (near_right, near_bottom) {
                    (true, true) => CursorKind::ResizeDiagonal,
                    (true, false) => CursorKind::ResizeHorizontal,
                    (false, true) => CursorKind::ResizeVertical,
                    (false, false) => CursorKind::Arrow,
                };
                if kind != self.cursor {
                    platform.set_cursor(kind);
                    self.cursor = kind;
                }
            }

            WindowEvent::MouseInput { state, .. } => {
                self.captured = *state == ElementState::Pressed;
                platform.capture_mouse(self.captured);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => return AppControl::Exit,

            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let (Some(white), Some(image), Some(strip)) = (self.white, self.image, self.strip) else {
            return AppControl::Exit;
        };

        self.frame = self.frame.wrapping_add(1);
        ctx.runtime.set_clear_color(if self.captured { CAPTURED_CLEAR } else { IDLE_CLEAR });
        let (w, h) = ctx.gui_size();
        let (wf, hf) = (w as f32, h as f32);
        let r = &mut *ctx.renderer;

        // Scroll a gradient through the strip texture.
        let pixels: Vec<u8> = (0..STRIP_WIDTH)
            .flat_map(|i| {
                let v = ((i * 16 + self.frame) % 256) as u8;
                [v, 255 - v, 128, 255]
            })
            .collect();
        if let Err(e) = r.copy_sub_texture(strip, 0, 0, STRIP_WIDTH, 1, &pixels) {
            log::warn!("strip update failed: {e}");
        }

        r.begin(w, h);

        // Opaque textured image, lower left.
        r.set_blend_mode(BlendMode::None);
        if r.bind_texture(image).is_ok() {
            r.render_mesh(&quad(20.0, 20.0, 256.0, 256.0, 0.5, [255; 4]));
        }

        // Translucent panel across the top.
        r.set_blend_mode(BlendMode::Rect);
        if r.bind_texture(white).is_ok() {
            r.render_mesh(&quad(0.0, hf - 60.0, wf, 60.0, 0.2, [40, 90, 200, 160]));
        }

        // Additive animated strip, clipped to a window right of the image.
        r.set_blend_mode(BlendMode::Text);
        r.set_scissor(300, 20, 200, 256, true);
        if r.bind_texture(strip).is_ok() {
            let sweep = (self.frame % 400) as f32;
            r.render_mesh(&quad(200.0 + sweep, 20.0, 200.0, 256.0, 0.1, [200, 200, 200, 255]));
        }
        r.set_scissor(0, 0, w as i32, h as i32, false);

        r.end();
        AppControl::Continue
    }
}

/// Two triangles covering `x, y, w, h` (bottom-left origin) with full UVs.
fn quad(x: f32, y: f32, w: f32, h: f32, depth: f32, color: [u8; 4]) -> [Vertex; 6] {
    let (x1, y1) = (x + w, y + h);
    let v = |px, py, u, t| Vertex::new([px, py, depth], color, [u, t]);
    [
        v(x, y, 0.0, 1.0),
        v(x1, y, 1.0, 1.0),
        v(x1, y1, 1.0, 0.0),
        v(x, y, 0.0, 1.0),
        v(x1, y1, 1.0, 0.0),
        v(x, y1, 0.0, 0.0),
    ]
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let image_path = std::env::args().nth(1);
    let config = RuntimeConfig {
        title: "glw demo".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Demo::new(image_path))
}
