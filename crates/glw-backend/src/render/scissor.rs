/// Scissor rectangle in physical pixels, bottom-left origin.
///
/// GUI coordinates grow upward from the bottom of the window (the vertex
/// shader maps y = 0 to the bottom edge), so clip rects arrive in that space.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScissorRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Scales a logical rect to physical pixels, truncating toward zero.
    pub fn from_logical(x: i32, y: i32, width: i32, height: i32, scale: (f32, f32)) -> Self {
        let (sx, sy) = scale;
        Self {
            x: (sx * x as f32) as i32,
            y: (sy * y as f32) as i32,
            width: (sx * width as f32) as i32,
            height: (sy * height as f32) as i32,
        }
    }

    /// Converts to a top-left origin `(x, y, w, h)` clamped to a target of
    /// `target` pixels.
    ///
    /// Returns `None` when nothing of the rect lies inside the target.
    pub fn to_framebuffer(self, target: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
        let (tw, th) = (target.0 as i64, target.1 as i64);

        let x0 = (self.x as i64).clamp(0, tw);
        let x1 = (self.x as i64 + self.width as i64).clamp(0, tw);
        let y0 = (self.y as i64).clamp(0, th);
        let y1 = (self.y as i64 + self.height as i64).clamp(0, th);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0 as u32, (th - y1) as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
