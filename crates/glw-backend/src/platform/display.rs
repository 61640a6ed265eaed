use winit::window::Window;

/// Drawable vs. logical window size.
///
/// Under high-DPI the drawable (physical) size exceeds the logical size; the
/// ratio between them is the scale used to map GUI coordinates to pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayMetrics {
    /// Physical pixel size of the rendering surface.
    pub drawable: (u32, u32),
    /// Logical window size.
    pub logical: (f32, f32),
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            drawable: (1, 1),
            logical: (1.0, 1.0),
        }
    }
}

impl DisplayMetrics {
    pub fn new(drawable: (u32, u32), logical: (f32, f32)) -> Self {
        Self { drawable, logical }
    }

    /// Reads the current metrics of `window`.
    pub fn from_window(window: &Window) -> Self {
        let phys = window.inner_size();
        let logical: winit::dpi::LogicalSize<f64> = phys.to_logical(window.scale_factor());
        Self {
            drawable: (phys.width, phys.height),
            logical: (logical.width as f32, logical.height as f32),
        }
    }

    /// Per-axis scale `drawable / logical`.
    ///
    /// An axis with a zero logical extent (minimized window) reports 1.0.
    pub fn scale_factor(&self) -> (f32, f32) {
        let axis = |phys: u32, logical: f32| {
            if logical > 0.0 {
                phys as f32 / logical
            } else {
                1.0
            }
        };
        (
            axis(self.drawable.0, self.logical.0),
            axis(self.drawable.1, self.logical.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_dpi_scale_is_one() {
        let m = DisplayMetrics::new((800, 600), (800.0, 600.0));
        assert_eq!(m.scale_factor(), (1.0, 1.0));
    }

    #[test]
    fn retina_scale_is_two() {
        let m = DisplayMetrics::new((1600, 1200), (800.0, 600.0));
        assert_eq!(m.scale_factor(), (2.0, 2.0));
    }

    #[test]
    fn axes_are_independent() {
        let m = DisplayMetrics::new((1200, 600), (800.0, 600.0));
        assert_eq!(m.scale_factor(), (1.5, 1.0));
    }

    #[test]
    fn zero_logical_size_reports_unit_scale() {
        let m = DisplayMetrics::new((0, 0), (0.0, 0.0));
        assert_eq!(m.scale_factor(), (1.0, 1.0));
    }
}
