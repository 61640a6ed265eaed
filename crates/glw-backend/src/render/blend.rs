/// Blend configurations the GUI layer can select.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Blending off; fragments overwrite the target.
    #[default]
    None,
    /// Additive, used when compositing glyphs.
    Text,
    /// Standard alpha blending, used for filled rects.
    Rect,
}

/// Fixed-function blend state: enable flag plus source/destination factors.
///
/// The same factors apply to color and alpha.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendFunc {
    pub enabled: bool,
    pub src: wgpu::BlendFactor,
    pub dst: wgpu::BlendFactor,
}

impl BlendFunc {
    pub const DISABLED: BlendFunc = BlendFunc {
        enabled: false,
        src: wgpu::BlendFactor::One,
        dst: wgpu::BlendFactor::Zero,
    };

    /// Blend state for a color target; `None` when blending is off.
    pub fn to_blend_state(self) -> Option<wgpu::BlendState> {
        if !self.enabled {
            return None;
        }
        let component = wgpu::BlendComponent {
            src_factor: self.src,
            dst_factor: self.dst,
            operation: wgpu::BlendOperation::Add,
        };
        Some(wgpu::BlendState {
            color: component,
            alpha: component,
        })
    }
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self::DISABLED
    }
}

impl BlendMode {
    pub fn func(self) -> BlendFunc {
        match self {
            BlendMode::None => BlendFunc::DISABLED,
            BlendMode::Text => BlendFunc {
                enabled: true,
                src: wgpu::BlendFactor::One,
                dst: wgpu::BlendFactor::One,
            },
            BlendMode::Rect => BlendFunc {
                enabled: true,
                src: wgpu::BlendFactor::SrcAlpha,
                dst: wgpu::BlendFactor::OneMinusSrcAlpha,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::BlendFactor as F;

    #[test]
    fn none_disables_blending() {
        let f = BlendMode::None.func();
        assert!(!f.enabled);
        assert!(f.to_blend_state().is_none());
    }

    #[test]
    fn text_is_additive() {
        let f = BlendMode::Text.func();
        assert_eq!((f.enabled, f.src, f.dst), (true, F::One, F::One));
    }

    #[test]
    fn rect_is_source_over() {
        let f = BlendMode::Rect.func();
        assert_eq!((f.enabled, f.src, f.dst), (true, F::SrcAlpha, F::OneMinusSrcAlpha));

        let state = f.to_blend_state().unwrap();
        assert_eq!(state.color, state.alpha);
        assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
    }
}
