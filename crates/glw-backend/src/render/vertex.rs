use bytemuck::{Pod, Zeroable};

/// GUI vertex as consumed by the fixed pipeline.
///
/// Layout (24 bytes):
///
///  offset  0  pos    [f32; 3]   loc 0
///  offset 12  color  [u8; 4]    loc 1  (normalized to 0..1)
///  offset 16  uv     [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [u8; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const POSITION_LOCATION: u32 = 0;
    pub const COLOR_LOCATION: u32 = 1;
    pub const TEXCOORD_LOCATION: u32 = 2;

    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Unorm8x4,  // color
        2 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(pos: [f32; 3], color: [u8; 4], uv: [f32; 2]) -> Self {
        Self { pos, color, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_is_packed_24_bytes() {
        assert_eq!(size_of::<Vertex>(), 24);
        assert_eq!(offset_of!(Vertex, pos), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, uv), 16);
    }

    #[test]
    fn attribute_offsets_match_struct() {
        let attrs = Vertex::ATTRS;
        assert_eq!(attrs[0].shader_location, Vertex::POSITION_LOCATION);
        assert_eq!(attrs[1].shader_location, Vertex::COLOR_LOCATION);
        assert_eq!(attrs[2].shader_location, Vertex::TEXCOORD_LOCATION);
        assert_eq!(attrs[1].offset, offset_of!(Vertex, color) as u64);
        assert_eq!(attrs[2].offset, offset_of!(Vertex, uv) as u64);
        assert_eq!(Vertex::layout().array_stride, 24);
    }
}
