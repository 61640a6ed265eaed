//! The fixed shader pair.
//!
//! The vertex stage maps GUI pixels (bottom-left origin) to clip space using
//! the screen size uniform. The fragment stage multiplies the bound texture by
//! the vertex color.

use bytemuck::{Pod, Zeroable};

use crate::error::ShaderStage;

/// One stage of the program.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub label: &'static str,
    pub wgsl: &'static str,
    pub entry_point: &'static str,
}

pub const VERTEX_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Vertex,
    label: "glw vertex shader",
    entry_point: "vs_main",
    wgsl: r#"
struct Screen {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> screen: Screen;

struct VertexIn {
    @location(0) pos: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var out: VertexOut;
    // GL-style depth in [-1, 1] is remapped to wgpu's [0, 1].
    out.clip = vec4<f32>(
        2.0 * v.pos.x / screen.size.x - 1.0,
        2.0 * v.pos.y / screen.size.y - 1.0,
        v.pos.z * 0.5 + 0.5,
        1.0,
    );
    out.color = v.color;
    out.uv = v.uv;
    return out;
}
"#,
};

pub const FRAGMENT_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Fragment,
    label: "glw fragment shader",
    entry_point: "fs_main",
    wgsl: r#"
@group(1) @binding(0) var tex: texture_2d<f32>;
@group(1) @binding(1) var tex_sampler: sampler;

struct FragmentIn {
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@fragment
fn fs_main(in: FragmentIn) -> @location(0) vec4<f32> {
    return textureSample(tex, tex_sampler, in.uv) * in.color;
}
"#,
};

/// Screen size uniform (16-byte aligned).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ScreenUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl ScreenUniform {
    pub fn new(size: [f32; 2]) -> Self {
        Self { size, _pad: [0.0; 2] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
    }

    #[test]
    fn entry_points_are_present() {
        for src in [VERTEX_SHADER, FRAGMENT_SHADER] {
            assert!(src.wgsl.contains(&format!("fn {}(", src.entry_point)));
        }
    }

    #[test]
    fn vertex_stage_binds_the_three_attribute_locations() {
        for loc in 0..3 {
            assert!(VERTEX_SHADER.wgsl.contains(&format!("@location({loc})")));
        }
    }
}
