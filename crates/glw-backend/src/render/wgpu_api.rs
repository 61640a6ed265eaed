use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

use crate::device::{log_uncaptured_errors, scoped};
use crate::error::{BackendError, Result};

use super::shader::ScreenUniform;
use super::texture::rgb_to_rgba;
use super::{
    BlendFunc, GraphicsApi, PixelFormat, ScissorRect, ShaderSource, TextureId, TextureRegion,
    TextureUpload, Vertex,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MIN_VERTEX_CAPACITY: usize = 1024;
const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

/// Surface frame the renderer draws into.
pub struct FrameTarget {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    /// Target size in physical pixels.
    pub size: (u32, u32),
}

/// [`GraphicsApi`] on wgpu.
///
/// GL-style state (blend, scissor, viewport, bound texture) is tracked on the
/// CPU and baked into one render pass per draw. Pipelines are created lazily,
/// one per blend function.
///
/// Buffer writes land at submit time, so each begin/end cycle within a frame
/// uploads behind the previous one instead of at offset zero.
pub struct WgpuApi {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,

    // textures
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,
    next_texture: u32,

    // program
    program: Option<Program>,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    max_vertices: usize,
    /// First vertex of the current cycle's upload.
    cycle_base: u32,
    /// Vertices of the current cycle visible to draws.
    uploaded: u32,
    /// End of the vertex data written for the attached frame.
    frame_used: u32,
    max_texture_side: u32,

    depth: Option<DepthTarget>,
    state: DrawState,

    target: Option<FrameTarget>,
    warned_no_target: bool,
}

struct Program {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    vertex_entry: &'static str,
    fragment_entry: &'static str,
    layout: wgpu::PipelineLayout,
    screen_ubo: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    pipelines: HashMap<BlendFunc, wgpu::RenderPipeline>,
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct DepthTarget {
    view: wgpu::TextureView,
    size: (u32, u32),
}

#[derive(Debug, Default)]
struct DrawState {
    viewport: (u32, u32),
    blend: BlendFunc,
    scissor_enabled: bool,
    scissor: ScissorRect,
    bound_texture: Option<TextureId>,
    program_bound: bool,
    clear_depth: bool,
}

impl WgpuApi {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        log_uncaptured_errors(&device);
        let limits = device.limits();

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glw texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glw sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Sampled when no texture is bound, so untextured meshes show vertex color.
        let white = allocate_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            "glw white texture",
            1,
            1,
            &[0xff; 4],
        );

        Self {
            device,
            queue,
            color_format,
            texture_layout,
            sampler,
            white,
            textures: HashMap::new(),
            next_texture: 0,
            program: None,
            vertex_buffer: None,
            vertex_capacity: 0,
            max_vertices: (limits.max_buffer_size / VERTEX_SIZE).min(u32::MAX as u64) as usize,
            cycle_base: 0,
            uploaded: 0,
            frame_used: 0,
            max_texture_side: limits.max_texture_dimension_2d,
            depth: None,
            state: DrawState::default(),
            target: None,
            warned_no_target: false,
        }
    }

    /// Hands the frame being recorded to the API. Draws go into it until
    /// [`detach_frame`](Self::detach_frame).
    pub fn attach_frame(&mut self, target: FrameTarget) {
        self.target = Some(target);
        self.warned_no_target = false;
        self.reset_vertex_cursor();
    }

    /// Takes the frame back for submission.
    pub fn detach_frame(&mut self) -> Option<FrameTarget> {
        self.reset_vertex_cursor();
        self.target.take()
    }

    fn reset_vertex_cursor(&mut self) {
        self.cycle_base = 0;
        self.uploaded = 0;
        self.frame_used = 0;
    }

    /// Makes room for `count` vertices at the current cycle base.
    ///
    /// A replacement buffer starts empty, so the cycle restarts at its front;
    /// passes already recorded keep the old buffer alive. Returns false when
    /// `count` exceeds the device's buffer size limit.
    fn reserve_vertices(&mut self, count: usize) -> bool {
        if count > self.max_vertices {
            log::error!(
                "mesh of {count} vertices exceeds the vertex buffer limit of {}",
                self.max_vertices
            );
            return false;
        }
        if self.vertex_buffer.is_some() && self.cycle_base as usize + count <= self.vertex_capacity {
            return true;
        }

        let new_cap = count
            .next_power_of_two()
            .max(MIN_VERTEX_CAPACITY)
            .min(self.max_vertices);
        self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glw vertex buffer"),
            size: new_cap as u64 * VERTEX_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
        self.cycle_base = 0;
        log::debug!("vertex buffer grown to {new_cap} vertices");
        true
    }

    fn ensure_depth(&mut self, size: (u32, u32)) {
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glw depth"),
            size: wgpu::Extent3d {
                width: size.0.max(1),
                height: size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth = Some(DepthTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size,
        });
        // Fresh depth contents are undefined.
        self.state.clear_depth = true;
    }

    fn ensure_pipeline(&mut self, func: BlendFunc) {
        let Some(program) = self.program.as_mut() else { return };
        if program.pipelines.contains_key(&func) {
            return;
        }
        let pipeline = program.build_pipeline(&self.device, self.color_format, func);
        program.pipelines.insert(func, pipeline);
    }
}

impl Program {
    fn build_pipeline(
        &self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        func: BlendFunc,
    ) -> wgpu::RenderPipeline {
        log::debug!("building pipeline for {func:?}");

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glw pipeline"),
            layout: Some(&self.layout),

            vertex: wgpu::VertexState {
                module: &self.vertex,
                entry_point: Some(self.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.fragment,
                entry_point: Some(self.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: func.to_blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

impl GraphicsApi for WgpuApi {
    fn create_program(&mut self, vertex: &ShaderSource, fragment: &ShaderSource) -> Result<()> {
        let vertex_module = compile_module(&self.device, vertex)?;
        let fragment_module = compile_module(&self.device, fragment)?;

        let screen_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glw screen bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ScreenUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let screen_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glw screen ubo"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let screen_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glw screen bind group"),
            layout: &screen_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_ubo.as_entire_binding(),
            }],
        });

        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glw pipeline layout"),
            bind_group_layouts: &[&screen_layout, &self.texture_layout],
            immediate_size: 0,
        });

        self.program = Some(Program {
            vertex: vertex_module,
            fragment: fragment_module,
            vertex_entry: vertex.entry_point,
            fragment_entry: fragment.entry_point,
            layout,
            screen_ubo,
            screen_bind_group,
            pipelines: HashMap::new(),
        });
        self.reserve_vertices(MIN_VERTEX_CAPACITY);
        self.ensure_pipeline(self.state.blend);

        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.state.viewport = (width, height);
    }

    fn begin_frame(&mut self, screen_size: [f32; 2]) {
        let Some(program) = self.program.as_ref() else {
            log::warn!("begin_frame without a program");
            return;
        };

        let uniform = ScreenUniform::new([screen_size[0].max(1.0), screen_size[1].max(1.0)]);
        self.queue
            .write_buffer(&program.screen_ubo, 0, bytemuck::bytes_of(&uniform));

        self.state.program_bound = true;
        self.state.clear_depth = true;
        self.cycle_base = self.frame_used;
        self.uploaded = 0;
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.uploaded = 0;
        if vertices.is_empty() || !self.reserve_vertices(vertices.len()) {
            return;
        }
        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        let offset = self.cycle_base as u64 * VERTEX_SIZE;
        self.queue.write_buffer(vbo, offset, bytemuck::cast_slice(vertices));

        self.uploaded = vertices.len() as u32;
        self.frame_used = self.cycle_base + self.uploaded;
    }

    fn draw_triangles(&mut self, range: Range<u32>) {
        if range.is_empty() {
            return;
        }
        if !self.state.program_bound {
            log::warn!("draw issued outside begin/end; ignored");
            return;
        }
        if range.end > self.uploaded {
            log::warn!("draw range {range:?} exceeds the {} uploaded vertices", self.uploaded);
            return;
        }
        let Some(size) = self.target.as_ref().map(|t| t.size) else {
            if !self.warned_no_target {
                log::warn!("{}; draws are dropped", BackendError::NoFrame);
                self.warned_no_target = true;
            }
            return;
        };

        self.ensure_depth(size);
        self.ensure_pipeline(self.state.blend);

        // Mutations done; take the borrows needed for the pass.
        let Some(program) = self.program.as_ref() else { return };
        let Some(pipeline) = program.pipelines.get(&self.state.blend) else { return };
        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        let Some(depth) = self.depth.as_ref() else { return };
        let texture_bind_group = match self.state.bound_texture.and_then(|id| self.textures.get(&id)) {
            Some(t) => &t.bind_group,
            None => &self.white.bind_group,
        };

        // Viewport and scissor are bottom-left anchored; wgpu is top-left.
        let vw = self.state.viewport.0.min(size.0);
        let vh = self.state.viewport.1.min(size.1);
        if vw == 0 || vh == 0 {
            return;
        }
        let scissor = if self.state.scissor_enabled {
            match self.state.scissor.to_framebuffer(size) {
                Some(rect) => Some(rect),
                None => return, // fully clipped
            }
        } else {
            None
        };

        let depth_load = if self.state.clear_depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };
        self.state.clear_depth = false;

        let Some(target) = self.target.as_mut() else { return };
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glw mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &program.screen_bind_group, &[]);
        rpass.set_bind_group(1, texture_bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_viewport(0.0, (size.1 - vh) as f32, vw as f32, vh as f32, 0.0, 1.0);
        if let Some((x, y, w, h)) = scissor {
            rpass.set_scissor_rect(x, y, w, h);
        }
        let base = self.cycle_base;
        rpass.draw(range.start + base..range.end + base, 0..1);
    }

    fn set_blend(&mut self, func: BlendFunc) {
        self.state.blend = func;
    }

    fn enable_scissor(&mut self, enabled: bool) {
        self.state.scissor_enabled = enabled;
    }

    fn set_scissor_rect(&mut self, rect: ScissorRect) {
        self.state.scissor = rect;
    }

    fn end_frame(&mut self) {
        self.state.program_bound = false;
    }

    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureId> {
        let (width, height) = (upload.width, upload.height);
        if width == 0 || height == 0 || width > self.max_texture_side || height > self.max_texture_side {
            return Err(BackendError::InvalidTextureSize { width, height });
        }

        let expected = width as usize * height as usize * upload.format.bytes_per_pixel();
        if upload.pixels.len() != expected {
            return Err(BackendError::PixelSizeMismatch {
                expected,
                actual: upload.pixels.len(),
            });
        }

        let rgba: Cow<'_, [u8]> = match upload.format {
            PixelFormat::Rgb => Cow::Owned(rgb_to_rgba(&upload.pixels)),
            PixelFormat::Rgba => Cow::Borrowed(&upload.pixels[..]),
        };

        let (gpu, err) = scoped(&self.device, || {
            allocate_texture(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                "glw texture",
                width,
                height,
                &rgba,
            )
        });
        if let Some(message) = err {
            return Err(BackendError::Validation {
                op: "texture creation",
                message,
            });
        }

        self.next_texture += 1;
        let id = TextureId::from_raw(self.next_texture);
        self.textures.insert(id, gpu);

        // Creation leaves the new texture bound.
        self.state.bound_texture = Some(id);
        Ok(id)
    }

    fn update_texture(&mut self, id: TextureId, region: TextureRegion, rgba: &[u8]) -> Result<()> {
        let tex = self.textures.get(&id).ok_or(BackendError::UnknownTexture(id))?;

        if !region.fits_within(tex.texture.width(), tex.texture.height()) {
            return Err(BackendError::RegionOutOfBounds {
                id,
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            });
        }
        if region.width == 0 || region.height == 0 {
            return Ok(());
        }

        write_rgba(
            &self.queue,
            &tex.texture,
            wgpu::Origin3d { x: region.x, y: region.y, z: 0 },
            region.width,
            region.height,
            rgba,
        );
        self.state.bound_texture = Some(id);
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_none() {
            log::debug!("delete of unknown texture {id:?} ignored");
            return;
        }
        if self.state.bound_texture == Some(id) {
            self.state.bound_texture = None;
        }
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        if !self.textures.contains_key(&id) {
            return Err(BackendError::UnknownTexture(id));
        }
        self.state.bound_texture = Some(id);
        Ok(())
    }
}

/// Creates a shader module and reports compiler errors with their positions.
fn compile_module(device: &wgpu::Device, src: &ShaderSource) -> Result<wgpu::ShaderModule> {
    let (module, scope_err) = scoped(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(src.label),
            source: wgpu::ShaderSource::Wgsl(src.wgsl.into()),
        })
    });

    let info = pollster::block_on(module.get_compilation_info());
    let mut errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();
    if errors.is_empty() {
        errors.extend(scope_err);
    }

    if !errors.is_empty() {
        return Err(BackendError::ShaderCompile {
            stage: src.stage,
            log: errors.join("\n"),
        });
    }

    log::debug!("compiled {}", src.label);
    Ok(module)
}

#[allow(clippy::too_many_arguments)]
fn allocate_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    write_rgba(queue, &texture, wgpu::Origin3d::ZERO, width, height, rgba);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture { texture, bind_group }
}

fn write_rgba(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    origin: wgpu::Origin3d,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}
