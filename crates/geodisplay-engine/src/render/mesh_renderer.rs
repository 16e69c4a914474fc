use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::backend::Frame;
use crate::coords::Rect;
use crate::geometry::Vertex;
use crate::text::{AtlasImage, ATLAS_SIZE};
use crate::view::ViewState;

use super::{RenderCtx, RenderTarget};

// ── GPU types ─────────────────────────────────────────────────────────────

/// Vertex layout (32 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  color  [f32; 4]   loc 1
///  offset 24  uv     [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    pos: [f32; 2],
    color: [f32; 4],
    uv: [f32; 2],
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<&Vertex> for GpuVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            pos: [v.position.x, v.position.y],
            color: v.color.to_array(),
            uv: v.texcoord,
        }
    }
}

/// Rows of the view -> NDC affine map, padded to vec4.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewUniform {
    row0: [f32; 4],
    row1: [f32; 4],
}

impl ViewUniform {
    fn from_view(view: &ViewState) -> Self {
        let [r0, r1] = view.ndc_affine();
        Self {
            row0: [r0[0], r0[1], r0[2], 0.0],
            row1: [r1[0], r1[1], r1[2], 0.0],
        }
    }
}

const VIEW_UNIFORM_SIZE: u64 = std::mem::size_of::<ViewUniform>() as u64;

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

struct DrawRange {
    vertices: Range<u32>,
    uniform_offset: u32,
    scissor: (u32, u32, u32, u32),
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws every layer of a [`Frame`] in one render pass.
///
/// Each layer gets its own slot in a dynamic-offset uniform buffer holding
/// its view transform, and its own scissor rectangle. The glyph atlas is
/// re-uploaded whenever its generation changes.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    uploaded_atlas: Option<u64>,

    view_ubo: Option<wgpu::Buffer>,
    view_slots: usize,

    vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    vertices: Vec<GpuVertex>,
    uniforms: Vec<u8>,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the target to the frame's clear color and draws its layers.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &Frame<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_atlas(ctx);
        if let Some(atlas) = frame.atlas {
            self.upload_atlas(ctx, atlas);
        }

        let align = wgpu::util::align_to(
            VIEW_UNIFORM_SIZE,
            u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment),
        ) as usize;

        self.vertices.clear();
        self.uniforms.clear();
        let mut draws = Vec::with_capacity(frame.layers.len());

        for layer in &frame.layers {
            if layer.mesh.is_empty() {
                continue;
            }
            let Some(scissor) = scissor_rect(layer.clip, ctx.scale, ctx.target_size) else {
                continue;
            };

            let start = self.vertices.len() as u32;
            self.vertices.extend(layer.mesh.vertices().iter().map(GpuVertex::from));
            let end = self.vertices.len() as u32;

            let offset = self.uniforms.len();
            self.uniforms
                .extend_from_slice(bytemuck::bytes_of(&ViewUniform::from_view(&layer.view)));
            self.uniforms.resize(offset + align, 0);

            draws.push(DrawRange {
                vertices: start..end,
                uniform_offset: offset as u32,
                scissor,
            });
        }

        self.ensure_vertex_capacity(ctx, self.vertices.len());
        self.ensure_view_slots(ctx, draws.len(), align);
        self.ensure_bind_group(ctx);

        if !draws.is_empty() {
            if let (Some(vbo), Some(ubo)) = (self.vbo.as_ref(), self.view_ubo.as_ref()) {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
                ctx.queue.write_buffer(ubo, 0, &self.uniforms);
            }
        }

        let [r, g, b, a] = frame.clear.to_array();
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("geodisplay mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: f64::from(a),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if draws.is_empty() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        for draw in &draws {
            let (x, y, w, h) = draw.scissor;
            rpass.set_scissor_rect(x, y, w, h);
            rpass.set_bind_group(0, bind_group, &[draw.uniform_offset]);
            rpass.draw(draw.vertices.clone(), 0..1);
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("geodisplay mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("geodisplay mesh bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(VIEW_UNIFORM_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("geodisplay mesh pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("geodisplay mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Shapes arrive in either winding.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("geodisplay atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("geodisplay glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.uploaded_atlas = None;
        self.bind_group = None;
    }

    fn upload_atlas(&mut self, ctx: &RenderCtx<'_>, atlas: AtlasImage<'_>) {
        if self.uploaded_atlas == Some(atlas.generation) {
            return;
        }
        let Some(texture) = self.atlas_texture.as_ref() else { return };
        if atlas.pixels.len() != (ATLAS_SIZE * ATLAS_SIZE) as usize {
            log::warn!("MeshRenderer: atlas image has {} bytes, skipping upload", atlas.pixels.len());
            return;
        }

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(ATLAS_SIZE),
                rows_per_image: Some(ATLAS_SIZE),
            },
            wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
        );
        self.uploaded_atlas = Some(atlas.generation);
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vertex_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(1024);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("geodisplay mesh vbo"),
            size: (new_cap * std::mem::size_of::<GpuVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }

    fn ensure_view_slots(&mut self, ctx: &RenderCtx<'_>, required: usize, align: usize) {
        if required <= self.view_slots && self.view_ubo.is_some() {
            return;
        }
        let new_slots = required.next_power_of_two().max(8);
        self.view_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("geodisplay view ubo"),
            size: (new_slots * align) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.view_slots = new_slots;
        self.bind_group = None;
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(ubo) = self.view_ubo.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("geodisplay mesh bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: ubo,
                        offset: 0,
                        size: wgpu::BufferSize::new(VIEW_UNIFORM_SIZE),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical clip rect to a physical scissor rect `(x, y, w, h)`
/// clamped to the target.
///
/// `None` clips to the whole target. A zero-area result returns `None`
/// (the layer is skipped).
fn scissor_rect(clip: Option<Rect>, scale: f32, target: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let (tw, th) = target;
    let (x, y, w, h) = match clip {
        None => (0, 0, tw, th),
        Some(r) => {
            let to_px = |v: f32, max: u32| ((v * scale).round().max(0.0) as u32).min(max);
            let x = to_px(r.origin.x, tw);
            let y = to_px(r.origin.y, th);
            let x2 = to_px(r.origin.x + r.size.x, tw);
            let y2 = to_px(r.origin.y + r.size.y, th);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };
    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn gpu_types_have_expected_layout() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 32);
        assert_eq!(VIEW_UNIFORM_SIZE, 32);
    }

    #[test]
    fn vertex_conversion_keeps_texcoord() {
        let v = Vertex::solid(Vec2::new(1.0, 2.0), Color::RED);
        let g = GpuVertex::from(&v);
        assert_eq!(g.pos, [1.0, 2.0]);
        assert_eq!(g.color, Color::RED.to_array());
        assert_eq!(g.uv, crate::geometry::NO_TEXCOORD);
    }

    #[test]
    fn uniform_rows_match_view_affine() {
        let view = ViewState::screen(200.0, 100.0);
        let u = ViewUniform::from_view(&view);
        let [r0, r1] = view.ndc_affine();
        assert_eq!(&u.row0[..3], &r0[..]);
        assert_eq!(&u.row1[..3], &r1[..]);
    }

    // ── scissor ───────────────────────────────────────────────────────────

    #[test]
    fn no_clip_covers_target() {
        assert_eq!(scissor_rect(None, 2.0, (1000, 800)), Some((0, 0, 1000, 800)));
    }

    #[test]
    fn clip_is_scaled_to_physical_pixels() {
        let clip = Rect::new(50.0, 50.0, 400.0, 400.0);
        assert_eq!(scissor_rect(Some(clip), 2.0, (1000, 1000)), Some((100, 100, 800, 800)));
    }

    #[test]
    fn clip_is_clamped_to_target() {
        let clip = Rect::new(-10.0, 90.0, 50.0, 50.0);
        assert_eq!(scissor_rect(Some(clip), 1.0, (100, 100)), Some((0, 90, 40, 10)));
    }

    #[test]
    fn empty_clip_is_skipped() {
        let clip = Rect::new(50.0, 50.0, 0.0, 0.0);
        assert_eq!(scissor_rect(Some(clip), 1.0, (100, 100)), None);
    }
}
