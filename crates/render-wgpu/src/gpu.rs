use crate::shaders;
use crate::textures::{SurfaceTexture, TextureError};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use ripplefx_render::{MeshBuffers, POSITION_ATTRIBUTE, RenderAdapter, TEXCOORD_ATTRIBUTE};
use std::sync::Arc;
use tracing::{debug, error, trace};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    mvp_matrix: [[f32; 4]; 4],
}

/// Linear filtering with repeat addressing, so texture coordinates pushed
/// past the edge by a ripple wrap around instead of smearing the border.
fn sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("ripple_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    }
}

/// Compiled ripple program: pipeline, uniforms, and the selectable textures.
///
/// This is the program handle passed to [`RenderAdapter::draw`].
pub struct RipplePipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<(String, wgpu::BindGroup)>,
    active: usize,
}

impl RipplePipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        textures: &[SurfaceTexture],
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ripple_uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                mvp_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ripple_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ripple_texture_layout"),
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

        let sampler = device.create_sampler(&sampler_descriptor());

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ripple_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::RIPPLE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ripple_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vec3>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: POSITION_ATTRIBUTE.location,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vec2>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: TEXCOORD_ATTRIBUTE.location,
                        }],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint16),
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let mut program = Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            textures: Vec::new(),
            active: 0,
        };
        for texture in textures {
            if let Err(e) = program.add_texture(device, queue, texture) {
                error!("skipping texture: {e}");
            }
        }
        if program.textures.is_empty() {
            let fallback = SurfaceTexture::checkerboard(
                64,
                8,
                [255, 255, 255, 255],
                [128, 128, 128, 255],
            );
            if let Err(e) = program.add_texture(device, queue, &fallback) {
                error!("fallback texture rejected: {e}");
            }
        }
        program
    }

    /// Upload a texture and make it selectable. Returns its index.
    ///
    /// Textures wider or taller than the device's `max_texture_dimension_2d`
    /// are refused with [`TextureError::TooLarge`].
    pub fn add_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &SurfaceTexture,
    ) -> Result<usize, TextureError> {
        image.check_fits(device.limits().max_texture_dimension_2d)?;
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(image.name.as_str()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        debug!(name = %image.name, width = image.width, height = image.height, "texture uploaded");
        self.textures.push((image.name.clone(), bind_group));
        Ok(self.textures.len() - 1)
    }

    /// Switch the sampled texture. Out-of-range indices are ignored.
    pub fn select_texture(&mut self, index: usize) -> bool {
        if index < self.textures.len() && index != self.active {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn active_texture(&self) -> usize {
        self.active
    }

    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(|(name, _)| name.as_str())
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn set_view_projection(&self, queue: &wgpu::Queue, mvp: Mat4) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                mvp_matrix: mvp.to_cols_array_2d(),
            }),
        );
    }
}

/// Render adapter backed by wgpu vertex and index buffers.
pub struct WgpuRippleAdapter {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    position_buffer: Option<wgpu::Buffer>,
    texcoord_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    clear_color: wgpu::Color,
}

impl WgpuRippleAdapter {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            position_buffer: None,
            texcoord_buffer: None,
            index_buffer: None,
            index_count: 0,
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    pub fn is_uploaded(&self) -> bool {
        self.index_buffer.is_some()
    }

    fn vertex_buffer(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}

impl RenderAdapter for WgpuRippleAdapter {
    type Program = RipplePipeline;
    type Target = wgpu::TextureView;

    fn upload_mesh(&mut self, mesh: &MeshBuffers<'_>) {
        self.position_buffer = Some(self.vertex_buffer(
            "ripple_position_buffer",
            bytemuck::cast_slice(mesh.positions),
        ));
        self.texcoord_buffer = Some(self.vertex_buffer(
            "ripple_texcoord_buffer",
            bytemuck::cast_slice(mesh.texcoords),
        ));
        self.index_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("ripple_index_buffer"),
                contents: bytemuck::cast_slice(mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.index_count = mesh.index_count();
        debug!(
            vertices = mesh.vertex_count(),
            indices = self.index_count,
            "mesh uploaded"
        );
    }

    fn write_positions(&mut self, positions: &[Vec3]) {
        if let Some(buffer) = &self.position_buffer {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(positions));
        }
    }

    fn write_texcoords(&mut self, texcoords: &[Vec2]) {
        if let Some(buffer) = &self.texcoord_buffer {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(texcoords));
        }
    }

    fn draw(&mut self, program: &RipplePipeline, target: &wgpu::TextureView, _mesh: &MeshBuffers<'_>) {
        let (Some(positions), Some(texcoords), Some(indices)) = (
            &self.position_buffer,
            &self.texcoord_buffer,
            &self.index_buffer,
        ) else {
            trace!("draw skipped: mesh not uploaded");
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ripple_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ripple_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            pass.set_pipeline(&program.pipeline);
            pass.set_bind_group(0, &program.uniform_bind_group, &[]);
            if let Some((_, texture)) = program.textures.get(program.active) {
                pass.set_bind_group(1, texture, &[]);
            }
            pass.set_vertex_buffer(0, positions.slice(..));
            pass.set_vertex_buffer(1, texcoords.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampler_wraps_texture_coordinates() {
        let desc = sampler_descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
    }

    #[test]
    fn uniforms_match_mat4_layout() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 64);
    }
}
