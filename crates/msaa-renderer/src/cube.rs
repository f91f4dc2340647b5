//! Instanced textured cube grid

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use msaa_core::SampleCount;
use wgpu::util::DeviceExt;

use crate::config::SceneConfig;
use crate::constants::{grid, texture};

/// Vertex for cube rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct CubeVertex {
    /// Position in cube-local space
    pub position: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
}

impl CubeVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as u64,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Per-instance cube offset
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct CubeInstance {
    /// Translation of the cube center
    pub offset: [f32; 3],
}

impl CubeInstance {
    /// Instance attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3,
    }];

    /// Returns the instance buffer layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Scene uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    /// Combined projection * view * world matrix
    pub view_proj: [[f32; 4]; 4],
}

impl SceneUniform {
    /// Create a uniform from a matrix
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Generate a cube centered at the origin with per-face texture coordinates.
///
/// Returns 24 vertices (4 per face) and 36 indices.
pub fn generate_cube(size: f32) -> (Vec<CubeVertex>, Vec<u32>) {
    let h = size / 2.0;
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    let mut add_face = |corners: [[f32; 3]; 4]| {
        let base = vertices.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (position, uv) in corners.into_iter().zip(uvs) {
            vertices.push(CubeVertex { position, uv });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    };

    // +X
    add_face([[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]]);
    // -X
    add_face([[-h, h, -h], [-h, -h, -h], [-h, -h, h], [-h, h, h]]);
    // +Y
    add_face([[h, h, -h], [-h, h, -h], [-h, h, h], [h, h, h]]);
    // -Y
    add_face([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]);
    // +Z
    add_face([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]);
    // -Z
    add_face([[-h, h, -h], [h, h, -h], [h, -h, -h], [-h, -h, -h]]);

    (vertices, indices)
}

/// Offsets of a `grid_size` x `grid_size` grid in the XY plane, centered on the origin
pub fn grid_instances(grid_size: u32, spacing: f32) -> Vec<CubeInstance> {
    let half = (grid_size.saturating_sub(1)) as f32 / 2.0;
    (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| (x, y)))
        .map(|(x, y)| CubeInstance {
            offset: [(x as f32 - half) * spacing, (y as f32 - half) * spacing, 0.0],
        })
        .collect()
}

/// Generate an RGBA8 checkerboard of `size` x `size` texels with `cells` squares per side
pub fn generate_checker_texture(size: u32, cells: u32) -> Vec<u8> {
    let cell = (size / cells.max(1)).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            data.extend_from_slice(if light { &texture::LIGHT } else { &texture::DARK });
        }
    }
    data
}

/// Cube grid renderer
///
/// Geometry, texture and bindings are created once. The pipeline depends on
/// the sample count and is rebuilt by [`CubeRenderer::rebuild_pipeline`].
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: SampleCount,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl CubeRenderer {
    /// Create a new cube renderer
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: SampleCount,
        scene: &SceneConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cube Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Scene Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::new(Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture_data = generate_checker_texture(texture::SIZE, texture::CELLS);
        let cube_texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Cube Texture"),
                size: wgpu::Extent3d {
                    width: texture::SIZE,
                    height: texture::SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &texture_data,
        );
        let texture_view = cube_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Cube Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let (vertices, indices) = generate_cube(grid::CUBE_SIZE);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances = grid_instances(scene.clamped_grid_size(), scene.grid_spacing);
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            color_format,
            depth_format,
            sample_count,
        );

        tracing::info!(
            instances = instances.len(),
            %sample_count,
            "Cube renderer initialized"
        );

        Self {
            pipeline,
            pipeline_layout,
            shader,
            color_format,
            depth_format,
            sample_count,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            instance_count: instances.len() as u32,
        }
    }

    /// Sample count the current pipeline was built for
    pub fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    /// Rebuild the pipeline for a new sample count
    pub fn rebuild_pipeline(&mut self, device: &wgpu::Device, sample_count: SampleCount) {
        if sample_count == self.sample_count {
            return;
        }
        self.pipeline = create_pipeline(
            device,
            &self.pipeline_layout,
            &self.shader,
            self.color_format,
            self.depth_format,
            sample_count,
        );
        self.sample_count = sample_count;
        tracing::debug!(%sample_count, "Cube pipeline rebuilt");
    }

    /// Upload the combined view/projection matrix
    pub fn update_scene(&self, queue: &wgpu::Queue, view_proj: Mat4) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::new(view_proj)]),
        );
    }

    /// Draw every cube instance
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: SampleCount,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Cube Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[CubeVertex::layout(), CubeInstance::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count.get(),
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let (vertices, indices) = generate_cube(2.0);
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_cube_extents() {
        let (vertices, _) = generate_cube(2.0);
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 1.0));
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_grid_instances_centered() {
        let instances = grid_instances(7, 3.0);
        assert_eq!(instances.len(), 49);
        assert_eq!(instances[0].offset, [-9.0, -9.0, 0.0]);
        assert_eq!(instances[48].offset, [9.0, 9.0, 0.0]);
        assert_eq!(instances[24].offset, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_grid_instances_empty() {
        assert!(grid_instances(0, 3.0).is_empty());
    }

    #[test]
    fn test_checker_texture() {
        let data = generate_checker_texture(4, 2);
        assert_eq!(data.len(), 4 * 4 * 4);
        // texel (0, 0) light, (2, 0) dark, (2, 2) light
        assert_eq!(&data[0..4], &texture::LIGHT);
        assert_eq!(&data[8..12], &texture::DARK);
        let idx = (2 * 4 + 2) * 4;
        assert_eq!(&data[idx..idx + 4], &texture::LIGHT);
    }
}
