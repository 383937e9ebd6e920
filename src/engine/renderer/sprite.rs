// Sprite batching and the sprite render pipeline

use super::{CameraUniform, TextureHandle, Vertex};
use glam::{Mat4, Vec2, Vec4};
use wgpu::util::DeviceExt;

/// A 2D sprite for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Top-left corner in pixels
    pub position: Vec2,
    /// Drawn size in pixels (width, height)
    pub size: Vec2,
    /// Texture to sample
    pub texture: TextureHandle,
    /// Source rectangle `[x, y, width, height]` in texels (None = whole texture)
    pub source: Option<[u32; 4]>,
    /// Mirror around the vertical center line
    pub flip_horizontal: bool,
    /// Color tint (RGBA, 1.0 = full color)
    pub color: Vec4,
}

impl Sprite {
    /// Create a new sprite covering the whole texture
    pub fn new(position: Vec2, size: Vec2, texture: TextureHandle) -> Self {
        Self {
            position,
            size,
            texture,
            source: None,
            flip_horizontal: false,
            color: Vec4::ONE,
        }
    }

    /// Sample only part of the texture
    pub fn with_source(mut self, x: u32, y: u32, width: u32, height: u32) -> Self {
        self.source = Some([x, y, width, height]);
        self
    }

    pub fn with_flip_horizontal(mut self, flip: bool) -> Self {
        self.flip_horizontal = flip;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// UV rectangle `(u_min, v_min, u_max, v_max)` for a texture of the given size,
    /// with the u range swapped when mirrored
    pub fn uv_rect(&self, texture_size: (u32, u32)) -> (f32, f32, f32, f32) {
        let (tw, th) = (texture_size.0.max(1) as f32, texture_size.1.max(1) as f32);
        let [sx, sy, sw, sh] = self
            .source
            .unwrap_or([0, 0, texture_size.0, texture_size.1]);

        let u_min = sx as f32 / tw;
        let v_min = sy as f32 / th;
        let u_max = (sx + sw) as f32 / tw;
        let v_max = (sy + sh) as f32 / th;

        if self.flip_horizontal {
            (u_max, v_min, u_min, v_max)
        } else {
            (u_min, v_min, u_max, v_max)
        }
    }
}

/// A run of indices drawn with one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureHandle,
    pub index_start: u32,
    pub index_count: u32,
}

/// CPU-side geometry for one frame's worth of sprites
#[derive(Debug, Default)]
pub struct SpriteBatch {
    origin: Vec2,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    /// Create a batch whose sprite positions are relative to `origin`
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Append one quad
    pub fn push(&mut self, sprite: &Sprite, texture_size: (u32, u32)) {
        let (u_min, v_min, u_max, v_max) = sprite.uv_rect(texture_size);
        let min = self.origin + sprite.position;
        let max = min + sprite.size;
        let base = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            Vertex::new(min, Vec2::new(u_min, v_min), sprite.color),
            Vertex::new(Vec2::new(max.x, min.y), Vec2::new(u_max, v_min), sprite.color),
            Vertex::new(max, Vec2::new(u_max, v_max), sprite.color),
            Vertex::new(Vec2::new(min.x, max.y), Vec2::new(u_min, v_max), sprite.color),
        ]);

        let index_start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

        // Consecutive quads sharing a texture collapse into one draw
        if let Some(last) = self.draw_calls.last_mut() {
            if last.texture == sprite.texture && last.index_start + last.index_count == index_start
            {
                last.index_count += 6;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture: sprite.texture,
            index_start,
            index_count: 6,
        });
    }

    /// Append every sprite, looking up texture sizes as needed.
    /// Sprites whose texture is unknown are skipped.
    pub fn extend<I, F>(&mut self, sprites: I, texture_size: F)
    where
        I: IntoIterator<Item = Sprite>,
        F: Fn(TextureHandle) -> Option<(u32, u32)>,
    {
        for sprite in sprites {
            if let Some(size) = texture_size(sprite.texture) {
                self.push(&sprite, size);
            }
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn is_empty(&self) -> bool {
        self.draw_calls.is_empty()
    }

    /// Get the number of sprites queued for rendering
    #[cfg(test)]
    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Render pipeline plus the camera uniform it reads
pub struct SpritePipeline {
    render_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl SpritePipeline {
    /// Create a new sprite pipeline
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        // Create camera bind group layout
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        // Create pipeline layout
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Create render pipeline
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Quads are wound in y-down screen space
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // Create camera buffer
        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            render_pipeline,
            camera_buffer,
            camera_bind_group,
        }
    }

    pub fn render_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.render_pipeline
    }

    pub fn camera_bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }

    /// Get a reference to the camera buffer
    pub fn camera_buffer(&self) -> &wgpu::Buffer {
        &self.camera_buffer
    }
}
