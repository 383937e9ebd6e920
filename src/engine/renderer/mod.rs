// Rendering system using wgpu

mod camera;
mod sprite;
mod texture;
mod vertex;

use camera::{Camera, CameraUniform};
use sprite::SpritePipeline;
use vertex::Vertex;

pub use sprite::{Sprite, SpriteBatch};
pub use texture::{TextureHandle, TextureManager};

use anyhow::Result;
use log::info;
use std::sync::Arc;
use winit::window::Window;

/// Color outside the canvas (letterbox bars)
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// A batch plus the scissor rectangle it is clipped to
pub struct RenderLayer<'a> {
    pub batch: &'a SpriteBatch,
    /// `(x, y, width, height)` in window pixels; `None` means the whole window
    pub scissor: Option<(u32, u32, u32, u32)>,
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    sprite_pipeline: SpritePipeline,
    texture_manager: TextureManager,
    camera: Camera,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_buffer: wgpu::Buffer,
    index_capacity: usize,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let texture_manager = TextureManager::new(&device);
        let sprite_pipeline =
            SpritePipeline::new(&device, surface_format, texture_manager.bind_group_layout());
        let camera = Camera::new(size.width as f32, size.height as f32);

        let vertex_capacity = 64;
        let index_capacity = 96;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);
        let index_buffer = create_index_buffer(&device, index_capacity);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_pipeline,
            texture_manager,
            camera,
            vertex_buffer,
            vertex_capacity,
            index_buffer,
            index_capacity,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera
                .resize(new_size.width as f32, new_size.height as f32);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Render a frame: each layer in order, clipped to its scissor rectangle
    pub fn render(&mut self, layers: &[RenderLayer<'_>]) -> Result<(), wgpu::SurfaceError> {
        self.upload(layers);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Update camera uniform
        let camera_uniform = CameraUniform::new(&self.camera);
        self.queue.write_buffer(
            self.sprite_pipeline.camera_buffer(),
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(self.sprite_pipeline.render_pipeline());
            render_pass.set_bind_group(0, self.sprite_pipeline.camera_bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut base_vertex = 0i32;
            let mut base_index = 0u32;
            for layer in layers {
                let (x, y, width, height) = clip_to_target(
                    layer.scissor,
                    self.config.width,
                    self.config.height,
                );

                if width > 0 && height > 0 && !layer.batch.is_empty() {
                    render_pass.set_scissor_rect(x, y, width, height);
                    for draw in layer.batch.draw_calls() {
                        let Some(bind_group) = self.texture_manager.bind_group(draw.texture)
                        else {
                            continue;
                        };
                        render_pass.set_bind_group(1, bind_group, &[]);
                        let start = base_index + draw.index_start;
                        render_pass.draw_indexed(
                            start..start + draw.index_count,
                            base_vertex,
                            0..1,
                        );
                    }
                }

                base_vertex += layer.batch.vertices().len() as i32;
                base_index += layer.batch.indices().len() as u32;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Copy every layer's geometry into the shared vertex and index buffers
    fn upload(&mut self, layers: &[RenderLayer<'_>]) {
        let vertex_count: usize = layers.iter().map(|l| l.batch.vertices().len()).sum();
        let index_count: usize = layers.iter().map(|l| l.batch.indices().len()).sum();

        if vertex_count > self.vertex_capacity {
            self.vertex_capacity = vertex_count.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if index_count > self.index_capacity {
            self.index_capacity = index_count.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.device, self.index_capacity);
        }

        let mut vertex_offset = 0u64;
        let mut index_offset = 0u64;
        for layer in layers {
            let vertices: &[u8] = bytemuck::cast_slice(layer.batch.vertices());
            let indices: &[u8] = bytemuck::cast_slice(layer.batch.indices());
            if !vertices.is_empty() {
                self.queue
                    .write_buffer(&self.vertex_buffer, vertex_offset, vertices);
            }
            if !indices.is_empty() {
                self.queue
                    .write_buffer(&self.index_buffer, index_offset, indices);
            }
            vertex_offset += vertices.len() as u64;
            index_offset += indices.len() as u64;
        }
    }

    /// Get a reference to the texture manager
    pub fn texture_manager(&self) -> &TextureManager {
        &self.texture_manager
    }

    /// Upload a decoded image as a texture
    pub fn upload_image(&mut self, img: &image::DynamicImage, label: &str) -> TextureHandle {
        self.texture_manager
            .add_image(&self.device, &self.queue, img, label)
    }

    /// Shared white texture for tinted quads
    pub fn white_texture(&mut self) -> TextureHandle {
        self.texture_manager.white(&self.device, &self.queue)
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }
}

/// Scissor rectangle restricted to the render target
fn clip_to_target(
    scissor: Option<(u32, u32, u32, u32)>,
    target_width: u32,
    target_height: u32,
) -> (u32, u32, u32, u32) {
    let (x, y, width, height) = scissor.unwrap_or((0, 0, target_width, target_height));
    let x = x.min(target_width);
    let y = y.min(target_height);
    (
        x,
        y,
        width.min(target_width - x),
        height.min(target_height - y),
    )
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<Vertex>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
