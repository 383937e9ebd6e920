// Texture upload and management
//
// Every texture is sampled with nearest-neighbour filtering so scaled pixel
// art stays crisp.

use image::GenericImageView;

/// Handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) usize);

/// A loaded texture with GPU resources
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    /// Create a texture from an image
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(device, queue, &rgba, width, height, label)
    }

    /// Create a 1x1 solid color texture
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [u8; 4],
        label: Option<&str>,
    ) -> Self {
        Self::from_rgba(device, queue, &color, 1, 1, label)
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&pixel_art_sampler());

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Pixel dimensions
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// Layout shared by every sprite texture bind group
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        })
    }

    fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: Option<&str>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

/// Nearest-neighbour sampling with clamped edges
pub fn pixel_art_sampler() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("Pixel Art Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}

/// Owns every uploaded texture and its bind group
pub struct TextureManager {
    layout: wgpu::BindGroupLayout,
    textures: Vec<Texture>,
    bind_groups: Vec<wgpu::BindGroup>,
    white: Option<TextureHandle>,
}

impl TextureManager {
    /// Create a new texture manager
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            layout: Texture::bind_group_layout(device),
            textures: Vec::new(),
            bind_groups: Vec::new(),
            white: None,
        }
    }

    /// Upload a decoded image
    pub fn add_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
    ) -> TextureHandle {
        let texture = Texture::from_image(device, queue, img, Some(label));
        self.insert(device, texture, label)
    }

    /// Shared 1x1 white texture, used for untextured tinted quads
    pub fn white(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> TextureHandle {
        if let Some(handle) = self.white {
            return handle;
        }
        let texture = Texture::from_color(device, queue, [255; 4], Some("White"));
        let handle = self.insert(device, texture, "White");
        self.white = Some(handle);
        handle
    }

    fn insert(&mut self, device: &wgpu::Device, texture: Texture, label: &str) -> TextureHandle {
        let bind_group = texture.bind_group(device, &self.layout, Some(label));
        let handle = TextureHandle(self.textures.len());
        self.textures.push(texture);
        self.bind_groups.push(bind_group);
        log::debug!("Uploaded texture '{}' as {:?}", label, handle);
        handle
    }

    /// Get a texture by handle
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    /// Pixel dimensions of a texture
    pub fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.get(handle).map(Texture::size)
    }

    /// Bind group for a texture
    pub fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(handle.0)
    }

    /// Layout the sprite pipeline must be built against
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }
}
