//! GPU mirror of the stamp [`TextureRegistry`].

use brushwork::{TextureId, TextureRegistry};

const STAMP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct GpuStamp {
    texture: wgpu::Texture,
    bind: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// One texture and bind group per registered stamp, indexed like the registry.
pub struct StampTextures {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    entries: Vec<GpuStamp>,
}

impl StampTextures {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Stamp Texture Layout"),
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
            label: Some("Stamp Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            layout,
            sampler,
            entries: Vec::new(),
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self, index: u32) -> Option<&wgpu::BindGroup> {
        self.entries.get(index as usize).map(|e| &e.bind)
    }

    /// Creates textures registered since the last call and uploads every
    /// dirty one. Returns how many were uploaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &mut TextureRegistry,
    ) -> brushwork::Result<usize> {
        for (_, tex) in registry.iter().skip(self.entries.len()) {
            let entry = self.create(device, tex.width(), tex.height());
            self.entries.push(entry);
        }

        let dirty: Vec<TextureId> = registry.dirty().map(|(id, _)| id).collect();
        for &id in &dirty {
            let tex = registry.get(id)?;
            let Some(gpu) = self.entries.get(id.index() as usize) else {
                continue;
            };
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &gpu.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                tex.pixels(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * gpu.width),
                    rows_per_image: Some(gpu.height),
                },
                wgpu::Extent3d {
                    width: gpu.width,
                    height: gpu.height,
                    depth_or_array_layers: 1,
                },
            );
            registry.mark_uploaded(id)?;
        }

        if !dirty.is_empty() {
            log::debug!("uploaded {} stamp textures", dirty.len());
        }
        Ok(dirty.len())
    }

    fn create(&self, device: &wgpu::Device, width: u32, height: u32) -> GpuStamp {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Stamp Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STAMP_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Stamp Texture Bind"),
            layout: &self.layout,
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
        GpuStamp {
            texture,
            bind,
            width,
            height,
        }
    }
}
