//! Canvas-sized render targets: the persistent painting surface and the UI
//! overlay. Neither depends on the window size.

pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

pub struct Targets {
    _canvas_tex: wgpu::Texture,
    _ui_tex: wgpu::Texture,

    pub canvas: wgpu::TextureView,
    pub ui: wgpu::TextureView,

    pub format: wgpu::TextureFormat,
    pub extent: wgpu::Extent3d,
}

impl Targets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let extent = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let create_tex = |label: &str| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
        };

        let canvas_tex = create_tex("Canvas Target");
        let ui_tex = create_tex("UI Target");

        Self {
            canvas: canvas_tex.create_view(&wgpu::TextureViewDescriptor::default()),
            ui: ui_tex.create_view(&wgpu::TextureViewDescriptor::default()),
            _canvas_tex: canvas_tex,
            _ui_tex: ui_tex,
            format: TARGET_FORMAT,
            extent,
        }
    }
}
