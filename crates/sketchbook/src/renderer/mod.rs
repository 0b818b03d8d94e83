//! GPU side of the painting loop. Owns the device, the canvas-sized targets,
//! the stamp texture mirror and the passes that draw into them.

pub mod context;
pub mod pipelines;
pub mod targets;
pub mod textures;

use self::{
    context::GfxContext,
    pipelines::{composite::CompositePass, stamp::StampPipeline},
    targets::Targets,
    textures::StampTextures,
};
use brushwork::{FrameSink, RenderTarget, Settings, StampInstance, TextureRegistry};
use std::sync::Arc;
use winit::window::Window;

/// Colour the canvas starts from, and returns to when cleared.
pub const CANVAS_CLEAR: wgpu::Color = wgpu::Color {
    r: 200.0 / 255.0,
    g: 40.0 / 255.0,
    b: 40.0 / 255.0,
    a: 1.0,
};

pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub stamps: StampTextures,
    pub stamp: StampPipeline,
    pub composite: CompositePass,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window, settings.canvas_width, settings.canvas_height).await?;

        let targets = Targets::new(&gfx.device, settings.canvas_width, settings.canvas_height);
        let stamps = StampTextures::new(&gfx.device);
        let stamp = StampPipeline::new(
            &gfx.device,
            targets.format,
            stamps.layout(),
            settings.max_instances,
            settings.max_ui_instances,
        );
        let composite = CompositePass::new(&gfx.device, gfx.config.format, &targets);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        let renderer = Self {
            gfx,
            targets,
            stamps,
            stamp,
            composite,
            egui_renderer,
        };
        renderer.clear_canvas();
        Ok(renderer)
    }

    /// Only the swap chain follows the window; the canvas keeps its size.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }

    pub fn sync_textures(&mut self, registry: &mut TextureRegistry) -> brushwork::Result<usize> {
        self.stamps.sync(&self.gfx.device, &self.gfx.queue, registry)
    }

    pub fn clear_canvas(&self) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Canvas Clear Encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.canvas,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CANVAS_CLEAR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        log::info!("canvas cleared");
    }

    /// Draws canvas and UI onto the swap chain image.
    pub fn composite(&self, swap_view: &wgpu::TextureView) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Composite Encoder"),
            });
        self.composite.draw(&mut encoder, swap_view);
        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl FrameSink for Renderer {
    fn submit(&mut self, target: RenderTarget, instances: &[StampInstance]) {
        let dst = match target {
            RenderTarget::Canvas => &self.targets.canvas,
            RenderTarget::Ui => &self.targets.ui,
        };
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stamp Encoder"),
            });
        self.stamp
            .draw(&self.gfx.queue, &mut encoder, target, dst, &self.stamps, instances);
        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
