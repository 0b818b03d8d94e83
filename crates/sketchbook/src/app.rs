use crate::{
    pointer::PointerTracker,
    renderer::Renderer,
    ui::{self, HudState},
};
use anyhow::Result;
use brushwork::{
    Brushes, FrameDriver, FrameStats, InputManager, Settings, StrokeSource, TextureRegistry,
    TouchEvent, TouchPhase, UiManager, ViewMapping, DEFAULT_BRUSH_SIZE,
};
use std::sync::Arc;
use winit::{
    event::{ElementState, Touch, WindowEvent},
    window::Window,
};

pub struct App {
    pub renderer: Renderer,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    registry: TextureRegistry,
    brushes: Brushes,
    ui: UiManager,
    input: InputManager,
    driver: FrameDriver,
    pointer: PointerTracker,
    last_stats: FrameStats,
}

impl App {
    pub async fn new(window: Arc<Window>, settings: Settings) -> Result<Self> {
        let driver = FrameDriver::new(&settings)?;
        let renderer = Renderer::new(window.clone(), &settings).await?;
        let size = renderer.gfx.size;

        let mut registry = TextureRegistry::new();
        let stamp = registry.register_circle_stamp(DEFAULT_BRUSH_SIZE as u32);
        let ui = UiManager::new(&mut registry, stamp, settings.brush_size);
        let brushes = Brushes::new(stamp, settings.brush_size);

        let mapping = ViewMapping::new(size.width as f32, size.height as f32, driver.extent());
        let input = InputManager::new(mapping, brushes.handles(), settings.stroke_source);

        log::info!(
            "canvas {}x{}, brush size {}, strokes from {} samples",
            settings.canvas_width,
            settings.canvas_height,
            settings.brush_size,
            settings.stroke_source
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            egui_ctx,
            egui_state,
            registry,
            brushes,
            ui,
            input,
            driver,
            pointer: PointerTracker::new(),
            last_stats: FrameStats::default(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.input
                .set_view_size(new_size.width as f32, new_size.height as f32);
        }
    }

    /// Whether the event loop may wait for input instead of polling.
    pub fn is_paused(&self) -> bool {
        self.driver.is_paused()
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        if !matches!(event, WindowEvent::RedrawRequested) {
            self.driver.wake();
        }

        // Lifts always reach the tracker, or a drag ending over the HUD would
        // leave its pointer held.
        let lifts_pointer = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } | WindowEvent::Touch(Touch {
                phase: winit::event::TouchPhase::Ended | winit::event::TouchPhase::Cancelled,
                ..
            })
        );
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed && !lifts_pointer {
            return true;
        }

        if let Some(touch) = self.pointer.translate(event) {
            self.dispatch_touch(&touch);
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    fn dispatch_touch(&mut self, touch: &TouchEvent) {
        let accepted = match touch.phase {
            TouchPhase::Began => true,
            TouchPhase::Cancelled => false,
            TouchPhase::Moved | TouchPhase::Ended => self.input.stroke_active(),
        };

        self.input.handle_touch(&mut self.ui, touch);

        // winit delivers final values up front, so every accepted sample
        // doubles as its own correction.
        if accepted && self.input.source() == StrokeSource::Corrected {
            if let Some(index) = touch.estimation_index {
                self.input
                    .handle_estimation_update(&self.ui, index, touch.position, touch.force);
            }
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(err) = self
            .ui
            .refresh_textures(&mut self.registry)
            .and_then(|_| self.renderer.sync_textures(&mut self.registry))
        {
            log::error!("stamp texture sync failed: {}", err);
        }

        self.last_stats = self
            .driver
            .run_frame(&mut self.brushes, &self.ui, &mut self.renderer);
        self.renderer.composite(&swap_view);

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let hud = HudState {
            stats: self.last_stats,
            brush_size: self.ui.brush_size(),
            pending_size: self
                .ui
                .is_button_pressed()
                .then(|| self.ui.pending_size()),
            color: self.ui.brush_color(),
            source: self.input.source(),
            idle_frames: self.driver.idle_frames(),
            paused: self.driver.is_paused(),
        };
        let actions = ui::draw_hud(&self.egui_ctx, &hud);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("HUD Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        if actions.clear_canvas {
            self.renderer.clear_canvas();
            self.driver.wake();
        }

        Ok(())
    }
}
