//! Entry point for the sketchbook painting app.

use anyhow::Result;
use clap::Parser;
use sketchbook::{app::App, config::Config};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config.settings()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sketchbook")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ))
            .build(&event_loop)?,
    );

    let mut app = pollster::block_on(App::new(window.clone(), settings))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => {
            if !app.handle_event(&window, &event) {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => match app.render(&window) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            app.resize(app.renderer.gfx.size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU out of memory - exiting.");
                            elwt.exit();
                        }
                        Err(e) => log::error!("Render error: {:?}", e),
                    },
                    _ => {}
                }
            }
        }
        Event::AboutToWait => {
            // Idle canvases sleep until the next input event.
            if app.is_paused() {
                elwt.set_control_flow(ControlFlow::Wait);
            } else {
                elwt.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
        }
        _ => {}
    })?;

    Ok(())
}
