//! Desktop shell for the `brushwork` painting core: window, pointer input,
//! wgpu rendering and an egui HUD.

pub mod app;
pub mod config;
pub mod pointer;
pub mod renderer;
pub mod ui;
