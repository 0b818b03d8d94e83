//! egui heads-up display drawn over the composited canvas.

use brushwork::{Color, FrameStats, StrokeSource};

/// Snapshot of what the HUD shows for one frame.
#[derive(Debug, Clone, Copy)]
pub struct HudState {
    pub stats: FrameStats,
    pub brush_size: f32,
    /// Size being dialled in while the resize button is held.
    pub pending_size: Option<f32>,
    pub color: Color,
    pub source: StrokeSource,
    pub idle_frames: u32,
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudActions {
    pub clear_canvas: bool,
}

pub fn draw_hud(ctx: &egui::Context, hud: &HudState) -> HudActions {
    let mut actions = HudActions::default();

    egui::Window::new("Sketchbook")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            egui::Grid::new("hud_grid").num_columns(2).show(ui, |ui| {
                ui.label("Stamps");
                ui.monospace(hud.stats.stamps.to_string());
                ui.end_row();

                ui.label("Dropped");
                let dropped = hud.stats.dropped.to_string();
                if hud.stats.dropped > 0 {
                    ui.colored_label(egui::Color32::LIGHT_RED, dropped);
                } else {
                    ui.monospace(dropped);
                }
                ui.end_row();

                ui.label("UI instances");
                ui.monospace(hud.stats.ui_instances.to_string());
                ui.end_row();

                ui.label("Brush size");
                match hud.pending_size {
                    Some(pending) => ui.monospace(format!("{:.0} -> {:.0}", hud.brush_size, pending)),
                    None => ui.monospace(format!("{:.0}", hud.brush_size)),
                };
                ui.end_row();

                ui.label("Colour");
                let c = hud.color;
                ui.colored_label(
                    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a),
                    format!("#{:02x}{:02x}{:02x} a{}", c.r, c.g, c.b, c.a),
                );
                ui.end_row();

                ui.label("Strokes");
                ui.monospace(hud.source.to_string());
                ui.end_row();

                ui.label("Render");
                if hud.paused {
                    ui.monospace("paused");
                } else {
                    ui.monospace(format!("running (idle {})", hud.idle_frames));
                }
                ui.end_row();
            });

            ui.separator();
            if ui.button("Clear canvas").clicked() {
                actions.clear_canvas = true;
            }
        });

    actions
}
