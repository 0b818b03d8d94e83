//! Routes pointer events to the UI and to the brushes.

use crate::brush::{BrushHandles, BrushRole};
use crate::sample::CanvasExtent;
use crate::ui::UiManager;
use glam::Vec2;
use std::fmt;

/// Finger distance from the resize button that still grabs it.
pub const RESIZE_BUTTON_REACH: f32 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Finger,
    Pencil,
    Mouse,
}

impl PointerKind {
    /// Pencil and mouse report exact locations; fingers do not.
    pub fn is_precise(self) -> bool {
        !matches!(self, PointerKind::Finger)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Which brush strokes are fed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeSource {
    /// Samples as delivered.
    #[default]
    Live,
    /// Only samples whose estimated properties were finalised.
    Corrected,
}

impl StrokeSource {
    pub fn role(self) -> BrushRole {
        match self {
            StrokeSource::Live => BrushRole::Live,
            StrokeSource::Corrected => BrushRole::Corrected,
        }
    }
}

impl fmt::Display for StrokeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role().name())
    }
}

/// One pointer sample in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub pointer: PointerKind,
    pub phase: TouchPhase,
    /// Position in view pixels, origin top-left.
    pub position: Vec2,
    pub force: f32,
    /// Index under which corrected properties for this touch will arrive.
    pub estimation_index: Option<i64>,
    /// Whether corrections are still expected for this touch.
    pub expects_update: bool,
}

impl TouchEvent {
    pub fn new(pointer: PointerKind, phase: TouchPhase, position: Vec2, force: f32) -> Self {
        Self {
            pointer,
            phase,
            position,
            force,
            estimation_index: None,
            expects_update: false,
        }
    }
}

/// Maps view coordinates into canvas space, which spans `[-w, w] x [-h, h]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMapping {
    pub view: Vec2,
    pub canvas: CanvasExtent,
}

impl ViewMapping {
    pub fn new(view_width: f32, view_height: f32, canvas: CanvasExtent) -> Self {
        Self {
            view: Vec2::new(view_width.max(1.0), view_height.max(1.0)),
            canvas,
        }
    }

    pub fn to_canvas(&self, t: Vec2) -> Vec2 {
        let c = self.canvas.as_vec2();
        2.0 * t / self.view * c - c
    }
}

/// Turns touches into brush samples, letting the UI capture them first.
#[derive(Debug)]
pub struct InputManager {
    mapping: ViewMapping,
    brushes: BrushHandles,
    source: StrokeSource,
    stroke_active: bool,
}

impl InputManager {
    pub fn new(mapping: ViewMapping, brushes: BrushHandles, source: StrokeSource) -> Self {
        Self {
            mapping,
            brushes,
            source,
            stroke_active: false,
        }
    }

    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.mapping = ViewMapping::new(width, height, self.mapping.canvas);
    }

    pub fn source(&self) -> StrokeSource {
        self.source
    }

    /// A stroke has begun and was neither ended nor cancelled.
    pub fn stroke_active(&self) -> bool {
        self.stroke_active
    }

    /// Handles one pointer sample.
    pub fn handle_touch(&mut self, ui: &mut UiManager, event: &TouchEvent) {
        let pos = self.mapping.to_canvas(event.position);
        let force = match event.pointer {
            PointerKind::Mouse => 1.0,
            _ => event.force,
        };

        if event.pointer == PointerKind::Finger
            && event.phase == TouchPhase::Began
            && (ui.resize_button_position() - pos).length() < RESIZE_BUTTON_REACH
        {
            ui.press_button();
        }

        match event.phase {
            TouchPhase::Began => {
                self.stroke_active = true;
                if event.expects_update {
                    if let Some(index) = event.estimation_index {
                        self.brushes.corrected.set_first_update_index(Some(index));
                    }
                }
                ui.first_touch(pos, event.pointer.is_precise());
            }
            TouchPhase::Moved | TouchPhase::Ended if !self.stroke_active => return,
            TouchPhase::Cancelled => {
                log::debug!("stroke cancelled");
                self.stroke_active = false;
                ui.cancel_touch();
                return;
            }
            _ => {}
        }

        let color = ui.process_touch(pos, event.pointer.is_precise());
        for brush in self.brushes.iter() {
            brush.set_color(color);
        }

        if !ui.cant_draw() && self.source == StrokeSource::Live {
            self.brushes
                .live
                .append(pos, force, event.phase == TouchPhase::Began);
        }

        if event.phase == TouchPhase::Ended {
            self.stroke_active = false;
            if ui.is_button_pressed() {
                let size = ui.release_button();
                for brush in self.brushes.iter() {
                    brush.set_size(size);
                }
            }
        }
    }

    /// Handles a late correction of a touch's estimated properties.
    pub fn handle_estimation_update(&self, ui: &UiManager, index: i64, position: Vec2, force: f32) {
        if self.source != StrokeSource::Corrected || ui.cant_draw() {
            return;
        }
        let corrected = self.brushes.get(BrushRole::Corrected);
        let first = corrected.first_update_index() == Some(index);
        corrected.append(self.mapping.to_canvas(position), force, first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brushes;
    use crate::staging::StagingBuffer;
    use crate::texture::TextureRegistry;

    struct Rig {
        ui: UiManager,
        brushes: Brushes,
        input: InputManager,
        extent: CanvasExtent,
    }

    // A view the same size as the canvas maps view (x, y) to (2x - w, 2y - h).
    fn rig(source: StrokeSource) -> Rig {
        let mut reg = TextureRegistry::new();
        let stamp = reg.register_circle_stamp(16);
        let ui = UiManager::new(&mut reg, stamp, 30.0);
        let brushes = Brushes::new(stamp, 30.0);
        let extent = CanvasExtent::new(2048.0, 2736.0).unwrap();
        let input = InputManager::new(ViewMapping::new(2048.0, 2736.0, extent), brushes.handles(), source);
        Rig {
            ui,
            brushes,
            input,
            extent,
        }
    }

    fn touch(pointer: PointerKind, phase: TouchPhase, x: f32, y: f32) -> TouchEvent {
        TouchEvent::new(pointer, phase, Vec2::new(x, y), 0.5)
    }

    #[test]
    fn view_maps_onto_symmetric_canvas() {
        let extent = CanvasExtent::new(100.0, 50.0).unwrap();
        let m = ViewMapping::new(200.0, 100.0, extent);
        assert_eq!(m.to_canvas(Vec2::ZERO), Vec2::new(-100.0, -50.0));
        assert_eq!(m.to_canvas(Vec2::new(100.0, 50.0)), Vec2::ZERO);
        assert_eq!(m.to_canvas(Vec2::new(200.0, 100.0)), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn live_stroke_is_appended_with_first_flag() {
        let mut r = rig(StrokeSource::Live);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Began, 1500.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Moved, 1505.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Ended, 1510.0, 1500.0));

        assert_eq!(r.brushes.live.handle().pending_len(), 3);
        assert_eq!(r.brushes.corrected.handle().pending_len(), 0);

        let mut sink = StagingBuffer::new(3000).unwrap();
        r.brushes.live.drain_and_interpolate(r.extent, &mut sink);
        // 20 canvas units at spacing 1, seeded from the first sample.
        assert_eq!(sink.len(), 20);
        assert_eq!(r.brushes.live.carry_over().position, Vec2::new(972.0, 264.0));
        assert_eq!(r.brushes.live.carry_over().color, r.ui.brush_color());
    }

    #[test]
    fn cancelled_stroke_ignores_moves_until_next_began() {
        let mut r = rig(StrokeSource::Live);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Began, 1500.0, 1500.0));
        assert!(r.input.stroke_active());
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Cancelled, 1501.0, 1500.0));
        assert!(!r.input.stroke_active());
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Moved, 1502.0, 1500.0));
        assert_eq!(r.brushes.live.handle().pending_len(), 1);

        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Began, 1600.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Moved, 1601.0, 1500.0));
        assert_eq!(r.brushes.live.handle().pending_len(), 3);
    }

    #[test]
    fn lift_after_cancel_is_not_painted() {
        let mut r = rig(StrokeSource::Live);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Began, 1500.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Cancelled, 1501.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Ended, 1900.0, 1500.0));
        assert_eq!(r.brushes.live.handle().pending_len(), 1);
    }

    #[test]
    fn cancel_while_resizing_frees_the_next_stroke() {
        let mut r = rig(StrokeSource::Live);
        let (x, y) = ((-200.0 + 2048.0) / 2.0, (-2000.0 + 2736.0) / 2.0);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Began, x, y));
        assert!(r.ui.is_button_pressed());
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Cancelled, x + 50.0, y));
        assert!(!r.ui.cant_draw());

        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Began, 1500.0, 1500.0));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Moved, 1510.0, 1500.0));
        assert_eq!(r.brushes.live.handle().pending_len(), 2);

        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Ended, 1520.0, 1500.0));
        assert_eq!(r.ui.brush_size(), 30.0);
        assert_eq!(r.brushes.live.handle().size(), 30.0);
    }

    #[test]
    fn touches_on_ui_do_not_paint() {
        let mut r = rig(StrokeSource::Live);
        // Canvas (800, -2000) is the color picker center.
        let (x, y) = ((800.0 + 2048.0) / 2.0, (-2000.0 + 2736.0) / 2.0);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Began, x, y));
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Pencil, TouchPhase::Moved, x + 1.0, y));
        assert_eq!(r.brushes.live.handle().pending_len(), 0);
        assert_eq!(r.brushes.live.handle().color(), r.ui.brush_color());
        assert_eq!(r.brushes.corrected.handle().color(), r.ui.brush_color());
    }

    #[test]
    fn finger_near_resize_button_resizes_every_brush() {
        let mut r = rig(StrokeSource::Live);
        // Canvas (-200, -2000) is the resize button; land 100 units right of it.
        let (x, y) = ((-100.0 + 2048.0) / 2.0, (-2000.0 + 2736.0) / 2.0);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Began, x, y));
        assert!(r.ui.is_button_pressed());

        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Finger, TouchPhase::Ended, x, y));
        assert!(!r.ui.is_button_pressed());
        assert_eq!(r.brushes.live.handle().pending_len(), 0);
        assert_eq!(r.brushes.live.handle().size(), r.ui.brush_size());
        assert_eq!(r.brushes.corrected.handle().size(), r.ui.brush_size());
    }

    #[test]
    fn corrections_feed_corrected_brush() {
        let mut r = rig(StrokeSource::Corrected);
        let began = TouchEvent {
            estimation_index: Some(7),
            expects_update: true,
            ..touch(PointerKind::Pencil, TouchPhase::Began, 1500.0, 1500.0)
        };
        r.input.handle_touch(&mut r.ui, &began);
        assert_eq!(r.brushes.corrected.handle().first_update_index(), Some(7));
        assert_eq!(r.brushes.live.handle().pending_len(), 0);

        r.input.handle_estimation_update(&r.ui, 7, Vec2::new(1500.0, 1500.0), 0.8);
        r.input.handle_estimation_update(&r.ui, 8, Vec2::new(1502.0, 1500.0), 0.9);

        let mut sink = StagingBuffer::new(3000).unwrap();
        assert_eq!(r.brushes.corrected.drain_and_interpolate(r.extent, &mut sink), 2);
        assert_eq!(sink.len(), 4);
        assert_eq!(r.brushes.corrected.carry_over().force, 0.9);
    }

    #[test]
    fn corrections_are_ignored_for_live_source() {
        let mut r = rig(StrokeSource::Live);
        r.input.handle_estimation_update(&r.ui, 1, Vec2::new(1500.0, 1500.0), 1.0);
        assert_eq!(r.brushes.corrected.handle().pending_len(), 0);
    }

    #[test]
    fn mouse_paints_at_full_force() {
        let mut r = rig(StrokeSource::Live);
        r.input.handle_touch(&mut r.ui, &touch(PointerKind::Mouse, TouchPhase::Began, 1500.0, 1500.0));
        let mut sink = StagingBuffer::new(10).unwrap();
        r.brushes.live.drain_and_interpolate(r.extent, &mut sink);
        assert_eq!(r.brushes.live.carry_over().force, 1.0);
    }
}
