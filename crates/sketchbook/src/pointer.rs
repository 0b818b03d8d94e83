//! Translates winit touch and mouse events into brushwork touch events.

use brushwork::{PointerKind, TouchEvent, TouchPhase};
use glam::Vec2;
use winit::event::{ElementState, Force, MouseButton, TouchPhase as WinitPhase, WindowEvent};

/// Follows one pointer at a time and numbers its samples.
///
/// A second touch landing while one is active cancels the active stroke.
/// Touches are then ignored until one of them lifts.
#[derive(Debug, Default)]
pub struct PointerTracker {
    active_touch: Option<(u64, PointerKind)>,
    blocked: bool,
    mouse_down: bool,
    cursor: Vec2,
    next_index: i64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<TouchEvent> {
        match event {
            WindowEvent::Touch(touch) => self.touch(
                touch.id,
                touch.phase,
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
                touch.force,
            ),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.mouse_button(*state == ElementState::Pressed),
            _ => None,
        }
    }

    pub fn touch(&mut self, id: u64, phase: WinitPhase, position: Vec2, force: Option<Force>) -> Option<TouchEvent> {
        let (kind, force) = classify(force);

        let (pointer, phase) = match (self.active_touch, phase) {
            (None, WinitPhase::Started) if !self.blocked => {
                self.active_touch = Some((id, kind));
                (kind, TouchPhase::Began)
            }
            (Some((active, pointer)), WinitPhase::Started) if active != id => {
                log::debug!("touch {} competes with {}, cancelling stroke", id, active);
                self.active_touch = None;
                self.blocked = true;
                (pointer, TouchPhase::Cancelled)
            }
            (Some((active, pointer)), WinitPhase::Moved) if active == id => (pointer, TouchPhase::Moved),
            (Some((active, pointer)), WinitPhase::Ended) if active == id => {
                self.active_touch = None;
                (pointer, TouchPhase::Ended)
            }
            (Some((active, pointer)), WinitPhase::Cancelled) if active == id => {
                self.active_touch = None;
                (pointer, TouchPhase::Cancelled)
            }
            (None, WinitPhase::Ended | WinitPhase::Cancelled) => {
                self.blocked = false;
                return None;
            }
            _ => return None,
        };

        Some(self.sample(pointer, phase, position, force))
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> Option<TouchEvent> {
        self.cursor = position;
        if !self.mouse_down {
            return None;
        }
        Some(self.sample(PointerKind::Mouse, TouchPhase::Moved, position, 1.0))
    }

    pub fn mouse_button(&mut self, pressed: bool) -> Option<TouchEvent> {
        if pressed == self.mouse_down {
            return None;
        }
        self.mouse_down = pressed;
        let phase = if pressed {
            TouchPhase::Began
        } else {
            TouchPhase::Ended
        };
        Some(self.sample(PointerKind::Mouse, phase, self.cursor, 1.0))
    }

    fn sample(&mut self, pointer: PointerKind, phase: TouchPhase, position: Vec2, force: f32) -> TouchEvent {
        let index = self.next_index;
        self.next_index += 1;
        TouchEvent {
            estimation_index: Some(index),
            expects_update: phase == TouchPhase::Began,
            ..TouchEvent::new(pointer, phase, position, force)
        }
    }
}

/// Stylus input reports an altitude angle; plain touches do not. Touches
/// without pressure data paint at full force.
fn classify(force: Option<Force>) -> (PointerKind, f32) {
    match force {
        Some(f @ Force::Calibrated {
            altitude_angle: Some(_),
            ..
        }) => (PointerKind::Pencil, f.normalized() as f32),
        Some(f) => (PointerKind::Finger, f.normalized() as f32),
        None => (PointerKind::Finger, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pencil(force: f64) -> Option<Force> {
        Some(Force::Calibrated {
            force,
            max_possible_force: 4.0,
            altitude_angle: Some(std::f64::consts::FRAC_PI_2),
        })
    }

    #[test]
    fn single_touch_lifecycle() {
        let mut t = PointerTracker::new();
        let began = t.touch(1, WinitPhase::Started, Vec2::new(5.0, 6.0), pencil(2.0)).unwrap();
        assert_eq!(began.phase, TouchPhase::Began);
        assert_eq!(began.pointer, PointerKind::Pencil);
        assert_eq!(began.force, 0.5);
        assert!(began.expects_update);

        let moved = t.touch(1, WinitPhase::Moved, Vec2::new(6.0, 6.0), pencil(4.0)).unwrap();
        assert_eq!(moved.phase, TouchPhase::Moved);
        assert_eq!(moved.estimation_index, Some(began.estimation_index.unwrap() + 1));

        let ended = t.touch(1, WinitPhase::Ended, Vec2::new(6.0, 6.0), None).unwrap();
        assert_eq!(ended.phase, TouchPhase::Ended);
        // The kind sticks to the touch even when a sample lacks pressure data.
        assert_eq!(ended.pointer, PointerKind::Pencil);
        assert_eq!(ended.force, 1.0);
    }

    #[test]
    fn competing_touch_cancels_stroke() {
        let mut t = PointerTracker::new();
        t.touch(1, WinitPhase::Started, Vec2::ZERO, None).unwrap();
        let cancel = t.touch(2, WinitPhase::Started, Vec2::ONE, None).unwrap();
        assert_eq!(cancel.phase, TouchPhase::Cancelled);

        assert!(t.touch(1, WinitPhase::Moved, Vec2::ZERO, None).is_none());
        assert!(t.touch(2, WinitPhase::Moved, Vec2::ZERO, None).is_none());
        assert!(t.touch(1, WinitPhase::Ended, Vec2::ZERO, None).is_none());
        assert!(t.touch(2, WinitPhase::Ended, Vec2::ZERO, None).is_none());

        let again = t.touch(3, WinitPhase::Started, Vec2::ZERO, None).unwrap();
        assert_eq!(again.phase, TouchPhase::Began);
    }

    #[test]
    fn mouse_drags_paint_at_full_force() {
        let mut t = PointerTracker::new();
        assert!(t.cursor_moved(Vec2::new(10.0, 10.0)).is_none());

        let began = t.mouse_button(true).unwrap();
        assert_eq!((began.phase, began.position), (TouchPhase::Began, Vec2::new(10.0, 10.0)));
        assert_eq!(began.pointer, PointerKind::Mouse);

        let moved = t.cursor_moved(Vec2::new(20.0, 10.0)).unwrap();
        assert_eq!(moved.force, 1.0);
        assert!(t.mouse_button(true).is_none());

        let ended = t.mouse_button(false).unwrap();
        assert_eq!((ended.phase, ended.position), (TouchPhase::Ended, Vec2::new(20.0, 10.0)));
    }
}
