use crate::brush::DEFAULT_BRUSH_SIZE;
use crate::error::{Error, Result};
use crate::input::StrokeSource;
use crate::sample::CanvasExtent;

/// Canvas instances the GPU buffer holds per frame.
pub const MAX_INSTANCES: usize = 3000;
/// UI instances the GPU buffer holds per frame.
pub const MAX_UI_INSTANCES: usize = 300;
pub const DEFAULT_CANVAS_WIDTH: u32 = 2048;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 2736;
pub const DEFAULT_IDLE_FRAMES: u32 = 60;

/// Runtime knobs of the painting core.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_instances: usize,
    pub max_ui_instances: usize,
    pub brush_size: f32,
    /// Consecutive frames without input after which rendering may pause.
    pub idle_frames_before_pause: u32,
    pub stroke_source: StrokeSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            max_instances: MAX_INSTANCES,
            max_ui_instances: MAX_UI_INSTANCES,
            brush_size: DEFAULT_BRUSH_SIZE,
            idle_frames_before_pause: DEFAULT_IDLE_FRAMES,
            stroke_source: StrokeSource::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.canvas_extent()?;
        if self.max_instances == 0 {
            return Err(Error::ZeroCapacity { what: "canvas instance" });
        }
        if self.max_ui_instances == 0 {
            return Err(Error::ZeroCapacity { what: "ui instance" });
        }
        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(Error::InvalidStampSize(self.brush_size));
        }
        Ok(())
    }

    pub fn canvas_extent(&self) -> Result<CanvasExtent> {
        CanvasExtent::new(self.canvas_width as f32, self.canvas_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        s.validate().unwrap();
        assert_eq!(s.canvas_extent().unwrap().as_vec2(), glam::Vec2::new(2048.0, 2736.0));
        assert_eq!((s.max_instances, s.max_ui_instances), (3000, 300));
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            Settings {
                canvas_width: 0,
                ..Settings::default()
            },
            Settings {
                max_instances: 0,
                ..Settings::default()
            },
            Settings {
                max_ui_instances: 0,
                ..Settings::default()
            },
            Settings {
                brush_size: -4.0,
                ..Settings::default()
            },
        ];
        for s in bad {
            assert!(s.validate().is_err(), "{s:?}");
        }
    }
}
