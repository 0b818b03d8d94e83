use anyhow::Result;
use brushwork::{Settings, StrokeSource};
use clap::{Parser, ValueEnum};

/// `sketchbook` - a touch and stylus painting canvas.
///
/// Pointer input is resampled into evenly spaced brush stamps and painted onto
/// a persistent canvas texture. Every option can also be set through its
/// `SKETCHBOOK_*` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Canvas width in canvas units.
    ///
    /// Canvas space spans twice this value horizontally, centred on zero.
    #[arg(long, env = "SKETCHBOOK_CANVAS_WIDTH", default_value_t = brushwork::settings::DEFAULT_CANVAS_WIDTH)]
    pub canvas_width: u32,

    /// Canvas height in canvas units.
    #[arg(long, env = "SKETCHBOOK_CANVAS_HEIGHT", default_value_t = brushwork::settings::DEFAULT_CANVAS_HEIGHT)]
    pub canvas_height: u32,

    /// Canvas stamps drawn per frame; further stamps in that frame are dropped.
    #[arg(long, env = "SKETCHBOOK_MAX_INSTANCES", default_value_t = brushwork::MAX_INSTANCES)]
    pub max_instances: usize,

    /// UI instances drawn per frame.
    #[arg(long, env = "SKETCHBOOK_MAX_UI_INSTANCES", default_value_t = brushwork::MAX_UI_INSTANCES)]
    pub max_ui_instances: usize,

    /// Initial brush diameter in canvas units.
    #[arg(long, env = "SKETCHBOOK_BRUSH_SIZE", default_value_t = brushwork::DEFAULT_BRUSH_SIZE)]
    pub brush_size: f32,

    /// Frames without input before rendering pauses until the next event.
    #[arg(long, env = "SKETCHBOOK_IDLE_FRAMES", default_value_t = brushwork::settings::DEFAULT_IDLE_FRAMES)]
    pub idle_frames: u32,

    /// Which samples become strokes: as delivered, or after late correction.
    #[arg(long, env = "SKETCHBOOK_STROKE_SOURCE", value_enum, default_value = "live")]
    pub stroke_source: SourceArg,

    /// Initial window width in logical pixels.
    #[arg(long, env = "SKETCHBOOK_WINDOW_WIDTH", default_value_t = 768)]
    pub window_width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, env = "SKETCHBOOK_WINDOW_HEIGHT", default_value_t = 1024)]
    pub window_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Live,
    Corrected,
}

impl From<SourceArg> for StrokeSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Live => StrokeSource::Live,
            SourceArg::Corrected => StrokeSource::Corrected,
        }
    }
}

impl Config {
    /// Core settings, validated.
    pub fn settings(&self) -> Result<Settings> {
        let settings = Settings {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            max_instances: self.max_instances,
            max_ui_instances: self.max_ui_instances,
            brush_size: self.brush_size,
            idle_frames_before_pause: self.idle_frames,
            stroke_source: self.stroke_source.into(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_settings() {
        let config = Config::try_parse_from(["sketchbook"]).unwrap();
        assert_eq!(config.settings().unwrap(), Settings::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "sketchbook",
            "--brush-size",
            "64",
            "--stroke-source",
            "corrected",
            "--max-instances",
            "500",
        ])
        .unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(settings.brush_size, 64.0);
        assert_eq!(settings.max_instances, 500);
        assert_eq!(settings.stroke_source, StrokeSource::Corrected);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let config = Config::try_parse_from(["sketchbook", "--max-ui-instances", "0"]).unwrap();
        assert!(config.settings().is_err());
    }
}
