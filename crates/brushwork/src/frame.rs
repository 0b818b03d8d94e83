//! Per-frame orchestration: drain brushes, stage instances, hand them off.

use crate::brush::Brushes;
use crate::error::Result;
use crate::sample::{CanvasExtent, StampInstance};
use crate::settings::Settings;
use crate::staging::StagingBuffer;
use crate::ui::UiManager;

/// Texture a batch of instances is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// Persistent painting surface; stamps accumulate across frames.
    Canvas,
    /// Overlay redrawn from scratch on every submit.
    Ui,
}

/// Consumer of staged instances, typically the GPU renderer.
pub trait FrameSink {
    fn submit(&mut self, target: RenderTarget, instances: &[StampInstance]);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Canvas stamps submitted this frame.
    pub stamps: usize,
    pub ui_instances: usize,
    /// Stamps lost to the canvas buffer being full.
    pub dropped: usize,
    /// No brush had pending samples.
    pub idle: bool,
}

#[derive(Debug)]
pub struct FrameDriver {
    extent: CanvasExtent,
    canvas: StagingBuffer,
    ui: StagingBuffer,
    idle_frames: u32,
    pause_after: u32,
    #[cfg(debug_assertions)]
    owner: Option<std::thread::ThreadId>,
}

impl FrameDriver {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            extent: settings.canvas_extent()?,
            canvas: StagingBuffer::new(settings.max_instances)?,
            ui: StagingBuffer::new(settings.max_ui_instances)?,
            idle_frames: 0,
            pause_after: settings.idle_frames_before_pause,
            #[cfg(debug_assertions)]
            owner: None,
        })
    }

    #[inline]
    pub fn extent(&self) -> CanvasExtent {
        self.extent
    }

    /// Consecutive frames in which no brush had samples.
    #[inline]
    pub fn idle_frames(&self) -> u32 {
        self.idle_frames
    }

    /// Whether rendering may stop until new input arrives.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.idle_frames > self.pause_after
    }

    pub fn wake(&mut self) {
        self.idle_frames = 0;
    }

    /// Runs one frame.
    ///
    /// Every brush is drained into the canvas buffer, which is submitted only
    /// when it holds something. The UI buffer is rebuilt and submitted every
    /// time. Both buffers are cleared before returning.
    pub fn run_frame<S: FrameSink + ?Sized>(
        &mut self,
        brushes: &mut Brushes,
        ui: &UiManager,
        sink: &mut S,
    ) -> FrameStats {
        self.assert_render_thread();

        let mut drained = 0;
        for brush in brushes.iter_mut() {
            drained += brush.drain_and_interpolate(self.extent, &mut self.canvas);
        }
        debug_assert!(self.canvas.len() <= self.canvas.capacity());

        let stats = FrameStats {
            stamps: self.canvas.len(),
            ui_instances: 0,
            dropped: self.canvas.dropped(),
            idle: drained == 0,
        };
        if stats.dropped > 0 {
            log::debug!(
                "canvas staging full: {} stamps kept, {} dropped",
                stats.stamps,
                stats.dropped
            );
        }
        if !self.canvas.is_empty() {
            sink.submit(RenderTarget::Canvas, self.canvas.as_slice());
        }
        self.canvas.clear();

        ui.collect_instances(self.extent, &mut self.ui);
        debug_assert!(self.ui.len() <= self.ui.capacity());
        sink.submit(RenderTarget::Ui, self.ui.as_slice());
        let ui_instances = self.ui.len();
        self.ui.clear();

        if stats.idle {
            self.idle_frames = self.idle_frames.saturating_add(1);
        } else {
            self.idle_frames = 0;
        }

        FrameStats { ui_instances, ..stats }
    }

    #[cfg(debug_assertions)]
    fn assert_render_thread(&mut self) {
        let current = std::thread::current().id();
        let owner = *self.owner.get_or_insert(current);
        debug_assert_eq!(owner, current, "frame driver used from more than one thread");
    }

    #[cfg(not(debug_assertions))]
    fn assert_render_thread(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brushes;
    use crate::texture::TextureRegistry;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        batches: Vec<(RenderTarget, Vec<StampInstance>)>,
    }

    impl FrameSink for Recorder {
        fn submit(&mut self, target: RenderTarget, instances: &[StampInstance]) {
            self.batches.push((target, instances.to_vec()));
        }
    }

    impl Recorder {
        fn canvas_batches(&self) -> usize {
            self.batches
                .iter()
                .filter(|(t, _)| *t == RenderTarget::Canvas)
                .count()
        }
    }

    fn setup(settings: &Settings) -> (FrameDriver, Brushes, UiManager) {
        let mut reg = TextureRegistry::new();
        let stamp = reg.register_circle_stamp(16);
        let ui = UiManager::new(&mut reg, stamp, settings.brush_size);
        let brushes = Brushes::new(stamp, settings.brush_size);
        (FrameDriver::new(settings).unwrap(), brushes, ui)
    }

    fn small() -> Settings {
        Settings {
            brush_size: 30.0,
            idle_frames_before_pause: 2,
            ..Settings::default()
        }
    }

    #[test]
    fn idle_frame_submits_only_ui() {
        let (mut driver, mut brushes, ui) = setup(&small());
        let mut sink = Recorder::default();

        let stats = driver.run_frame(&mut brushes, &ui, &mut sink);
        assert!(stats.idle);
        assert_eq!(stats.stamps, 0);
        assert_eq!(stats.ui_instances, 8);
        assert_eq!(sink.batches.len(), 1);
        assert_eq!(sink.batches[0].0, RenderTarget::Ui);
    }

    #[test]
    fn brushes_share_one_canvas_batch() {
        let (mut driver, mut brushes, ui) = setup(&small());
        let mut sink = Recorder::default();

        brushes.live.append(Vec2::new(0.0, 0.0), 1.0, true);
        brushes.live.append(Vec2::new(10.0, 0.0), 1.0, false);
        brushes.corrected.append(Vec2::new(0.0, 100.0), 1.0, true);
        brushes.corrected.append(Vec2::new(5.0, 100.0), 1.0, false);

        let stats = driver.run_frame(&mut brushes, &ui, &mut sink);
        assert!(!stats.idle);
        assert_eq!(stats.stamps, 15);
        assert_eq!(sink.canvas_batches(), 1);
        assert_eq!(sink.batches[0].1.len(), 15);
        // Live brush drains first.
        assert_eq!(sink.batches[0].1[0].position, [0.0, 0.0]);
        assert_eq!(sink.batches[0].1[10].position[1], 100.0 / 2736.0);
    }

    #[test]
    fn overflow_is_bounded_and_reported() {
        let settings = Settings {
            max_instances: 50,
            ..small()
        };
        let (mut driver, mut brushes, ui) = setup(&settings);
        let mut sink = Recorder::default();

        brushes.live.append(Vec2::new(0.0, 0.0), 1.0, true);
        brushes.live.append(Vec2::new(80.0, 0.0), 1.0, false);
        let stats = driver.run_frame(&mut brushes, &ui, &mut sink);
        assert_eq!(stats.stamps, 50);
        assert_eq!(stats.dropped, 30);
        // Stepping stopped where the buffer filled.
        assert_eq!(brushes.live.carry_over().position, Vec2::new(50.0, 0.0));

        // Next frame starts with an empty buffer.
        brushes.live.append(Vec2::new(60.0, 0.0), 1.0, false);
        let stats = driver.run_frame(&mut brushes, &ui, &mut sink);
        assert_eq!((stats.stamps, stats.dropped), (10, 0));
    }

    #[test]
    fn pauses_after_idle_frames_and_wakes() {
        let (mut driver, mut brushes, ui) = setup(&small());
        let mut sink = Recorder::default();

        for _ in 0..3 {
            assert!(!driver.is_paused());
            driver.run_frame(&mut brushes, &ui, &mut sink);
        }
        assert!(driver.is_paused());
        assert_eq!(driver.idle_frames(), 3);

        driver.wake();
        assert!(!driver.is_paused());

        // Pausing never changes what the next active frame draws.
        brushes.live.append(Vec2::new(0.0, 0.0), 1.0, true);
        brushes.live.append(Vec2::new(3.0, 0.0), 1.0, false);
        let stats = driver.run_frame(&mut brushes, &ui, &mut sink);
        assert_eq!(stats.stamps, 3);
        assert_eq!(driver.idle_frames(), 0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            canvas_height: 0,
            ..Settings::default()
        };
        assert!(FrameDriver::new(&settings).is_err());
    }
}
