//! Stroke accumulator: the rolling per-brush state that bridges asynchronous
//! input delivery and the once-per-frame drain.

use crate::color::Color;
use crate::interpolate::interpolate;
use crate::sample::{BrushSample, CanvasExtent};
use crate::staging::StagingBuffer;
use crate::texture::TextureId;
use glam::Vec2;
use parking_lot::Mutex;
use std::sync::Arc;

/// Default stamp diameter in canvas units.
pub const DEFAULT_BRUSH_SIZE: f32 = 256.0;

/// Logical input role a brush is fed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushRole {
    /// Samples as the pointer delivers them.
    Live,
    /// Samples re-delivered once estimated properties (e.g. pencil force)
    /// have been finalised.
    Corrected,
}

impl BrushRole {
    pub fn name(self) -> &'static str {
        match self {
            BrushRole::Live => "live",
            BrushRole::Corrected => "corrected",
        }
    }
}

/// Producer-side state, guarded by the brush lock.
#[derive(Debug)]
struct Inbox {
    pending: Vec<BrushSample>,
    size: f32,
    color: Color,
    first_update_index: Option<i64>,
}

/// Cloneable producer handle. Safe to use from the input-delivery context
/// while the render thread drains the owning [`Brush`].
#[derive(Debug, Clone)]
pub struct BrushHandle {
    role: BrushRole,
    inbox: Arc<Mutex<Inbox>>,
}

impl BrushHandle {
    #[inline]
    pub fn role(&self) -> BrushRole {
        self.role
    }

    /// Queues a sample stamped with the brush's current size and color.
    pub fn append(&self, position: Vec2, force: f32, first_of_stroke: bool) {
        let mut inbox = self.inbox.lock();
        let sample = BrushSample {
            position,
            force,
            first_of_stroke,
            stamp_size: inbox.size,
            color: inbox.color,
        };
        inbox.pending.push(sample);
    }

    pub fn size(&self) -> f32 {
        self.inbox.lock().size
    }

    /// Applies to samples appended after this call.
    pub fn set_size(&self, size: f32) {
        self.inbox.lock().size = size;
    }

    pub fn color(&self) -> Color {
        self.inbox.lock().color
    }

    /// Applies to samples appended after this call.
    pub fn set_color(&self, color: Color) {
        self.inbox.lock().color = color;
    }

    /// Estimation-update index of the touch that started the current stroke.
    pub fn first_update_index(&self) -> Option<i64> {
        self.inbox.lock().first_update_index
    }

    pub fn set_first_update_index(&self, index: Option<i64>) {
        self.inbox.lock().first_update_index = index;
    }

    pub fn pending_len(&self) -> usize {
        self.inbox.lock().pending.len()
    }
}

/// Render-side owner of one brush.
///
/// Holds the carry-over sample (where the last frame's interpolation stopped)
/// and drains the shared queue once per frame.
#[derive(Debug)]
pub struct Brush {
    handle: BrushHandle,
    texture: TextureId,
    carry_over: BrushSample,
    drained: Vec<BrushSample>,
}

impl Brush {
    pub fn new(role: BrushRole, texture: TextureId) -> Self {
        let inbox = Inbox {
            pending: Vec::new(),
            size: DEFAULT_BRUSH_SIZE,
            color: Color::new(10, 10, 80, 155),
            first_update_index: None,
        };
        Self {
            handle: BrushHandle {
                role,
                inbox: Arc::new(Mutex::new(inbox)),
            },
            texture,
            carry_over: BrushSample::default(),
            drained: Vec::new(),
        }
    }

    pub fn with_size(self, size: f32) -> Self {
        self.handle.set_size(size);
        self
    }

    /// Producer handle for the input side.
    pub fn handle(&self) -> BrushHandle {
        self.handle.clone()
    }

    #[inline]
    pub fn role(&self) -> BrushRole {
        self.handle.role
    }

    #[inline]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    #[inline]
    pub fn carry_over(&self) -> &BrushSample {
        &self.carry_over
    }

    /// Convenience for single-threaded callers; see [`BrushHandle::append`].
    pub fn append(&self, position: Vec2, force: f32, first_of_stroke: bool) {
        self.handle.append(position, force, first_of_stroke);
    }

    /// Interpolates every queued sample into `sink`, in arrival order.
    ///
    /// Every sample that opens a stroke reseeds the run, so nothing is drawn
    /// from the end of the previous, unrelated stroke, even when both strokes
    /// were queued within one frame. A queue that starts mid-stroke continues
    /// from the carry-over sample. Returns the number of samples drained.
    pub fn drain_and_interpolate(&mut self, extent: CanvasExtent, sink: &mut StagingBuffer) -> usize {
        {
            let mut inbox = self.handle.inbox.lock();
            std::mem::swap(&mut inbox.pending, &mut self.drained);
        }

        if self.drained.is_empty() {
            return 0;
        }

        let mut current = self.carry_over;

        let before = sink.len();
        for next in &self.drained {
            if next.first_of_stroke {
                current = *next;
            }
            interpolate(next, &mut current, self.texture, extent, sink);
        }
        self.carry_over = current;

        let count = self.drained.len();
        log::debug!(
            "brush {}: drained {} samples, staged {} stamps",
            self.role().name(),
            count,
            sink.len() - before
        );
        self.drained.clear();
        count
    }
}

/// The two brushes of the application, one per input role.
#[derive(Debug)]
pub struct Brushes {
    pub live: Brush,
    pub corrected: Brush,
}

impl Brushes {
    pub fn new(texture: TextureId, size: f32) -> Self {
        Self {
            live: Brush::new(BrushRole::Live, texture).with_size(size),
            corrected: Brush::new(BrushRole::Corrected, texture).with_size(size),
        }
    }

    pub fn handles(&self) -> BrushHandles {
        BrushHandles {
            live: self.live.handle(),
            corrected: self.corrected.handle(),
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brush> {
        [&mut self.live, &mut self.corrected].into_iter()
    }
}

/// Producer handles for [`Brushes`].
#[derive(Debug, Clone)]
pub struct BrushHandles {
    pub live: BrushHandle,
    pub corrected: BrushHandle,
}

impl BrushHandles {
    pub fn get(&self, role: BrushRole) -> &BrushHandle {
        match role {
            BrushRole::Live => &self.live,
            BrushRole::Corrected => &self.corrected,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrushHandle> {
        [&self.live, &self.corrected].into_iter()
    }
}
