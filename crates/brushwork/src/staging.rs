//! Bounded per-frame collection of stamp instances.

use crate::error::{Error, Result};
use crate::sample::StampInstance;

/// Ordered, capacity-bounded sink for one frame's instances.
///
/// Appends past capacity are dropped and counted, never resized into. The
/// buffer is handed to the renderer once per frame and then cleared with its
/// allocation kept.
#[derive(Debug)]
pub struct StagingBuffer {
    instances: Vec<StampInstance>,
    capacity: usize,
    dropped: usize,
}

impl StagingBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity {
                what: "staging buffer",
            });
        }
        Ok(Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        })
    }

    /// Appends `instance`, or drops it if the buffer is full.
    /// Returns whether the instance was kept.
    #[inline]
    pub fn push(&mut self, instance: StampInstance) -> bool {
        if self.is_full() {
            self.dropped += 1;
            return false;
        }
        self.instances.push(instance);
        true
    }

    /// Records instances a producer gave up on because the buffer was full.
    #[inline]
    pub fn note_dropped(&mut self, count: usize) {
        self.dropped += count;
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances rejected since the last [`clear`](Self::clear).
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[inline]
    pub fn as_slice(&self) -> &[StampInstance] {
        &self.instances
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }
}
