//! Segment resampling: turns one raw `current -> next` transition into a run
//! of evenly spaced stamps.

use crate::sample::{convert, BrushSample, CanvasExtent};
use crate::staging::StagingBuffer;
use crate::texture::TextureId;

/// Hard ceiling on stamps emitted for a single segment.
pub const MAX_SEGMENT_STAMPS: usize = 400;

/// Stamp spacing is `stamp_size / SPACING_DIVISOR`, but never below one unit.
pub const SPACING_DIVISOR: f32 = 30.0;

/// Spacing between stamps for a brush of the given size.
#[inline]
pub fn stamp_spacing(stamp_size: f32) -> f32 {
    (stamp_size / SPACING_DIVISOR).max(1.0)
}

/// Emits stamps from `current` toward `next` into `sink` and advances `current`.
///
/// After the call `current` carries `next`'s force, size and color, but its
/// position is wherever stepping stopped rather than `next.position`. The
/// following segment resumes from that point, so a sub-spacing remainder is
/// carried forward and a segment cut short by a full `sink` does not jump.
/// Whatever a full sink cut off is not replayed later.
///
/// Zero-length segments leave `current` untouched and emit nothing.
/// Returns the number of stamps actually stored in `sink`.
pub fn interpolate(
    next: &BrushSample,
    current: &mut BrushSample,
    texture: TextureId,
    extent: CanvasExtent,
    sink: &mut StagingBuffer,
) -> usize {
    let delta = next.position - current.position;
    let distance = delta.length();
    if distance == 0.0 {
        return 0;
    }

    let mut spacing = stamp_spacing(next.stamp_size);
    let mut n = ((distance / spacing) as usize).max(1);
    if n > MAX_SEGMENT_STAMPS {
        n = MAX_SEGMENT_STAMPS;
        spacing = distance / n as f32;
    }

    let step = delta.normalize() * spacing;
    let force_step = (next.force - current.force) / (n + 1) as f32;

    log::trace!(
        "segment: n={} spacing={:.2} px/segment={:.0}",
        n,
        spacing,
        current.stamp_size * current.stamp_size * n as f32
    );

    let mut emitted = 0;
    for _ in 0..n {
        if sink.is_full() {
            sink.note_dropped(n - emitted);
            break;
        }
        sink.push(convert(current, texture, extent));
        emitted += 1;

        current.position += step;
        current.force += force_step;
    }

    let reached = current.position;
    *current = *next;
    current.position = reached;

    emitted
}
