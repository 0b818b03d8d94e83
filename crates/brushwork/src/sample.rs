//! Input samples and the per-instance records uploaded to the GPU.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::texture::TextureId;
use glam::Vec2;

/// One point-in-time description of a pointer touching the canvas.
///
/// Positions are in canvas space, which spans `[-width, width] x [-height, height]`
/// so that dividing by the [`CanvasExtent`] lands directly in clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSample {
    pub position: Vec2,
    /// Sensor pressure, roughly `0..1`. Not clamped.
    pub force: f32,
    /// Seeds a new stroke instead of continuing from the carry-over sample.
    pub first_of_stroke: bool,
    /// Stamp diameter in canvas units.
    pub stamp_size: f32,
    pub color: Color,
}

impl Default for BrushSample {
    fn default() -> Self {
        Self {
            position: Vec2::new(40.0, 40.0),
            force: 1.0,
            first_of_stroke: true,
            stamp_size: 16.0,
            color: Color::new(255, 10, 255, 100),
        }
    }
}

impl BrushSample {
    /// A full-pressure sample, as used for UI elements.
    pub fn at(position: Vec2, stamp_size: f32, color: Color) -> Self {
        Self {
            position,
            force: 1.0,
            first_of_stroke: true,
            stamp_size,
            color,
        }
    }
}

/// Per-instance stamp record. Must match the instance inputs of `stamp.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StampInstance {
    /// Stamp center in clip space.
    pub position: [f32; 2],
    /// Stamp half-extent in clip space.
    pub size: [f32; 2],
    /// Straight RGBA; alpha already carries the pressure response.
    pub color: [f32; 4],
    pub texture_index: u32,
}

// Vertex buffer stride, asserted at compile time.
const _: [(); 36] = [(); core::mem::size_of::<StampInstance>()];

/// Canvas dimensions used to normalise sample positions and sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasExtent {
    pub width: f32,
    pub height: f32,
}

impl CanvasExtent {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidExtent { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Converts a sample into a GPU stamp instance.
///
/// Alpha is scaled by `force^2`, a convex pressure response: light touches
/// fade quickly, firm ones stay close to the nominal opacity.
pub fn convert(sample: &BrushSample, texture: TextureId, extent: CanvasExtent) -> StampInstance {
    let p = sample.position / extent.as_vec2();
    let s = Vec2::splat(sample.stamp_size) / extent.as_vec2();
    let [r, g, b, a] = sample.color.to_unit();

    StampInstance {
        position: p.to_array(),
        size: s.to_array(),
        color: [r, g, b, a * sample.force.powi(2)],
        texture_index: texture.index(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_normalises_to_extent() {
        let extent = CanvasExtent::new(2048.0, 1024.0).unwrap();
        let sample = BrushSample {
            position: Vec2::new(1024.0, -512.0),
            force: 1.0,
            first_of_stroke: false,
            stamp_size: 256.0,
            color: Color::new(255, 0, 51, 255),
        };

        let inst = convert(&sample, TextureId::new(3), extent);
        assert_eq!(inst.position, [0.5, -0.5]);
        assert_eq!(inst.size, [0.125, 0.25]);
        assert_eq!(inst.color, [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(inst.texture_index, 3);
    }

    #[test]
    fn alpha_follows_squared_force() {
        let extent = CanvasExtent::new(100.0, 100.0).unwrap();
        let sample = BrushSample {
            force: 0.5,
            color: Color::new(0, 0, 0, 255),
            ..BrushSample::default()
        };
        let inst = convert(&sample, TextureId::new(0), extent);
        assert!((inst.color[3] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rejects_degenerate_extent() {
        assert!(CanvasExtent::new(0.0, 10.0).is_err());
        assert!(CanvasExtent::new(10.0, f32::NAN).is_err());
        assert!(CanvasExtent::new(-1.0, 10.0).is_err());
    }
}
