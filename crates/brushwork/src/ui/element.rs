use crate::color::{Color, Hsv, PickerHsv};
use crate::sample::BrushSample;
use crate::texture::{StampTexture, TextureId};
use glam::Vec2;

/// Side length of the color picker's saturation/value swatch texture.
pub const PICKER_TEXTURE_DIM: u32 = 256;
/// Hue strip texture: one texel column per degree.
pub const HUE_TEXTURE_WIDTH: u32 = 360;
pub const HUE_TEXTURE_HEIGHT: u32 = 2;

/// Per-frame state an element may need to describe itself.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext {
    /// Color of the brush the UI currently edits.
    pub brush_color: Color,
    /// Brush size the resize button would commit if released now.
    pub pending_size: f32,
}

/// What a UI element contributes to a frame.
pub trait Drawable {
    /// The stamp sample drawing this element.
    fn instance(&self, ctx: &DrawContext) -> BrushSample;

    /// Regenerates the element's own texture if it is stale.
    /// Returns whether any pixels were written.
    fn fill_texture(&mut self, texture: &mut StampTexture) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// Swatch remembering an HSV color. Also used, non-hitable, for the marker
    /// behind the active slot.
    ColorSlot { hsv: Hsv },
    /// Saturation/value square for a fixed hue.
    ColorPicker { hue: u16 },
    HueStrip,
    /// Drag target for resizing the brush. `first` is where the drag started,
    /// `current` the latest precise pointer location.
    ResizeButton { first: Vec2, current: Vec2 },
    /// Preview of the pending brush size while the resize button is held.
    BrushIndicator,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub position: Vec2,
    /// Half-extent in canvas units.
    pub size: Vec2,
    pub texture: TextureId,
    pub color: Color,
    pub hitable: bool,
    pub dirty: bool,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind, position: Vec2, size: f32, texture: TextureId) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            size: Vec2::splat(size),
            texture,
            color: Color::WHITE,
            hitable: true,
            dirty: true,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color.opaque();
        self
    }

    pub fn not_hitable(mut self) -> Self {
        self.hitable = false;
        self
    }

    /// Rectangular hit test; the element spans `position ± size`, edges excluded.
    pub fn is_over(&self, pos: Vec2) -> bool {
        let min = self.position - self.size;
        let max = self.position + self.size;
        self.hitable && min.x < pos.x && pos.x < max.x && min.y < pos.y && pos.y < max.y
    }

    /// Whether the element draws from a texture it owns and regenerates.
    pub fn owns_texture(&self) -> bool {
        matches!(self.kind, ElementKind::ColorPicker { .. } | ElementKind::HueStrip)
    }

    /// Saturation and value under `pos` for a color picker. Other kinds yield
    /// `None`.
    pub fn pick_saturation_value(&self, pos: Vec2) -> Option<(f32, f32)> {
        let ElementKind::ColorPicker { .. } = self.kind else {
            return None;
        };
        let dim = self.size.x;
        let origin = self.position + Vec2::splat(dim);
        let sv = (origin - pos) / 2.0;
        let s = ((dim - sv.y) / dim).clamp(0.0, 1.0);
        let v = ((dim - sv.x) / dim).clamp(0.0, 1.0);
        Some((s, v))
    }

    /// Hue in degrees under `pos` for a hue strip.
    pub fn pick_hue(&self, pos: Vec2) -> Option<f32> {
        let ElementKind::HueStrip = self.kind else {
            return None;
        };
        let left = self.position.x - self.size.x;
        Some(((pos.x - left) / 2.0).clamp(0.0, 360.0))
    }

    /// Brush size implied by the current drag on a resize button: grows by half
    /// of how much further from the button the pointer is now than when the drag
    /// began.
    pub fn resized(&self, base: f32) -> Option<f32> {
        let ElementKind::ResizeButton { first, current } = self.kind else {
            return None;
        };
        let dist_first = (first - self.position).length();
        let dist_current = (self.position - current).length();
        Some(base + (dist_current - dist_first) / 2.0)
    }
}

impl Drawable for Element {
    fn instance(&self, ctx: &DrawContext) -> BrushSample {
        match self.kind {
            ElementKind::ResizeButton { .. } => BrushSample::at(self.position, self.size.x, ctx.brush_color),
            ElementKind::BrushIndicator => BrushSample::at(self.position, ctx.pending_size, ctx.brush_color),
            _ => BrushSample::at(self.position, self.size.x, self.color),
        }
    }

    fn fill_texture(&mut self, texture: &mut StampTexture) -> bool {
        if !self.dirty || !self.owns_texture() {
            return false;
        }
        self.dirty = false;

        match self.kind {
            ElementKind::ColorPicker { hue } => {
                // Rows run over saturation, columns over value.
                texture.fill_with(|x, y| {
                    PickerHsv {
                        h: hue,
                        s: y.min(255) as u8,
                        v: x.min(255) as u8,
                        a: 255,
                    }
                    .to_hsv()
                    .to_rgb()
                    .opaque()
                });
            }
            ElementKind::HueStrip => {
                texture.fill_with(|x, _| {
                    PickerHsv {
                        h: x as u16,
                        s: 255,
                        v: 255,
                        a: 255,
                    }
                    .to_hsv()
                    .to_rgb()
                    .opaque()
                });
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureRegistry;

    const TEX: TextureId = TextureId::new(0);

    #[test]
    fn hit_test_excludes_edges_and_non_hitable() {
        let el = Element::new("slot", ElementKind::HueStrip, Vec2::new(10.0, 10.0), 5.0, TEX);
        assert!(el.is_over(Vec2::new(14.9, 5.1)));
        assert!(!el.is_over(Vec2::new(15.0, 10.0)));
        assert!(!el.is_over(Vec2::new(10.0, 5.0)));
        assert!(!el.clone().not_hitable().is_over(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn picker_maps_corners_to_saturation_and_value() {
        let el = Element::new(
            "picker",
            ElementKind::ColorPicker { hue: 0 },
            Vec2::new(800.0, -2000.0),
            500.0,
            TEX,
        );
        // Bottom-left edge of the hit box is zero saturation, zero value.
        assert_eq!(el.pick_saturation_value(Vec2::new(300.0, -2500.0)), Some((0.0, 0.0)));
        assert_eq!(el.pick_saturation_value(Vec2::new(800.0, -2000.0)), Some((0.5, 0.5)));
        assert_eq!(el.pick_saturation_value(Vec2::new(5000.0, 5000.0)), Some((1.0, 1.0)));
        assert_eq!(el.pick_hue(Vec2::ZERO), None);
    }

    #[test]
    fn hue_strip_spans_360_degrees() {
        let el = Element::new("hue", ElementKind::HueStrip, Vec2::new(1700.0, -2000.0), 360.0, TEX);
        assert_eq!(el.pick_hue(Vec2::new(1340.0, -2000.0)), Some(0.0));
        assert_eq!(el.pick_hue(Vec2::new(1700.0, -2000.0)), Some(180.0));
        assert_eq!(el.pick_hue(Vec2::new(9000.0, -2000.0)), Some(360.0));
    }

    #[test]
    fn resize_grows_with_drag_distance() {
        let mut el = Element::new(
            "button",
            ElementKind::ResizeButton {
                first: Vec2::ZERO,
                current: Vec2::ZERO,
            },
            Vec2::ZERO,
            128.0,
            TEX,
        );
        el.kind = ElementKind::ResizeButton {
            first: Vec2::new(10.0, 0.0),
            current: Vec2::new(110.0, 0.0),
        };
        assert_eq!(el.resized(256.0), Some(306.0));
    }

    #[test]
    fn button_and_indicator_wear_brush_color() {
        let ctx = DrawContext {
            brush_color: Color::new(1, 2, 3, 255),
            pending_size: 77.0,
        };
        let ind = Element::new("ind", ElementKind::BrushIndicator, Vec2::ZERO, 16.0, TEX);
        let s = ind.instance(&ctx);
        assert_eq!(s.color, ctx.brush_color);
        assert_eq!(s.stamp_size, 77.0);

        let slot = Element::new("slot", ElementKind::HueStrip, Vec2::ZERO, 100.0, TEX)
            .with_color(Color::new(43, 43, 43, 0));
        let s = slot.instance(&ctx);
        assert_eq!(s.color, Color::new(43, 43, 43, 255));
        assert_eq!(s.force, 1.0);
    }

    #[test]
    fn textures_fill_once_per_dirty_flag() {
        let mut reg = TextureRegistry::new();
        let id = reg.register(PICKER_TEXTURE_DIM, PICKER_TEXTURE_DIM);
        let mut picker = Element::new(
            "picker",
            ElementKind::ColorPicker { hue: 120 },
            Vec2::ZERO,
            500.0,
            id,
        );

        let tex = reg.get_mut(id).unwrap();
        assert!(picker.fill_texture(tex));
        assert!(!picker.fill_texture(tex));

        // Full saturation and value at the far corner is pure green.
        let last = (PICKER_TEXTURE_DIM * PICKER_TEXTURE_DIM - 1) as usize * 4;
        assert_eq!(&tex.pixels()[last..last + 4], &[0, 255, 0, 255]);
        // Zero value is black regardless of hue.
        assert_eq!(&tex.pixels()[..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn plain_elements_never_fill() {
        let mut reg = TextureRegistry::new();
        let id = reg.register_circle_stamp(8);
        let before = reg.get(id).unwrap().pixels().to_vec();
        let mut slot = Element::new("slot", ElementKind::ColorSlot { hsv: Hsv::default() }, Vec2::ZERO, 10.0, id);
        assert!(!slot.fill_texture(reg.get_mut(id).unwrap()));
        assert_eq!(reg.get(id).unwrap().pixels(), &before[..]);
    }
}
