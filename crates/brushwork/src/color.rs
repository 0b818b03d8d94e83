//! 8-bit RGBA colors and the HSV helpers used by the color picker.

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color, fully opaque.
    #[inline]
    pub const fn opaque(self) -> Self {
        Self { a: 0xff, ..self }
    }

    /// Saturating conversion from unit floats; negative inputs are mirrored.
    pub fn from_unit_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        #[inline(always)]
        fn q(x: f32) -> u8 {
            (x.abs() * 255.0).min(255.0) as u8
        }
        Self::new(q(r), q(g), q(b), q(a))
    }

    /// Channels scaled to `[0, 1]`.
    #[inline]
    pub fn to_unit(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Hue in degrees `[0, 360)`, saturation/value/alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

impl Hsv {
    #[inline]
    pub const fn new(h: f32, s: f32, v: f32, a: f32) -> Self {
        Self { h, s, v, a }
    }

    /// Converts to RGB. Alpha of the result is carried over from `self.a`.
    pub fn to_rgb(self) -> Color {
        let Hsv { h, s, v, a } = self;
        if s <= 0.0 {
            return Color::from_unit_rgba(v, v, v, a);
        }

        let hh = if h >= 360.0 { 0.0 } else { h } / 60.0;
        let sector = hh as i32;
        let ff = hh - sector as f32;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * ff);
        let t = v * (1.0 - s * (1.0 - ff));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Color::from_unit_rgba(r, g, b, a)
    }
}

/// Integer picker coordinates: hue in degrees, saturation/value/alpha in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerHsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
    pub a: u8,
}

impl PickerHsv {
    /// Perceptual mapping used by the picker textures: saturation is pushed
    /// toward 1 and value toward 0 so the useful range fills more of the swatch.
    pub fn to_hsv(self) -> Hsv {
        Hsv {
            h: self.h as f32,
            s: (self.s as f32 / 255.0).sqrt().sqrt(),
            v: (self.v as f32 / 255.0).powf(1.4),
            a: (self.a as f32 / 255.0).sqrt(),
        }
    }
}

/// `a * f + b * (1 - f)`; note `f` weights the *first* argument.
#[inline]
pub fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a * f + b * (1.0 - f)
}

/// Blends two HSV colors, taking the short way around the hue circle.
/// Alpha is left at zero, matching the slot colors it is used for.
pub fn lerp_hsv(a: Hsv, b: Hsv, f: f32) -> Hsv {
    let h = if (a.h - b.h).abs() < 180.0 {
        lerp(a.h, b.h, f)
    } else {
        let h = if a.h > b.h {
            lerp(a.h, b.h + 360.0, f)
        } else {
            lerp(a.h + 360.0, b.h, f)
        };
        if h > 360.0 {
            h - 360.0
        } else {
            h
        }
    };

    Hsv {
        h,
        s: lerp(a.s, b.s, f),
        v: lerp(a.v, b.v, f),
        a: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues_convert_to_rgb() {
        assert_eq!(Hsv::new(0.0, 1.0, 1.0, 1.0).to_rgb(), Color::new(255, 0, 0, 255));
        assert_eq!(Hsv::new(120.0, 1.0, 1.0, 1.0).to_rgb(), Color::new(0, 255, 0, 255));
        assert_eq!(Hsv::new(240.0, 1.0, 1.0, 1.0).to_rgb(), Color::new(0, 0, 255, 255));
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = Hsv::new(77.0, 0.0, 0.5, 1.0).to_rgb();
        assert_eq!((c.r, c.g, c.b), (127, 127, 127));
    }

    #[test]
    fn hue_of_360_wraps_to_red() {
        assert_eq!(Hsv::new(360.0, 1.0, 1.0, 1.0).to_rgb(), Color::new(255, 0, 0, 255));
    }

    #[test]
    fn picker_mapping_is_monotonic_and_saturating() {
        let lo = PickerHsv { h: 10, s: 0, v: 0, a: 0 }.to_hsv();
        let hi = PickerHsv { h: 10, s: 255, v: 255, a: 255 }.to_hsv();
        assert_eq!((lo.s, lo.v, lo.a), (0.0, 0.0, 0.0));
        assert_eq!((hi.s, hi.v, hi.a), (1.0, 1.0, 1.0));

        let mid = PickerHsv { h: 10, s: 16, v: 128, a: 64 }.to_hsv();
        assert!(mid.s > 16.0 / 255.0);
        assert!(mid.v < 128.0 / 255.0);
    }

    #[test]
    fn hue_lerp_takes_short_way_round() {
        let a = Hsv::new(350.0, 1.0, 1.0, 1.0);
        let b = Hsv::new(10.0, 1.0, 1.0, 1.0);
        let mid = lerp_hsv(a, b, 0.5);
        assert!(mid.h < 1e-3 || (mid.h - 360.0).abs() < 1e-3, "got {}", mid.h);

        let near = lerp_hsv(Hsv::new(100.0, 0.0, 0.0, 0.0), Hsv::new(120.0, 1.0, 1.0, 0.0), 0.9);
        assert!((near.h - 102.0).abs() < 1e-4);
        assert!((near.s - 0.1).abs() < 1e-6);
    }

    #[test]
    fn unit_conversion_round_trips_extremes() {
        assert_eq!(Color::new(0, 255, 0, 255).to_unit(), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(Color::from_unit_rgba(2.0, -1.0, 0.0, 1.0), Color::new(255, 255, 0, 255));
    }
}
