//! RGBA color type used by draw commands.
//!
//! Components are `f64` in [0, 1]; alpha is straight (not premultiplied).

/// sRGB color with straight alpha, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Rgba {
        Rgba {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Returns the same color with alpha replaced, clamped to [0, 1].
    ///
    /// NaN alpha becomes fully transparent.
    pub fn with_alpha(self, a: f64) -> Rgba {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Rgba { a, ..self }
    }

    /// Quantizes to four 8-bit channels with rounding. NaN maps to 0.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Linear interpolation of all four channels. `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn rgb8_is_opaque() {
        let c = Rgba::rgb8(0xf4, 0x72, 0xb6);
        assert_eq!(c.a, 1.0);
        assert!((c.r - 244.0 / 255.0).abs() < EPSILON);
    }

    #[test]
    fn to_rgba8_clamps_out_of_range_channels() {
        let c = Rgba {
            r: 2.0,
            g: -1.0,
            b: f64::NAN,
            a: 0.5,
        };
        assert_eq!(c.to_rgba8(), [255, 0, 0, 128]);
    }

    #[test]
    fn with_alpha_clamps_and_guards_nan() {
        assert_eq!(Rgba::WHITE.with_alpha(2.0).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-1.0).a, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(f64::NAN).a, 0.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba::BLACK;
        let b = Rgba::TRANSPARENT;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert!((a.lerp(b, 0.5).a - 0.5).abs() < EPSILON);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rgb8_quantizes_back_exactly(r: u8, g: u8, b: u8) {
                prop_assert_eq!(Rgba::rgb8(r, g, b).to_rgba8(), [r, g, b, 255]);
            }

            #[test]
            fn lerp_stays_between_endpoints(t in -1.0_f64..2.0) {
                let c = Rgba::BLACK.lerp(Rgba::WHITE, t);
                prop_assert!(c.r >= 0.0 && c.r <= 1.0);
            }
        }
    }
}
