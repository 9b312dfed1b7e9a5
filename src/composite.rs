//! Compositing operators: combine a source pixel with an existing
//! destination pixel.
//!
//! Every operator works in the destination's channel domain: the source is
//! converted first, then combined.

use crate::convert::convert;
use crate::pixel::{Channel, Pixel};

/// A per-pixel `(src, dst) → dst` operator.
pub trait Composite {
    fn apply<S: Pixel, D: Pixel>(src: S, dst: D) -> D;
}

/// Replace the destination with the converted source.
#[derive(Clone, Copy, Debug, Default)]
pub struct Replace;

/// Porter-Duff "source over destination".
#[derive(Clone, Copy, Debug, Default)]
pub struct Over;

/// Additive: destination colour += source colour × source alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct Additive;

impl Composite for Replace {
    #[inline(always)]
    fn apply<S: Pixel, D: Pixel>(src: S, _dst: D) -> D {
        convert(src)
    }
}

impl Composite for Over {
    #[inline(always)]
    fn apply<S: Pixel, D: Pixel>(src: S, dst: D) -> D {
        blend(src, dst)
    }
}

impl Composite for Additive {
    #[inline(always)]
    fn apply<S: Pixel, D: Pixel>(src: S, dst: D) -> D {
        add(src, dst)
    }
}

/// `src over dst`.
///
/// A source without alpha replaces the destination. Otherwise
/// `out_a = sa + da·(1 − sa)` and each colour channel is
/// `(sc·sa + dc·da·(1 − sa)) / out_a`. A zero `out_a` yields the all-zero
/// pixel. Integer destinations are computed exactly in `u128`; float
/// destinations blend in `f64`.
#[inline]
pub fn blend<S: Pixel, D: Pixel>(src: S, dst: D) -> D {
    if !S::HAS_ALPHA {
        return convert(src);
    }
    let sa: D::Channel = src.alpha_value().convert();
    if sa == D::Channel::MAX {
        return convert(src);
    }
    let da = dst.alpha_value();
    let out_a = D::Channel::over_alpha(sa, da);
    if out_a == D::Channel::ZERO {
        return <D as bytemuck::Zeroable>::zeroed();
    }
    let s: D = convert(src);
    s.zip_color(dst, |sc, dc| D::Channel::over(sc, sa, dc, da, out_a))
        .replace_alpha(out_a)
}

/// `dst + src·src_alpha`, per colour channel.
///
/// A source whose alpha is exactly zero returns `dst` untouched. Integer
/// destinations saturate at `MAX`; float destinations accumulate without
/// clamping. Destination alpha is kept.
#[inline]
pub fn add<S: Pixel, D: Pixel>(src: S, dst: D) -> D {
    if S::HAS_ALPHA && src.alpha_value() == S::Channel::ZERO {
        return dst;
    }
    let sa: D::Channel = if S::HAS_ALPHA {
        src.alpha_value().convert()
    } else {
        D::Channel::MAX
    };
    let s: D = convert(src);
    dst.zip_color(s, |dc, sc| D::Channel::add_weighted(dc, sc, sa))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::pixel::*;

    #[test]
    fn replace_ignores_destination() {
        let out: Rgba8 = Replace::apply(Rgb8::new(1, 2, 3), Rgba8::new(9, 9, 9, 9));
        assert_eq!(out, Rgba8::new(1, 2, 3, 255));
    }

    #[test]
    fn blend_without_source_alpha_is_copy() {
        let out: Rgba16 = blend(Rgb8::new(255, 0, 0), Rgba16::new(0, 0, 65535, 0));
        assert_eq!(out, Rgba16::new(65535, 0, 0, 65535));
    }

    #[test]
    fn blend_opaque_source_replaces() {
        let out: Rgba8 = blend(Rgba8::new(10, 20, 30, 255), Rgba8::new(200, 200, 200, 255));
        assert_eq!(out, Rgba8::new(10, 20, 30, 255));
    }

    #[test]
    fn blend_transparent_source_keeps_destination() {
        let dst = Rgba8::new(200, 100, 50, 255);
        assert_eq!(blend(Rgba8::new(1, 2, 3, 0), dst), dst);
    }

    #[test]
    fn blend_half_over_opaque() {
        let out: Rgba8 = blend(Rgba8::new(255, 0, 0, 128), Rgba8::new(0, 0, 255, 255));
        // out_a = 128 + 255·127/255 = 255
        // r = 255·128·255 / (255·255) = 128, b = 255·255·127 / (255·255) = 127
        assert_eq!(out, Rgba8::new(128, 0, 127, 255));
    }

    #[test]
    fn blend_over_transparent_destination() {
        let out: Rgba8 = blend(Rgba8::new(100, 50, 25, 64), Rgba8::new(0, 0, 0, 0));
        assert_eq!(out, Rgba8::new(100, 50, 25, 64));
    }

    #[test]
    fn blend_zero_alpha_everywhere_is_zero_pixel() {
        let out: Rgba16 = blend(Rgba8::new(9, 9, 9, 0), Rgba16::new(7, 7, 7, 0));
        assert_eq!(out, Rgba16::new(0, 0, 0, 0));
    }

    #[test]
    fn blend_into_opaque_layouts() {
        let out: Rgb8 = blend(Rgba8::new(255, 255, 255, 51), Rgb8::new(0, 0, 0));
        assert_eq!(out, Rgb8::new(51, 51, 51));
        let out: Grey8 = blend(Rgba8::new(255, 255, 255, 51), Grey8::new(0));
        assert_eq!(out.value(), 51);
    }

    #[test]
    fn blend_float_destinations() {
        let out: RgbaF32 = blend(
            Color::new(1.0, 0.0, 0.0, 0.5),
            RgbaF32::new(0.0, 0.0, 1.0, 1.0),
        );
        assert_eq!(out, RgbaF32::new(0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn add_zero_alpha_is_bit_exact_noop() {
        let dst = RgbaF32::new(f32::NAN, -3.0, 1e30, 0.25);
        let out = add(Rgba8::new(255, 255, 255, 0), dst);
        assert_eq!(bytemuck::bytes_of(&out), bytemuck::bytes_of(&dst));
    }

    #[test]
    fn add_saturates_integers() {
        let out: Rgba8 = add(Rgba8::new(200, 10, 0, 255), Rgba8::new(100, 10, 0, 7));
        assert_eq!(out, Rgba8::new(255, 20, 0, 7));
    }

    #[test]
    fn add_weights_by_source_alpha() {
        let out: Rgb8 = add(Rgba8::new(255, 255, 0, 51), Rgb8::new(0, 100, 0));
        assert_eq!(out, Rgb8::new(51, 151, 0));
    }

    #[test]
    fn add_float_accumulates_unclamped() {
        let out: RgbF32 = add(RgbF32::new(0.75, 0.5, 0.0), RgbF32::new(0.75, 0.0, 2.0));
        assert_eq!(out, RgbF32::new(1.5, 0.5, 2.0));
    }
}
