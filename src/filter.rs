//! In-place per-pixel filters.
//!
//! Every filter works in the buffer's own channel domain and leaves stride
//! padding untouched.

use imgref::ImgRefMut;

use crate::color::Color;
use crate::convert::convert;
use crate::pixel::{Channel, Pixel};

/// Apply `f` to every visible pixel.
pub fn map<P: Pixel>(mut img: ImgRefMut<'_, P>, mut f: impl FnMut(P) -> P) {
    for row in img.rows_mut() {
        for px in row {
            *px = f(*px);
        }
    }
}

/// `MAX − c` on every colour channel. Alpha is kept.
pub fn invert<P: Pixel>(img: ImgRefMut<'_, P>) {
    map(img, |p| p.map_color(P::Channel::invert));
}

/// Replace colour with its unweighted luminance. Alpha is kept.
pub fn desaturate<P: Pixel>(img: ImgRefMut<'_, P>) {
    map(img, |p| P::from_luma(p.luma(), p.alpha_value()));
}

/// Multiply each channel by the matching channel of `tint`, alpha included
/// for layouts that carry it. Greyscale multiplies by the tint's luminance.
pub fn tint<P: Pixel>(img: ImgRefMut<'_, P>, tint: Color) {
    let t: P = convert(tint.clamped());
    let ta = t.alpha_value();
    map(img, |p| {
        p.zip_color(t, P::Channel::multiply)
            .replace_alpha(P::Channel::multiply(p.alpha_value(), ta))
    });
}

/// Scale colour channels by alpha. A no-op without alpha.
pub fn premultiply<P: Pixel>(img: ImgRefMut<'_, P>) {
    if !P::HAS_ALPHA {
        return;
    }
    map(img, |p| {
        let a = p.alpha_value();
        p.map_color(|c| P::Channel::multiply(c, a))
    });
}

/// Divide colour channels by alpha, clamping integers at `MAX`. Pixels
/// with zero alpha become all-zero colour. A no-op without alpha.
pub fn unpremultiply<P: Pixel>(img: ImgRefMut<'_, P>) {
    if !P::HAS_ALPHA {
        return;
    }
    map(img, |p| {
        let a = p.alpha_value();
        p.map_color(|c| P::Channel::divide(c, a))
    });
}
