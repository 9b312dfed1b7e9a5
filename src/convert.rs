//! Value and pixel conversion between pixel types.
//!
//! ```rust
//! use swatch::convert::{convert, convert_value};
//! use swatch::pixel::{Rgb8, Rgb16, Rgba8};
//!
//! assert_eq!(convert_value::<Rgb8, Rgb16>(255), 65535);
//! let p: Rgba8 = convert(Rgb8::new(1, 2, 3));
//! assert_eq!(p, Rgba8::new(1, 2, 3, 255));
//! ```

use core::any::TypeId;

use crate::pixel::{Channel, Pixel};

/// Convert one channel value from the domain of `S` to the domain of `D`.
///
/// - same channel type: identity;
/// - float → float: plain cast;
/// - float → int: `v · MAX`, clamped, truncated;
/// - int → float: `v / MAX`;
/// - int → int: `v · D::MAX / S::MAX` in a widened integer, so
///   `255u8 → 65535u16` exactly.
#[inline(always)]
pub fn convert_value<S: Pixel, D: Pixel>(v: S::Channel) -> D::Channel {
    v.convert()
}

/// Convert a whole pixel.
///
/// Missing source alpha becomes `D::Channel::MAX`. Colour → greyscale uses
/// the unweighted channel average in the source domain; greyscale → colour
/// broadcasts. Converting a type to itself returns the input bit-for-bit.
#[inline(always)]
pub fn convert<S: Pixel, D: Pixel>(src: S) -> D {
    if TypeId::of::<S>() == TypeId::of::<D>() {
        return bytemuck::cast(src);
    }
    let a = if S::HAS_ALPHA {
        src.alpha_value().convert()
    } else {
        D::Channel::MAX
    };
    if S::IS_GREY || D::IS_GREY {
        D::from_luma(src.luma().convert(), a)
    } else {
        D::from_rgba(
            src.red().convert(),
            src.green().convert(),
            src.blue().convert(),
            a,
        )
    }
}

/// Convert a row of pixels element by element.
///
/// Converts `min(src.len(), dst.len())` pixels.
pub fn convert_slice<S: Pixel, D: Pixel>(src: &[S], dst: &mut [D]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = convert(*s);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
