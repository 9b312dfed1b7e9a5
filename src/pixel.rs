//! Pixel model: scalar channel domains and channel layouts.
//!
//! A pixel is one of three layouts from the [`rgb`] crate ([`Rgb`],
//! [`Rgba`], [`Gray`]) over one of five scalar types (`u8`, `u16`, `u32`,
//! `f32`, `f64`). Integer channels span `0..=2^bits-1`; float channels
//! span `0.0..=1.0`.
//!
//! Every channel type implements [`Channel`], which carries the full
//! 5×5 conversion table as plain functions. Converting `S → D` is a
//! double dispatch, `s.convert::<D>()` → `D::from_s(s)`, so the arithmetic
//! for every pair (including the identity pairs) is picked at compile time.

use core::fmt::Debug;

use bytemuck::Pod;
use rgb::{Gray, Rgb, Rgba};

// ---------------------------------------------------------------------------
// Concrete pixel types
// ---------------------------------------------------------------------------

pub type Rgb8 = Rgb<u8>;
pub type Rgba8 = Rgba<u8>;
pub type Grey8 = Gray<u8>;
pub type Rgb16 = Rgb<u16>;
pub type Rgba16 = Rgba<u16>;
pub type Grey16 = Gray<u16>;
pub type Rgb32 = Rgb<u32>;
pub type Rgba32 = Rgba<u32>;
pub type Grey32 = Gray<u32>;
pub type RgbF32 = Rgb<f32>;
pub type RgbaF32 = Rgba<f32>;
pub type GreyF32 = Gray<f32>;
pub type RgbF64 = Rgb<f64>;
pub type RgbaF64 = Rgba<f64>;
pub type GreyF64 = Gray<f64>;

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// One scalar channel domain.
///
/// Beyond the domain constants, the trait carries the conversion table
/// (`from_*`) and the small amount of per-channel arithmetic that the
/// compositing operators and filters need. Integer arithmetic is done in
/// `u128`, which holds the product of any three 32-bit maxima.
pub trait Channel: Pod + PartialEq + PartialOrd + Debug + Send + Sync {
    /// Fully saturated / fully opaque value.
    const MAX: Self;
    const ZERO: Self;
    const IS_FLOAT: bool;

    fn from_u8(v: u8) -> Self;
    fn from_u16(v: u16) -> Self;
    fn from_u32(v: u32) -> Self;
    fn from_f32(v: f32) -> Self;
    fn from_f64(v: f64) -> Self;

    /// Rescale into the domain of `D`. Never fails.
    fn convert<D: Channel>(self) -> D;

    /// `(a + b + c) / 3`, truncating for integers.
    fn average3(a: Self, b: Self, c: Self) -> Self;

    /// Alpha of `src over dst`: `sa + da·(1 − sa)`.
    fn over_alpha(sa: Self, da: Self) -> Self;

    /// Colour of `src over dst`, normalised by a non-zero `out_a`.
    fn over(sc: Self, sa: Self, dc: Self, da: Self, out_a: Self) -> Self;

    /// `dc + sc·sa`, clamped to `MAX` for integers.
    fn add_weighted(dc: Self, sc: Self, sa: Self) -> Self;

    /// `a·b` in the normalised domain.
    fn multiply(a: Self, b: Self) -> Self;

    /// `c / a` in the normalised domain; `0` when `a` is zero.
    fn divide(c: Self, a: Self) -> Self;

    /// `MAX − v`.
    fn invert(v: Self) -> Self;
}

/// `v * D::MAX / S::MAX` in `$wide`.
macro_rules! rescale {
    ($v:expr, $src:ty => $dst:ty, $wide:ty) => {
        ($v as $wide * <$dst>::MAX as $wide / <$src>::MAX as $wide) as $dst
    };
}

macro_rules! float_to_small_int {
    ($v:expr, $dst:ty) => {{
        let max = <$dst>::MAX as f64;
        (($v as f64) * max).clamp(0.0, max) as $dst
    }};
}

// The product is widened to f64 and clamped as an i64: scaling 1.0f32 by
// u32::MAX in f32 rounds up to 2^32.
macro_rules! float_to_u32 {
    ($v:expr) => {
        ((($v as f64) * u32::MAX as f64) as i64).clamp(0, u32::MAX as i64) as u32
    };
}

macro_rules! int_channel_arith {
    ($t:ty) => {
        #[inline(always)]
        fn average3(a: Self, b: Self, c: Self) -> Self {
            ((a as u64 + b as u64 + c as u64) / 3) as $t
        }

        #[inline(always)]
        fn over_alpha(sa: Self, da: Self) -> Self {
            let m = <$t>::MAX as u128;
            let (sa, da) = (sa as u128, da as u128);
            (sa + da * (m - sa) / m) as $t
        }

        #[inline(always)]
        fn over(sc: Self, sa: Self, dc: Self, da: Self, out_a: Self) -> Self {
            let m = <$t>::MAX as u128;
            let (sc, sa, dc, da) = (sc as u128, sa as u128, dc as u128, da as u128);
            let num = sc * sa * m + dc * da * (m - sa);
            (num / (m * out_a as u128)).min(m) as $t
        }

        #[inline(always)]
        fn add_weighted(dc: Self, sc: Self, sa: Self) -> Self {
            let m = <$t>::MAX as u128;
            (dc as u128 + sc as u128 * sa as u128 / m).min(m) as $t
        }

        #[inline(always)]
        fn multiply(a: Self, b: Self) -> Self {
            (a as u128 * b as u128 / <$t>::MAX as u128) as $t
        }

        #[inline(always)]
        fn divide(c: Self, a: Self) -> Self {
            if a == 0 {
                return 0;
            }
            let m = <$t>::MAX as u128;
            (c as u128 * m / a as u128).min(m) as $t
        }

        #[inline(always)]
        fn invert(v: Self) -> Self {
            <$t>::MAX - v
        }
    };
}

macro_rules! float_channel_arith {
    ($t:ty) => {
        #[inline(always)]
        fn average3(a: Self, b: Self, c: Self) -> Self {
            (a + b + c) / 3.0
        }

        #[inline(always)]
        fn over_alpha(sa: Self, da: Self) -> Self {
            sa + da * (1.0 - sa)
        }

        #[inline(always)]
        fn over(sc: Self, sa: Self, dc: Self, da: Self, out_a: Self) -> Self {
            let (sc, sa, dc, da) = (sc as f64, sa as f64, dc as f64, da as f64);
            ((sc * sa + dc * da * (1.0 - sa)) / out_a as f64) as $t
        }

        #[inline(always)]
        fn add_weighted(dc: Self, sc: Self, sa: Self) -> Self {
            dc + sc * sa
        }

        #[inline(always)]
        fn multiply(a: Self, b: Self) -> Self {
            a * b
        }

        #[inline(always)]
        fn divide(c: Self, a: Self) -> Self {
            if a == 0.0 { 0.0 } else { c / a }
        }

        #[inline(always)]
        fn invert(v: Self) -> Self {
            1.0 - v
        }
    };
}

impl Channel for u8 {
    const MAX: Self = u8::MAX;
    const ZERO: Self = 0;
    const IS_FLOAT: bool = false;

    #[inline(always)]
    fn from_u8(v: u8) -> Self {
        v
    }
    #[inline(always)]
    fn from_u16(v: u16) -> Self {
        rescale!(v, u16 => u8, u32)
    }
    #[inline(always)]
    fn from_u32(v: u32) -> Self {
        rescale!(v, u32 => u8, u64)
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        float_to_small_int!(v, u8)
    }
    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        float_to_small_int!(v, u8)
    }
    #[inline(always)]
    fn convert<D: Channel>(self) -> D {
        D::from_u8(self)
    }

    int_channel_arith!(u8);
}

impl Channel for u16 {
    const MAX: Self = u16::MAX;
    const ZERO: Self = 0;
    const IS_FLOAT: bool = false;

    #[inline(always)]
    fn from_u8(v: u8) -> Self {
        rescale!(v, u8 => u16, u32)
    }
    #[inline(always)]
    fn from_u16(v: u16) -> Self {
        v
    }
    #[inline(always)]
    fn from_u32(v: u32) -> Self {
        rescale!(v, u32 => u16, u64)
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        float_to_small_int!(v, u16)
    }
    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        float_to_small_int!(v, u16)
    }
    #[inline(always)]
    fn convert<D: Channel>(self) -> D {
        D::from_u16(self)
    }

    int_channel_arith!(u16);
}

impl Channel for u32 {
    const MAX: Self = u32::MAX;
    const ZERO: Self = 0;
    const IS_FLOAT: bool = false;

    #[inline(always)]
    fn from_u8(v: u8) -> Self {
        rescale!(v, u8 => u32, u64)
    }
    #[inline(always)]
    fn from_u16(v: u16) -> Self {
        rescale!(v, u16 => u32, u64)
    }
    #[inline(always)]
    fn from_u32(v: u32) -> Self {
        v
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        float_to_u32!(v)
    }
    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        float_to_u32!(v)
    }
    #[inline(always)]
    fn convert<D: Channel>(self) -> D {
        D::from_u32(self)
    }

    int_channel_arith!(u32);
}

impl Channel for f32 {
    const MAX: Self = 1.0;
    const ZERO: Self = 0.0;
    const IS_FLOAT: bool = true;

    #[inline(always)]
    fn from_u8(v: u8) -> Self {
        v as f32 / u8::MAX as f32
    }
    #[inline(always)]
    fn from_u16(v: u16) -> Self {
        v as f32 / u16::MAX as f32
    }
    #[inline(always)]
    fn from_u32(v: u32) -> Self {
        (v as f64 / u32::MAX as f64) as f32
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v
    }
    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    #[inline(always)]
    fn convert<D: Channel>(self) -> D {
        D::from_f32(self)
    }

    float_channel_arith!(f32);
}

impl Channel for f64 {
    const MAX: Self = 1.0;
    const ZERO: Self = 0.0;
    const IS_FLOAT: bool = true;

    #[inline(always)]
    fn from_u8(v: u8) -> Self {
        v as f64 / u8::MAX as f64
    }
    #[inline(always)]
    fn from_u16(v: u16) -> Self {
        v as f64 / u16::MAX as f64
    }
    #[inline(always)]
    fn from_u32(v: u32) -> Self {
        v as f64 / u32::MAX as f64
    }
    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v as f64
    }
    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v
    }
    #[inline(always)]
    fn convert<D: Channel>(self) -> D {
        D::from_f64(self)
    }

    float_channel_arith!(f64);
}

// ---------------------------------------------------------------------------
// Pixel
// ---------------------------------------------------------------------------

/// A channel layout over one [`Channel`] type.
///
/// Greyscale pixels answer `red`, `green` and `blue` with their luminance.
/// Pixels without alpha answer `alpha_value` with `Channel::MAX`.
pub trait Pixel: Pod + PartialEq + Debug + Send + Sync {
    type Channel: Channel;

    const CHANNELS: usize;
    const HAS_ALPHA: bool;
    const IS_GREY: bool;

    fn red(&self) -> Self::Channel;
    fn green(&self) -> Self::Channel;
    fn blue(&self) -> Self::Channel;
    fn alpha_value(&self) -> Self::Channel;

    /// Unweighted `(r + g + b) / 3`.
    #[inline(always)]
    fn luma(&self) -> Self::Channel {
        Self::Channel::average3(self.red(), self.green(), self.blue())
    }

    /// Build from four channels. Layouts without alpha drop `a`;
    /// greyscale stores the unweighted average of `r`, `g`, `b`.
    fn from_rgba(
        r: Self::Channel,
        g: Self::Channel,
        b: Self::Channel,
        a: Self::Channel,
    ) -> Self;

    #[inline(always)]
    fn from_rgb(r: Self::Channel, g: Self::Channel, b: Self::Channel) -> Self {
        Self::from_rgba(r, g, b, Self::Channel::MAX)
    }

    /// Build from one luminance value, broadcasting it to every colour
    /// channel.
    fn from_luma(v: Self::Channel, a: Self::Channel) -> Self;

    /// Replace alpha; a no-op for layouts without it.
    fn replace_alpha(self, a: Self::Channel) -> Self;

    /// Apply `f` to every colour channel, leaving alpha alone.
    fn map_color(self, f: impl FnMut(Self::Channel) -> Self::Channel) -> Self;

    /// Combine colour channels pairwise with `other`; alpha is taken from
    /// `self`.
    fn zip_color(
        self,
        other: Self,
        f: impl FnMut(Self::Channel, Self::Channel) -> Self::Channel,
    ) -> Self;
}

impl<T: Channel> Pixel for Rgb<T> {
    type Channel = T;

    const CHANNELS: usize = 3;
    const HAS_ALPHA: bool = false;
    const IS_GREY: bool = false;

    #[inline(always)]
    fn red(&self) -> T {
        self.r
    }
    #[inline(always)]
    fn green(&self) -> T {
        self.g
    }
    #[inline(always)]
    fn blue(&self) -> T {
        self.b
    }
    #[inline(always)]
    fn alpha_value(&self) -> T {
        T::MAX
    }
    #[inline(always)]
    fn from_rgba(r: T, g: T, b: T, _a: T) -> Self {
        Rgb { r, g, b }
    }
    #[inline(always)]
    fn from_luma(v: T, _a: T) -> Self {
        Rgb { r: v, g: v, b: v }
    }
    #[inline(always)]
    fn replace_alpha(self, _a: T) -> Self {
        self
    }
    #[inline(always)]
    fn map_color(self, mut f: impl FnMut(T) -> T) -> Self {
        Rgb {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }
    #[inline(always)]
    fn zip_color(self, other: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Rgb {
            r: f(self.r, other.r),
            g: f(self.g, other.g),
            b: f(self.b, other.b),
        }
    }
}

impl<T: Channel> Pixel for Rgba<T> {
    type Channel = T;

    const CHANNELS: usize = 4;
    const HAS_ALPHA: bool = true;
    const IS_GREY: bool = false;

    #[inline(always)]
    fn red(&self) -> T {
        self.r
    }
    #[inline(always)]
    fn green(&self) -> T {
        self.g
    }
    #[inline(always)]
    fn blue(&self) -> T {
        self.b
    }
    #[inline(always)]
    fn alpha_value(&self) -> T {
        self.a
    }
    #[inline(always)]
    fn from_rgba(r: T, g: T, b: T, a: T) -> Self {
        Rgba { r, g, b, a }
    }
    #[inline(always)]
    fn from_luma(v: T, a: T) -> Self {
        Rgba { r: v, g: v, b: v, a }
    }
    #[inline(always)]
    fn replace_alpha(self, a: T) -> Self {
        Rgba { a, ..self }
    }
    #[inline(always)]
    fn map_color(self, mut f: impl FnMut(T) -> T) -> Self {
        Rgba {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }
    #[inline(always)]
    fn zip_color(self, other: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Rgba {
            r: f(self.r, other.r),
            g: f(self.g, other.g),
            b: f(self.b, other.b),
            a: self.a,
        }
    }
}

impl<T: Channel> Pixel for Gray<T> {
    type Channel = T;

    const CHANNELS: usize = 1;
    const HAS_ALPHA: bool = false;
    const IS_GREY: bool = true;

    #[inline(always)]
    fn red(&self) -> T {
        self.value()
    }
    #[inline(always)]
    fn green(&self) -> T {
        self.value()
    }
    #[inline(always)]
    fn blue(&self) -> T {
        self.value()
    }
    #[inline(always)]
    fn alpha_value(&self) -> T {
        T::MAX
    }
    #[inline(always)]
    fn luma(&self) -> T {
        self.value()
    }
    #[inline(always)]
    fn from_rgba(r: T, g: T, b: T, _a: T) -> Self {
        Gray::new(T::average3(r, g, b))
    }
    #[inline(always)]
    fn from_luma(v: T, _a: T) -> Self {
        Gray::new(v)
    }
    #[inline(always)]
    fn replace_alpha(self, _a: T) -> Self {
        self
    }
    #[inline(always)]
    fn map_color(self, mut f: impl FnMut(T) -> T) -> Self {
        Gray::new(f(self.value()))
    }
    #[inline(always)]
    fn zip_color(self, other: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Gray::new(f(self.value(), other.value()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_constants() {
        assert_eq!(<u8 as Channel>::MAX, 255);
        assert_eq!(<u16 as Channel>::MAX, 65535);
        assert_eq!(<u32 as Channel>::MAX, u32::MAX);
        assert_eq!(<f32 as Channel>::MAX, 1.0);
        assert_eq!(<f64 as Channel>::MAX, 1.0);
        assert!(<f32 as Channel>::IS_FLOAT);
        assert!(!<u16 as Channel>::IS_FLOAT);
    }

    #[test]
    fn layout_introspection() {
        assert_eq!(Rgb8::CHANNELS, 3);
        assert_eq!(Rgba16::CHANNELS, 4);
        assert_eq!(GreyF32::CHANNELS, 1);
        assert!(Rgba8::HAS_ALPHA);
        assert!(!Rgb8::HAS_ALPHA);
        assert!(!Grey8::HAS_ALPHA);
        assert!(Grey8::IS_GREY);
    }

    #[test]
    fn missing_alpha_reads_opaque() {
        assert_eq!(Rgb8::new(1, 2, 3).alpha_value(), 255);
        assert_eq!(Grey16::new(7).alpha_value(), 65535);
        assert_eq!(RgbF32::new(0.1, 0.2, 0.3).alpha_value(), 1.0);
    }

    #[test]
    fn grey_accessors_broadcast() {
        let g = Grey8::new(42);
        assert_eq!((g.red(), g.green(), g.blue()), (42, 42, 42));
        assert_eq!(g.luma(), 42);
    }

    #[test]
    fn constructors() {
        assert_eq!(<Rgba8 as Pixel>::from_rgb(1, 2, 3), Rgba8::new(1, 2, 3, 255));
        assert_eq!(<Rgb16 as Pixel>::from_rgba(1, 2, 3, 4), Rgb16::new(1, 2, 3));
        assert_eq!(<Grey8 as Pixel>::from_rgba(10, 20, 31, 0).value(), 20);
        assert_eq!(<Rgba8 as Pixel>::from_luma(9, 100), Rgba8::new(9, 9, 9, 100));
    }

    #[test]
    fn luma_is_unweighted_and_truncating() {
        assert_eq!(Rgb8::new(255, 0, 0).luma(), 85);
        assert_eq!(Rgb8::new(1, 1, 0).luma(), 0);
        assert_eq!(Rgb32::new(u32::MAX, u32::MAX, u32::MAX).luma(), u32::MAX);
    }

    #[test]
    fn map_and_zip_keep_alpha() {
        let p = Rgba8::new(10, 20, 30, 40).map_color(|c| c + 1);
        assert_eq!(p, Rgba8::new(11, 21, 31, 40));
        let q = Rgba8::new(1, 2, 3, 4).zip_color(Rgba8::new(10, 20, 30, 99), |a, b| a + b);
        assert_eq!(q, Rgba8::new(11, 22, 33, 4));
    }

    #[test]
    fn integer_arith_is_exact_at_the_edges() {
        assert_eq!(u8::over_alpha(255, 0), 255);
        assert_eq!(u8::over_alpha(0, 255), 255);
        assert_eq!(u8::over_alpha(0, 0), 0);
        assert_eq!(u32::over(1234, u32::MAX, 99, u32::MAX, u32::MAX), 1234);
        assert_eq!(u8::add_weighted(200, 100, 255), 255);
        assert_eq!(u8::multiply(255, 128), 128);
        assert_eq!(u8::divide(64, 128), 127);
        assert_eq!(u8::divide(5, 0), 0);
        assert_eq!(u16::invert(1), 65534);
    }
}
