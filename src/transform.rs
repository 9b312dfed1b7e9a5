//! Lossless geometric transforms: flips, quarter turns and the two diagonal
//! mirrors.

use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;
use imgref::{ImgRef, ImgVec};

use crate::error::Error;
use crate::geom::Size;
use crate::pixel::Pixel;
use crate::region;

/// One of the eight axis-aligned orientations of a raster.
///
/// Discriminants match the EXIF Orientation tag (TIFF tag 274), read as
/// "the transform that brings stored pixels upright".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Transform {
    #[default]
    Identity = 1,
    /// Mirror left-right.
    FlipH = 2,
    Rotate180 = 3,
    /// Mirror top-bottom.
    FlipV = 4,
    /// Mirror across the main diagonal: `(x, y) → (y, x)`.
    Transpose = 5,
    /// Quarter turn clockwise.
    Rotate90 = 6,
    /// Mirror across the anti-diagonal.
    Transverse = 7,
    /// Quarter turn counter-clockwise.
    Rotate270 = 8,
}

impl Transform {
    /// From an EXIF orientation value; anything outside `1..=8` is
    /// [`Identity`](Transform::Identity).
    pub fn from_exif(value: u16) -> Self {
        match value {
            2 => Self::FlipH,
            3 => Self::Rotate180,
            4 => Self::FlipV,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Identity,
        }
    }

    pub fn exif_value(self) -> u16 {
        self as u16
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    pub fn output_size(self, size: Size) -> Size {
        if self.swaps_dimensions() {
            Size::new(size.height, size.width)
        } else {
            size
        }
    }

    /// The transform that undoes `self`.
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::Identity
    }

    /// Where input pixel `(x, y)` of a `w × h` image lands.
    #[inline]
    fn map(self, x: usize, y: usize, w: usize, h: usize) -> (usize, usize) {
        match self {
            Self::Identity => (x, y),
            Self::FlipH => (w - 1 - x, y),
            Self::FlipV => (x, h - 1 - y),
            Self::Rotate180 => (w - 1 - x, h - 1 - y),
            Self::Transpose => (y, x),
            Self::Rotate90 => (h - 1 - y, x),
            Self::Transverse => (h - 1 - y, w - 1 - x),
            Self::Rotate270 => (y, w - 1 - x),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Identity => "none",
            Self::FlipH => "flip-h",
            Self::FlipV => "flip-v",
            Self::Rotate90 => "rotate-90",
            Self::Rotate180 => "rotate-180",
            Self::Rotate270 => "rotate-270",
            Self::Transpose => "transpose",
            Self::Transverse => "transverse",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "none" | "identity" | "" => Self::Identity,
            "flip-h" | "fliph" => Self::FlipH,
            "flip-v" | "flipv" => Self::FlipV,
            "rotate-90" | "rot90" | "90" => Self::Rotate90,
            "rotate-180" | "rot180" | "180" => Self::Rotate180,
            "rotate-270" | "rot270" | "270" => Self::Rotate270,
            "transpose" => Self::Transpose,
            "transverse" => Self::Transverse,
            _ => return Err(Error::InvalidTransform(s.to_string())),
        })
    }
}

/// Apply `t` to `img`, producing a new contiguous buffer.
pub fn apply<P: Pixel>(img: ImgRef<'_, P>, t: Transform) -> ImgVec<P> {
    let (w, h) = (img.width(), img.height());
    let (ow, oh) = if t.swaps_dimensions() { (h, w) } else { (w, h) };
    let mut out = region::filled(ow, oh, <P as bytemuck::Zeroable>::zeroed());
    if w == 0 || h == 0 {
        return out;
    }
    let ostride = out.stride();
    let obuf = out.buf_mut();
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            let (ox, oy) = t.map(x, y, w, h);
            obuf[oy * ostride + ox] = *px;
        }
    }
    out
}
