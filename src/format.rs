use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;

use crate::error::Error;

/// Runtime tag naming one of the fifteen concrete pixel types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
    Grey8,
    Rgb16,
    Rgba16,
    Grey16,
    Rgb32,
    Rgba32,
    Grey32,
    RgbF32,
    RgbaF32,
    GreyF32,
    RgbF64,
    RgbaF64,
    GreyF64,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 15] = [
        PixelFormat::Rgb8,
        PixelFormat::Rgba8,
        PixelFormat::Grey8,
        PixelFormat::Rgb16,
        PixelFormat::Rgba16,
        PixelFormat::Grey16,
        PixelFormat::Rgb32,
        PixelFormat::Rgba32,
        PixelFormat::Grey32,
        PixelFormat::RgbF32,
        PixelFormat::RgbaF32,
        PixelFormat::GreyF32,
        PixelFormat::RgbF64,
        PixelFormat::RgbaF64,
        PixelFormat::GreyF64,
    ];

    /// Number of channels: 1, 3 or 4.
    pub const fn channels(self) -> usize {
        use PixelFormat::*;
        match self {
            Grey8 | Grey16 | Grey32 | GreyF32 | GreyF64 => 1,
            Rgb8 | Rgb16 | Rgb32 | RgbF32 | RgbF64 => 3,
            Rgba8 | Rgba16 | Rgba32 | RgbaF32 | RgbaF64 => 4,
        }
    }

    /// Size of one channel value in bytes.
    pub const fn bytes_per_channel(self) -> usize {
        use PixelFormat::*;
        match self {
            Rgb8 | Rgba8 | Grey8 => 1,
            Rgb16 | Rgba16 | Grey16 => 2,
            Rgb32 | Rgba32 | Grey32 | RgbF32 | RgbaF32 | GreyF32 => 4,
            RgbF64 | RgbaF64 | GreyF64 => 8,
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bytes_per_channel()
    }

    pub const fn has_alpha(self) -> bool {
        self.channels() == 4
    }

    pub const fn is_grey(self) -> bool {
        self.channels() == 1
    }

    pub const fn is_float(self) -> bool {
        use PixelFormat::*;
        matches!(
            self,
            RgbF32 | RgbaF32 | GreyF32 | RgbF64 | RgbaF64 | GreyF64
        )
    }

    /// The greyscale format with the same channel type.
    pub const fn grey(self) -> PixelFormat {
        use PixelFormat::*;
        match self {
            Rgb8 | Rgba8 | Grey8 => Grey8,
            Rgb16 | Rgba16 | Grey16 => Grey16,
            Rgb32 | Rgba32 | Grey32 => Grey32,
            RgbF32 | RgbaF32 | GreyF32 => GreyF32,
            RgbF64 | RgbaF64 | GreyF64 => GreyF64,
        }
    }

    /// The colour format with the same channel type and `n` channels
    /// (3 or 4); `None` for any other count.
    pub const fn with_channels(self, n: usize) -> Option<PixelFormat> {
        use PixelFormat::*;
        let (rgb, rgba) = match self.grey() {
            Grey8 => (Rgb8, Rgba8),
            Grey16 => (Rgb16, Rgba16),
            Grey32 => (Rgb32, Rgba32),
            GreyF32 => (RgbF32, RgbaF32),
            _ => (RgbF64, RgbaF64),
        };
        match n {
            1 => Some(self.grey()),
            3 => Some(rgb),
            4 => Some(rgba),
            _ => None,
        }
    }

    /// Lower-case token, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        use PixelFormat::*;
        match self {
            Rgb8 => "rgb8",
            Rgba8 => "rgba8",
            Grey8 => "grey8",
            Rgb16 => "rgb16",
            Rgba16 => "rgba16",
            Grey16 => "grey16",
            Rgb32 => "rgb32",
            Rgba32 => "rgba32",
            Grey32 => "grey32",
            RgbF32 => "rgbf32",
            RgbaF32 => "rgbaf32",
            GreyF32 => "greyf32",
            RgbF64 => "rgbf64",
            RgbaF64 => "rgbaf64",
            GreyF64 => "greyf64",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    /// Case-insensitive; `gray` is accepted for `grey`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let lower = s.trim().to_ascii_lowercase();
        let token = match lower.strip_prefix("gray") {
            Some(rest) => alloc::format!("grey{rest}"),
            None => lower,
        };
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.name() == token)
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))
    }
}
