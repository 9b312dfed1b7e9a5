//! # swatch
//!
//! Pixel-format-generic 2D surfaces.
//!
//! Fifteen pixel encodings ({u8, u16, u32, f32, f64} × {RGB, RGBA, grey})
//! share one set of operations: blit, scaled blit, alpha blend, additive
//! blend, fill, checkerboard, conversion, lossless transforms, per-pixel
//! filters and channel split/join. Every operation works between any two
//! encodings and clips against both buffers before touching memory.
//!
//! ## Two layers
//!
//! - **Typed**: [`region`], [`transform`], [`filter`] and [`channels`] are
//!   generic over [`pixel::Pixel`] and work on [`imgref`] buffers of the
//!   [`rgb`] pixel types. Conversions are resolved at compile time.
//! - **Erased**: [`Surface`], [`SurfaceRef`] and [`SurfaceMut`] pick the
//!   pixel type at runtime from a [`PixelFormat`] and take [`Color`] values.
//!
//! ```rust
//! use swatch::{Color, PixelFormat, Point, Rect, Size, Surface};
//!
//! let mut canvas = Surface::new(PixelFormat::RgbaF32, Size::new(8, 8), Color::WHITE);
//! let mut tile = Surface::new(PixelFormat::Rgba8, Size::new(4, 4), Color::TRANSPARENT);
//! tile.fill_rect(Rect::new(1, 1, 3, 3), "#00f8".parse()?);
//! canvas.blend(tile.view(), Rect::new(0, 0, 4, 4), Point::new(2, 2));
//! assert_eq!(canvas.get_pixel(0, 0), Some(Color::WHITE));
//! # Ok::<(), swatch::Error>(())
//! ```
//!
//! 8-bit RGB/RGBA/grey conversions and 8-bit RGBA fills use row kernels in
//! [`rows`] that pick AVX2 at runtime and fall back to scalar code.
//!
//! ## Feature flags
//!
//! - **`std`** (default): runtime CPU feature detection. Without it the
//!   crate is `no_std` + `alloc`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod channels;
pub mod color;
pub mod composite;
pub mod convert;
mod error;
pub mod filter;
pub mod format;
pub mod geom;
pub mod pixel;
pub mod region;
pub mod rows;
pub mod surface;
pub mod transform;

pub use color::Color;
pub use error::Error;
pub use format::PixelFormat;
pub use geom::{Point, Rect, Size};
pub use surface::{Surface, SurfaceMut, SurfacePixel, SurfaceRef};
pub use transform::Transform;
