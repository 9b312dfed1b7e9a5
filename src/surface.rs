//! Format-erased surfaces.
//!
//! [`Surface`] owns a buffer of one of the fifteen pixel types, chosen at
//! runtime by a [`PixelFormat`]. [`SurfaceRef`] and [`SurfaceMut`] are the
//! borrowed counterparts: views into a surface, sub-rectangles of one, or
//! wrapped external memory. Every operation dispatches once on the format
//! (twice for two-surface operations) and then runs the generic code in
//! [`region`], [`transform`](crate::transform), [`filter`] and [`channels`].
//!
//! External memory whose pitch is not a whole number of pixels becomes the
//! `Padded` variant of a view. Writes to it run row by row; reading from it
//! makes a contiguous copy first.
//!
//! ```rust
//! use swatch::{Color, PixelFormat, Point, Size, Surface};
//!
//! let mut canvas = Surface::new(PixelFormat::Rgba16, Size::new(4, 4), Color::BLACK);
//! let red = Surface::new(PixelFormat::Rgb8, Size::new(2, 2), "red".parse().unwrap());
//! canvas.blit(red.view(), Point::new(1, 1));
//! assert_eq!(canvas.get_pixel(1, 1), Some(Color::rgb(1.0, 0.0, 0.0)));
//! assert_eq!(canvas.get_pixel(0, 0), Some(Color::BLACK));
//! ```

use core::fmt;
use core::ops::Range;

use alloc::vec::Vec;
use bytemuck::Zeroable;
use imgref::{ImgRef, ImgRefMut, ImgVec};
use rgb::Gray;

use crate::channels;
use crate::color::Color;
use crate::convert::convert;
use crate::error::Error;
use crate::filter;
use crate::format::PixelFormat;
use crate::geom::{Point, Rect, Size, scale_axis};
use crate::pixel::{self, Pixel};
use crate::region;
use crate::transform::{self, Transform};

mod padded;
pub use padded::{PaddedRows, PaddedRowsMut};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Match a surface enum and run `$body` with `$img` bound to the concrete
/// buffer or view of whichever variant it is. Views need a second arm for
/// their `Padded` variant.
macro_rules! dispatch {
    ($kind:ident, $value:expr, $img:ident => $body:expr) => {
        match $value {
            $kind::Rgb8($img) => $body,
            $kind::Rgba8($img) => $body,
            $kind::Grey8($img) => $body,
            $kind::Rgb16($img) => $body,
            $kind::Rgba16($img) => $body,
            $kind::Grey16($img) => $body,
            $kind::Rgb32($img) => $body,
            $kind::Rgba32($img) => $body,
            $kind::Grey32($img) => $body,
            $kind::RgbF32($img) => $body,
            $kind::RgbaF32($img) => $body,
            $kind::GreyF32($img) => $body,
            $kind::RgbF64($img) => $body,
            $kind::RgbaF64($img) => $body,
            $kind::GreyF64($img) => $body,
        }
    };
    ($kind:ident, $value:expr, $img:ident => $body:expr, $rows:ident => $padded:expr) => {
        match $value {
            $kind::Rgb8($img) => $body,
            $kind::Rgba8($img) => $body,
            $kind::Grey8($img) => $body,
            $kind::Rgb16($img) => $body,
            $kind::Rgba16($img) => $body,
            $kind::Grey16($img) => $body,
            $kind::Rgb32($img) => $body,
            $kind::Rgba32($img) => $body,
            $kind::Grey32($img) => $body,
            $kind::RgbF32($img) => $body,
            $kind::RgbaF32($img) => $body,
            $kind::GreyF32($img) => $body,
            $kind::RgbF64($img) => $body,
            $kind::RgbaF64($img) => $body,
            $kind::GreyF64($img) => $body,
            $kind::Padded($rows) => $padded,
        }
    };
}

/// Run `$body` with `$P` naming the pixel type of `$format`.
macro_rules! with_format {
    ($format:expr, $P:ident => $body:expr) => {
        match $format {
            PixelFormat::Rgb8 => { type $P = pixel::Rgb8; $body }
            PixelFormat::Rgba8 => { type $P = pixel::Rgba8; $body }
            PixelFormat::Grey8 => { type $P = pixel::Grey8; $body }
            PixelFormat::Rgb16 => { type $P = pixel::Rgb16; $body }
            PixelFormat::Rgba16 => { type $P = pixel::Rgba16; $body }
            PixelFormat::Grey16 => { type $P = pixel::Grey16; $body }
            PixelFormat::Rgb32 => { type $P = pixel::Rgb32; $body }
            PixelFormat::Rgba32 => { type $P = pixel::Rgba32; $body }
            PixelFormat::Grey32 => { type $P = pixel::Grey32; $body }
            PixelFormat::RgbF32 => { type $P = pixel::RgbF32; $body }
            PixelFormat::RgbaF32 => { type $P = pixel::RgbaF32; $body }
            PixelFormat::GreyF32 => { type $P = pixel::GreyF32; $body }
            PixelFormat::RgbF64 => { type $P = pixel::RgbF64; $body }
            PixelFormat::RgbaF64 => { type $P = pixel::RgbaF64; $body }
            PixelFormat::GreyF64 => { type $P = pixel::GreyF64; $body }
        }
    };
}

macro_rules! surface_types {
    ($($name:ident),* $(,)?) => {
        /// An owned image in one of the fifteen pixel formats.
        #[derive(Clone)]
        pub enum Surface {
            $($name(ImgVec<pixel::$name>),)*
        }

        /// A borrowed read-only surface.
        #[derive(Clone, Copy)]
        pub enum SurfaceRef<'a> {
            $($name(ImgRef<'a, pixel::$name>),)*
            /// External rows whose pitch is not a whole number of pixels.
            Padded(PaddedRows<'a>),
        }

        /// A borrowed writable surface.
        pub enum SurfaceMut<'a> {
            $($name(ImgRefMut<'a, pixel::$name>),)*
            /// External rows whose pitch is not a whole number of pixels.
            Padded(PaddedRowsMut<'a>),
        }

        $(
            impl sealed::Sealed for pixel::$name {}

            impl SurfacePixel for pixel::$name {
                const FORMAT: PixelFormat = PixelFormat::$name;

                fn into_surface(img: ImgVec<Self>) -> Surface {
                    Surface::$name(img)
                }
                fn into_ref(img: ImgRef<'_, Self>) -> SurfaceRef<'_> {
                    SurfaceRef::$name(img)
                }
                fn into_mut(img: ImgRefMut<'_, Self>) -> SurfaceMut<'_> {
                    SurfaceMut::$name(img)
                }
                fn from_surface(s: Surface) -> Result<ImgVec<Self>, Surface> {
                    match s {
                        Surface::$name(img) => Ok(img),
                        other => Err(other),
                    }
                }
                fn from_ref(s: SurfaceRef<'_>) -> Option<ImgRef<'_, Self>> {
                    match s {
                        SurfaceRef::$name(img) => Some(img),
                        _ => None,
                    }
                }
                fn from_mut(s: SurfaceMut<'_>) -> Option<ImgRefMut<'_, Self>> {
                    match s {
                        SurfaceMut::$name(img) => Some(img),
                        _ => None,
                    }
                }
            }
        )*

        impl SurfaceRef<'_> {
            pub fn format(&self) -> PixelFormat {
                match self {
                    $(SurfaceRef::$name(_) => PixelFormat::$name,)*
                    SurfaceRef::Padded(rows) => rows.format(),
                }
            }
        }
    };
}

mod sealed {
    pub trait Sealed {}
}

/// A pixel type that has a [`Surface`] variant.
///
/// Implemented for exactly the fifteen types named by [`PixelFormat`].
/// Downcasts of a `Padded` view always return `None`.
pub trait SurfacePixel: Pixel + sealed::Sealed {
    const FORMAT: PixelFormat;

    fn into_surface(img: ImgVec<Self>) -> Surface;
    fn into_ref(img: ImgRef<'_, Self>) -> SurfaceRef<'_>;
    fn into_mut(img: ImgRefMut<'_, Self>) -> SurfaceMut<'_>;
    /// Downcast, handing the surface back on a format mismatch.
    fn from_surface(s: Surface) -> Result<ImgVec<Self>, Surface>;
    fn from_ref(s: SurfaceRef<'_>) -> Option<ImgRef<'_, Self>>;
    fn from_mut(s: SurfaceMut<'_>) -> Option<ImgRefMut<'_, Self>>;
}

surface_types! {
    Rgb8, Rgba8, Grey8,
    Rgb16, Rgba16, Grey16,
    Rgb32, Rgba32, Grey32,
    RgbF32, RgbaF32, GreyF32,
    RgbF64, RgbaF64, GreyF64,
}

// ---------------------------------------------------------------------------
// Generic helpers
// ---------------------------------------------------------------------------

fn reborrow<'b, P>(img: &'b mut ImgRefMut<'_, P>) -> ImgRefMut<'b, P> {
    let (w, h, stride) = (img.width(), img.height(), img.stride());
    ImgRefMut::new_stride(img.buf_mut(), w, h, stride)
}

fn freeze<'b, P>(img: &'b ImgRefMut<'_, P>) -> ImgRef<'b, P> {
    let (w, h, stride) = (img.width(), img.height(), img.stride());
    ImgRef::new_stride(img.buf(), w, h, stride)
}

/// Buffer indices of the visible part of row `y`.
fn row_range(y: usize, width: usize, height: usize, stride: usize) -> Option<Range<usize>> {
    (y < height).then(|| y * stride..y * stride + width)
}

fn sub_of<P>(img: ImgRef<'_, P>, x: usize, y: usize, w: usize, h: usize) -> ImgRef<'_, P> {
    let stride = img.stride();
    let start = y * stride + x;
    ImgRef::new_stride(&img.into_buf()[start..], w, h, stride)
}

/// `rect ∩ bounds` in `usize`, or `None` if that is empty.
fn clip_view(rect: Rect, width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
    let r = rect.intersect(&Size::new(width as u32, height as u32).bounds());
    if r.is_empty() {
        return None;
    }
    Some((
        r.left as usize,
        r.top as usize,
        r.width() as usize,
        r.height() as usize,
    ))
}

fn converted<S: Pixel, D: SurfacePixel>(img: ImgRef<'_, S>) -> Surface {
    let mut out = region::filled(img.width(), img.height(), <D as Zeroable>::zeroed());
    region::blit(img, out.as_mut(), Point::ORIGIN);
    D::into_surface(out)
}

fn owned<P: SurfacePixel>(img: ImgRef<'_, P>) -> Surface {
    converted::<P, P>(img)
}

fn same_pixels<P: SurfacePixel>(a: ImgRef<'_, P>, other: SurfaceRef<'_>) -> bool {
    if let SurfaceRef::Padded(rows) = other {
        return same_pixels(a, rows.to_surface().view());
    }
    P::from_ref(other).is_some_and(|b| {
        a.width() == b.width()
            && a.height() == b.height()
            && a.rows().zip(b.rows()).all(|(x, y)| x == y)
    })
}

fn wrap_bytes<P: SurfacePixel>(
    bytes: &mut [u8],
    width: usize,
    height: usize,
    pitch: usize,
) -> Result<SurfaceMut<'_>, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument("external surfaces must not be empty"));
    }
    let bpp = size_of::<P>();
    let row = width.checked_mul(bpp).ok_or(Error::BufferTooSmall)?;
    if pitch < row {
        return Err(Error::InvalidArgument("pitch is shorter than one row"));
    }
    if pitch % align_of::<P>() != 0 {
        return Err(Error::Misaligned);
    }
    let needed = pitch
        .checked_mul(height - 1)
        .and_then(|n| n.checked_add(row))
        .ok_or(Error::BufferTooSmall)?;
    if bytes.len() < needed {
        return Err(Error::BufferTooSmall);
    }
    let bytes = &mut bytes[..needed];
    if pitch % bpp != 0 {
        // Only the first row start needs checking; the rest are pitch apart.
        bytemuck::try_cast_slice::<u8, P>(&bytes[..row]).map_err(|_| Error::Misaligned)?;
        return Ok(SurfaceMut::Padded(PaddedRowsMut::new(
            P::FORMAT,
            bytes,
            width,
            height,
            pitch,
        )));
    }
    let pixels: &mut [P] = bytemuck::try_cast_slice_mut(bytes).map_err(|_| Error::Misaligned)?;
    Ok(P::into_mut(ImgRefMut::new_stride(pixels, width, height, pitch / bpp)))
}

fn join_planes<P>(planes: &[SurfaceRef<'_>]) -> Result<Surface, Error>
where
    P: SurfacePixel,
    Gray<P::Channel>: SurfacePixel,
{
    let views = planes
        .iter()
        .map(|p| <Gray<P::Channel> as SurfacePixel>::from_ref(*p))
        .collect::<Option<Vec<_>>>()
        .ok_or(Error::FormatMismatch)?;
    channels::join::<P>(&views).map(P::into_surface)
}

fn debug_surface(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    s: SurfaceRef<'_>,
) -> fmt::Result {
    f.debug_struct(name)
        .field("format", &s.format())
        .field("width", &s.width())
        .field("height", &s.height())
        .field("pitch", &s.pitch())
        .finish()
}

/// The two-surface operations that place `src_rect` at a point.
#[derive(Clone, Copy)]
enum Placement {
    Copy,
    Blend,
    Add,
}

fn place<S: Pixel, D: Pixel>(
    how: Placement,
    src: ImgRef<'_, S>,
    src_rect: Rect,
    dst: ImgRefMut<'_, D>,
    pos: Point,
) {
    match how {
        Placement::Copy => region::blit_rect(src, src_rect, dst, pos),
        Placement::Blend => region::blend(src, src_rect, dst, pos),
        Placement::Add => region::blend_add(src, src_rect, dst, pos),
    }
}

// ---------------------------------------------------------------------------
// Padded rows
// ---------------------------------------------------------------------------

impl PaddedRows<'_> {
    fn to_surface(self) -> Surface {
        with_format!(self.format(), P => Surface::from_img(self.compact::<P>()))
    }
}

/// Each row of a padded surface is handed out as a one-row surface, with
/// the operation's rectangles remapped so the result matches a single pass
/// over the whole surface.
impl PaddedRowsMut<'_> {
    fn row_surface(&mut self, y: usize) -> SurfaceMut<'_> {
        with_format!(self.format(), P => SurfaceMut::from_img(self.row_img::<P>(y)))
    }

    fn each_row(&mut self, mut op: impl FnMut(&mut SurfaceMut<'_>)) {
        for y in 0..self.height() {
            op(&mut self.row_surface(y));
        }
    }

    /// Rows `y` with `rect.top <= y < rect.bottom`, with the row-local
    /// rectangle and `y - rect.top`.
    fn each_row_in(&mut self, rect: Rect, mut op: impl FnMut(&mut SurfaceMut<'_>, Rect, i64)) {
        let local = Rect::new(rect.left, 0, rect.right, 1);
        for y in 0..self.height() {
            let k = y as i64 - rect.top as i64;
            if k >= 0 && (y as i64) < rect.bottom as i64 {
                op(&mut self.row_surface(y), local, k);
            }
        }
    }

    /// Rows reached by `src_rect` placed at `pos`, with the one-row source
    /// rectangle that lands on each and the row-local position.
    fn each_placed_row(
        &mut self,
        src_rect: Rect,
        pos: Point,
        mut op: impl FnMut(&mut SurfaceMut<'_>, Rect, Point),
    ) {
        let local = Point::new(pos.x, 0);
        for y in 0..self.height() {
            let sy = src_rect.top as i64 + (y as i64 - pos.y as i64);
            if sy < src_rect.top as i64 || sy >= src_rect.bottom as i64 {
                continue;
            }
            let sy = sy as i32;
            let r = Rect::new(src_rect.left, sy, src_rect.right, sy + 1);
            op(&mut self.row_surface(y), r, local);
        }
    }

    /// Rows reached by a scaled blit, with the one-row source and
    /// destination rectangles that reproduce it.
    fn each_scaled_row(
        &mut self,
        src_rect: Rect,
        src_height: usize,
        dst_rect: Rect,
        mut op: impl FnMut(&mut SurfaceMut<'_>, Rect, Rect),
    ) {
        let rows = scale_axis(
            src_rect.top,
            src_rect.height(),
            src_height,
            dst_rect.top,
            dst_rect.height(),
            self.height(),
        );
        let local = Rect::new(dst_rect.left, 0, dst_rect.right, 1);
        for (dy, sy) in rows {
            let Some(top) = i32::try_from(sy).ok().filter(|&t| t < i32::MAX) else {
                continue;
            };
            let r = Rect::new(src_rect.left, top, src_rect.right, top + 1);
            op(&mut self.row_surface(dy), r, local);
        }
    }
}

// ---------------------------------------------------------------------------
// SurfaceRef
// ---------------------------------------------------------------------------

impl<'a> SurfaceRef<'a> {
    pub fn from_img<P: SurfacePixel>(img: ImgRef<'a, P>) -> Self {
        P::into_ref(img)
    }

    pub fn as_img<P: SurfacePixel>(self) -> Option<ImgRef<'a, P>> {
        P::from_ref(self)
    }

    pub fn width(&self) -> usize {
        dispatch!(SurfaceRef, self, img => img.width(), rows => rows.width())
    }

    pub fn height(&self) -> usize {
        dispatch!(SurfaceRef, self, img => img.height(), rows => rows.height())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }

    /// Distance between row starts in bytes.
    pub fn pitch(&self) -> usize {
        let bpp = self.format().bytes_per_pixel();
        dispatch!(SurfaceRef, self, img => img.stride() * bpp, rows => rows.pitch())
    }

    /// The visible bytes of row `y` (without stride padding).
    pub fn row_bytes(self, y: usize) -> Option<&'a [u8]> {
        dispatch!(SurfaceRef, self, img => {
            let r = row_range(y, img.width(), img.height(), img.stride())?;
            img.into_buf().get(r).map(bytemuck::cast_slice)
        }, rows => rows.row_bytes(y))
    }

    /// The pixel at `(x, y)` as a [`Color`]; `None` outside the surface.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        dispatch!(SurfaceRef, self, img => {
            if x < img.width() && y < img.height() {
                Some(convert(img.buf()[y * img.stride() + x]))
            } else {
                None
            }
        }, rows => with_format!(rows.format(), P => {
            rows.row::<P>(y).get(x).map(|p| convert(*p))
        }))
    }

    /// A view of `rect ∩ bounds`; `None` if that is empty.
    pub fn sub_view(self, rect: Rect) -> Option<SurfaceRef<'a>> {
        let (x, y, w, h) = clip_view(rect, self.width(), self.height())?;
        Some(dispatch!(SurfaceRef, self,
            img => SurfaceRef::from_img(sub_of(img, x, y, w, h)),
            rows => SurfaceRef::Padded(rows.sub(x, y, w, h))))
    }

    /// A new surface in `format` holding the converted pixels.
    pub fn convert(self, format: PixelFormat) -> Surface {
        log::debug!(
            "converting {}x{} surface from {} to {format}",
            self.width(),
            self.height(),
            self.format()
        );
        dispatch!(SurfaceRef, self,
            img => with_format!(format, D => converted::<_, D>(img)),
            rows => rows.to_surface().convert(format))
    }

    /// An owned, contiguous copy.
    pub fn to_surface(self) -> Surface {
        dispatch!(SurfaceRef, self, img => owned(img), rows => rows.to_surface())
    }

    pub fn transform(self, t: Transform) -> Surface {
        dispatch!(SurfaceRef, self,
            img => Surface::from_img(transform::apply(img, t)),
            rows => rows.to_surface().transform(t))
    }

    /// One greyscale surface per channel, in `r, g, b[, a]` order.
    pub fn split_channels(self) -> Vec<Surface> {
        dispatch!(SurfaceRef, self, img => {
            channels::split(img).into_iter().map(Surface::from_img).collect()
        }, rows => rows.to_surface().split_channels())
    }

    /// A contiguous copy if this view is `Padded`.
    fn compacted(self) -> Option<Surface> {
        match self {
            SurfaceRef::Padded(rows) => Some(rows.to_surface()),
            _ => None,
        }
    }
}

impl PartialEq for SurfaceRef<'_> {
    /// Equal when the formats and sizes match and every visible pixel
    /// compares equal. Stride padding is never looked at.
    fn eq(&self, other: &Self) -> bool {
        dispatch!(SurfaceRef, *self,
            a => same_pixels(a, *other),
            rows => rows.to_surface().view() == *other)
    }
}

impl fmt::Debug for SurfaceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_surface(f, "SurfaceRef", *self)
    }
}

// ---------------------------------------------------------------------------
// SurfaceMut
// ---------------------------------------------------------------------------

impl<'a> SurfaceMut<'a> {
    pub fn from_img<P: SurfacePixel>(img: ImgRefMut<'a, P>) -> Self {
        P::into_mut(img)
    }

    /// Wrap external memory laid out as `height` rows of `width` pixels,
    /// `pitch` bytes apart.
    ///
    /// A pitch that is a whole number of pixels gives a plain `imgref` view;
    /// any other pitch (RGB8 rows padded to four bytes, say) gives the
    /// `Padded` variant.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for a zero dimension or a pitch shorter
    ///   than one row;
    /// - [`Error::Misaligned`] if the pitch is not a multiple of the channel
    ///   alignment or `bytes` is not aligned for the channel type;
    /// - [`Error::BufferTooSmall`] if `bytes` is shorter than
    ///   `pitch · (height − 1) + width · bytes_per_pixel`.
    pub fn from_bytes(
        format: PixelFormat,
        bytes: &'a mut [u8],
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Result<Self, Error> {
        with_format!(format, P => wrap_bytes::<P>(bytes, width, height, pitch))
    }

    pub fn as_img_mut<P: SurfacePixel>(&mut self) -> Option<ImgRefMut<'_, P>> {
        P::from_mut(self.view_mut())
    }

    pub fn into_img_mut<P: SurfacePixel>(self) -> Option<ImgRefMut<'a, P>> {
        P::from_mut(self)
    }

    pub fn view(&self) -> SurfaceRef<'_> {
        dispatch!(SurfaceMut, self,
            img => SurfaceRef::from_img(freeze(img)),
            rows => SurfaceRef::Padded(rows.as_rows()))
    }

    pub fn view_mut(&mut self) -> SurfaceMut<'_> {
        dispatch!(SurfaceMut, self,
            img => SurfaceMut::from_img(reborrow(img)),
            rows => SurfaceMut::Padded(rows.reborrow()))
    }

    pub fn format(&self) -> PixelFormat {
        self.view().format()
    }

    pub fn width(&self) -> usize {
        self.view().width()
    }

    pub fn height(&self) -> usize {
        self.view().height()
    }

    pub fn size(&self) -> Size {
        self.view().size()
    }

    pub fn pitch(&self) -> usize {
        self.view().pitch()
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.view().get_pixel(x, y)
    }

    pub fn row_bytes_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        dispatch!(SurfaceMut, self, img => {
            let r = row_range(y, img.width(), img.height(), img.stride())?;
            img.buf_mut().get_mut(r).map(bytemuck::cast_slice_mut)
        }, rows => rows.row_bytes_mut(y))
    }

    /// Set the pixel at `(x, y)`; ignored outside the surface.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        let r = Rect::new(x, y, x.saturating_add(1), y.saturating_add(1));
        self.fill_rect(r, color);
    }

    /// A writable view of `rect ∩ bounds`; `None` if that is empty.
    pub fn sub_view_mut(&mut self, rect: Rect) -> Option<SurfaceMut<'_>> {
        let (x, y, w, h) = clip_view(rect, self.width(), self.height())?;
        Some(dispatch!(SurfaceMut, self,
            img => SurfaceMut::from_img(img.sub_image_mut(x, y, w, h)),
            rows => SurfaceMut::Padded(rows.sub_mut(x, y, w, h))))
    }

    pub fn blit(&mut self, src: SurfaceRef<'_>, pos: Point) {
        self.blit_rect(src, src.size().bounds(), pos);
    }

    /// Copy `src_rect` of `src` to `pos`, converting between formats.
    pub fn blit_rect(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.placed(Placement::Copy, src, src_rect, pos);
    }

    /// Nearest-neighbour scaled copy of `src_rect` onto `dst_rect`.
    pub fn blit_scaled(&mut self, src: SurfaceRef<'_>, src_rect: Rect, dst_rect: Rect) {
        dispatch!(SurfaceMut, self,
            dst => dispatch!(SurfaceRef, src,
                s => region::blit_scaled(s, src_rect, reborrow(dst), dst_rect),
                rows => SurfaceMut::from_img(reborrow(dst))
                    .blit_scaled(rows.to_surface().view(), src_rect, dst_rect)),
            rows => {
                let compact = src.compacted();
                let src = compact.as_ref().map_or(src, Surface::view);
                rows.each_scaled_row(src_rect, src.height(), dst_rect, |row, s, d| {
                    row.blit_scaled(src, s, d)
                })
            })
    }

    /// Alpha-blend `src_rect` of `src` over this surface at `pos`.
    pub fn blend(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.placed(Placement::Blend, src, src_rect, pos);
    }

    /// Add `src_rect` of `src`, weighted by its alpha, at `pos`.
    pub fn blend_add(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.placed(Placement::Add, src, src_rect, pos);
    }

    fn placed(&mut self, how: Placement, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        dispatch!(SurfaceMut, self,
            dst => dispatch!(SurfaceRef, src,
                s => place(how, s, src_rect, reborrow(dst), pos),
                rows => SurfaceMut::from_img(reborrow(dst))
                    .placed(how, rows.to_surface().view(), src_rect, pos)),
            rows => {
                let compact = src.compacted();
                let src = compact.as_ref().map_or(src, Surface::view);
                rows.each_placed_row(src_rect, pos, |row, r, p| row.placed(how, src, r, p))
            })
    }

    pub fn fill(&mut self, color: Color) {
        dispatch!(SurfaceMut, self,
            img => region::fill(reborrow(img), convert(color)),
            rows => rows.each_row(|row| row.fill(color)))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        dispatch!(SurfaceMut, self,
            img => region::fill_rect(reborrow(img), rect, convert(color)),
            rows => rows.each_row_in(rect, |row, r, _| row.fill_rect(r, color)))
    }

    /// See [`region::fill_checkerboard`].
    pub fn fill_checkerboard(
        &mut self,
        rect: Rect,
        cell: Size,
        a: Color,
        b: Color,
    ) -> Result<(), Error> {
        dispatch!(SurfaceMut, self, img => {
            region::fill_checkerboard(reborrow(img), rect, cell, convert(a), convert(b))
        }, rows => {
            if cell.is_empty() {
                return Err(Error::InvalidArgument("checkerboard cell size must be non-zero"));
            }
            let strip = Size::new(cell.width, 1);
            let mut result = Ok(());
            rows.each_row_in(rect, |row, r, k| {
                // odd cell rows start with `b`
                let (first, second) = if (k / cell.height as i64) % 2 == 0 { (a, b) } else { (b, a) };
                result = result.clone().and(row.fill_checkerboard(r, strip, first, second));
            });
            result
        })
    }

    pub fn invert(&mut self) {
        dispatch!(SurfaceMut, self,
            img => filter::invert(reborrow(img)),
            rows => rows.each_row(|row| row.invert()))
    }

    pub fn desaturate(&mut self) {
        dispatch!(SurfaceMut, self,
            img => filter::desaturate(reborrow(img)),
            rows => rows.each_row(|row| row.desaturate()))
    }

    pub fn tint(&mut self, color: Color) {
        dispatch!(SurfaceMut, self,
            img => filter::tint(reborrow(img), color),
            rows => rows.each_row(|row| row.tint(color)))
    }

    pub fn premultiply(&mut self) {
        dispatch!(SurfaceMut, self,
            img => filter::premultiply(reborrow(img)),
            rows => rows.each_row(|row| row.premultiply()))
    }

    pub fn unpremultiply(&mut self) {
        dispatch!(SurfaceMut, self,
            img => filter::unpremultiply(reborrow(img)),
            rows => rows.each_row(|row| row.unpremultiply()))
    }
}

impl PartialEq for SurfaceMut<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl fmt::Debug for SurfaceMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_surface(f, "SurfaceMut", self.view())
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

impl Surface {
    /// A `size` surface in `format` with every pixel set to `fill`.
    pub fn new(format: PixelFormat, size: Size, fill: Color) -> Self {
        let (w, h) = (size.width as usize, size.height as usize);
        with_format!(format, P => Surface::from_img(region::filled::<P>(w, h, convert(fill))))
    }

    pub fn from_img<P: SurfacePixel>(img: ImgVec<P>) -> Self {
        P::into_surface(img)
    }

    /// The buffer, if this surface holds pixels of type `P`.
    pub fn as_img<P: SurfacePixel>(&self) -> Option<ImgRef<'_, P>> {
        self.view().as_img()
    }

    pub fn as_img_mut<P: SurfacePixel>(&mut self) -> Option<ImgRefMut<'_, P>> {
        P::from_mut(self.view_mut())
    }

    /// Take the buffer out, or get the surface back if `P` is the wrong type.
    pub fn into_img<P: SurfacePixel>(self) -> Result<ImgVec<P>, Self> {
        P::from_surface(self)
    }

    pub fn view(&self) -> SurfaceRef<'_> {
        dispatch!(Surface, self, img => SurfaceRef::from_img(img.as_ref()))
    }

    pub fn view_mut(&mut self) -> SurfaceMut<'_> {
        dispatch!(Surface, self, img => SurfaceMut::from_img(img.as_mut()))
    }

    /// Join greyscale planes of one format into a surface with as many
    /// channels as there are planes (1, 3 or 4).
    ///
    /// # Errors
    ///
    /// [`Error::FormatMismatch`] unless every plane is greyscale of the
    /// same format, [`Error::InvalidArgument`] for an unsupported plane
    /// count, [`Error::SizeMismatch`] if the planes differ in size.
    pub fn join_channels(planes: &[SurfaceRef<'_>]) -> Result<Self, Error> {
        let first = planes
            .first()
            .ok_or(Error::InvalidArgument("no planes to join"))?;
        let grey = first.format();
        if !grey.is_grey() || planes.iter().any(|p| p.format() != grey) {
            return Err(Error::FormatMismatch);
        }
        let format = grey
            .with_channels(planes.len())
            .ok_or(Error::InvalidArgument("plane count must be 1, 3 or 4"))?;
        with_format!(format, P => join_planes::<P>(planes))
    }

    pub fn format(&self) -> PixelFormat {
        self.view().format()
    }

    pub fn width(&self) -> usize {
        self.view().width()
    }

    pub fn height(&self) -> usize {
        self.view().height()
    }

    pub fn size(&self) -> Size {
        self.view().size()
    }

    pub fn pitch(&self) -> usize {
        self.view().pitch()
    }

    pub fn row_bytes(&self, y: usize) -> Option<&[u8]> {
        self.view().row_bytes(y)
    }

    pub fn row_bytes_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        dispatch!(Surface, self, img => {
            let r = row_range(y, img.width(), img.height(), img.stride())?;
            img.buf_mut().get_mut(r).map(bytemuck::cast_slice_mut)
        })
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.view().get_pixel(x, y)
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.view_mut().put_pixel(x, y, color);
    }

    pub fn sub_view(&self, rect: Rect) -> Option<SurfaceRef<'_>> {
        self.view().sub_view(rect)
    }

    pub fn sub_view_mut(&mut self, rect: Rect) -> Option<SurfaceMut<'_>> {
        let (x, y, w, h) = clip_view(rect, self.width(), self.height())?;
        Some(dispatch!(Surface, self, img => SurfaceMut::from_img(img.sub_image_mut(x, y, w, h))))
    }

    pub fn blit(&mut self, src: SurfaceRef<'_>, pos: Point) {
        self.view_mut().blit(src, pos);
    }

    pub fn blit_rect(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.view_mut().blit_rect(src, src_rect, pos);
    }

    pub fn blit_scaled(&mut self, src: SurfaceRef<'_>, src_rect: Rect, dst_rect: Rect) {
        self.view_mut().blit_scaled(src, src_rect, dst_rect);
    }

    pub fn blend(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.view_mut().blend(src, src_rect, pos);
    }

    pub fn blend_add(&mut self, src: SurfaceRef<'_>, src_rect: Rect, pos: Point) {
        self.view_mut().blend_add(src, src_rect, pos);
    }

    pub fn fill(&mut self, color: Color) {
        self.view_mut().fill(color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.view_mut().fill_rect(rect, color);
    }

    pub fn fill_checkerboard(
        &mut self,
        rect: Rect,
        cell: Size,
        a: Color,
        b: Color,
    ) -> Result<(), Error> {
        self.view_mut().fill_checkerboard(rect, cell, a, b)
    }

    pub fn convert(&self, format: PixelFormat) -> Surface {
        self.view().convert(format)
    }

    pub fn transform(&self, t: Transform) -> Surface {
        self.view().transform(t)
    }

    pub fn invert(&mut self) {
        self.view_mut().invert();
    }

    pub fn desaturate(&mut self) {
        self.view_mut().desaturate();
    }

    pub fn tint(&mut self, color: Color) {
        self.view_mut().tint(color);
    }

    pub fn premultiply(&mut self) {
        self.view_mut().premultiply();
    }

    pub fn unpremultiply(&mut self) {
        self.view_mut().unpremultiply();
    }

    pub fn split_channels(&self) -> Vec<Surface> {
        self.view().split_channels()
    }
}

impl<P: SurfacePixel> From<ImgVec<P>> for Surface {
    fn from(img: ImgVec<P>) -> Self {
        Surface::from_img(img)
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_surface(f, "Surface", self.view())
    }
}

#[cfg(test)]
mod tests;
