//! Rows of external memory whose pitch is not a whole number of pixels.
//!
//! `imgref` measures strides in pixels, so a 5-pixel RGB8 row padded to 16
//! bytes has no `ImgRef` form. These views keep the byte pitch and hand out
//! one row at a time as a typed slice.

use core::ops::Range;

use alloc::vec::Vec;
use imgref::{ImgRefMut, ImgVec};

use crate::format::PixelFormat;
use crate::pixel::Pixel;

/// Read-only rows of `format` pixels, `pitch` bytes apart.
///
/// Every row start is aligned for the channel type.
#[derive(Clone, Copy)]
pub struct PaddedRows<'a> {
    format: PixelFormat,
    bytes: &'a [u8],
    width: usize,
    height: usize,
    pitch: usize,
}

/// Writable rows of `format` pixels, `pitch` bytes apart.
pub struct PaddedRowsMut<'a> {
    format: PixelFormat,
    bytes: &'a mut [u8],
    width: usize,
    height: usize,
    pitch: usize,
}

fn row_span(y: usize, width: usize, height: usize, pitch: usize, bpp: usize) -> Option<Range<usize>> {
    (y < height).then(|| y * pitch..y * pitch + width * bpp)
}

/// Byte range of the `w`×`h` block at `(x, y)`, ending at its last visible byte.
fn sub_span(x: usize, y: usize, w: usize, h: usize, pitch: usize, bpp: usize) -> Range<usize> {
    let start = y * pitch + x * bpp;
    start..start + (h - 1) * pitch + w * bpp
}

impl<'a> PaddedRows<'a> {
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between row starts in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// The visible bytes of row `y`.
    pub fn row_bytes(self, y: usize) -> Option<&'a [u8]> {
        let bpp = self.format.bytes_per_pixel();
        self.bytes
            .get(row_span(y, self.width, self.height, self.pitch, bpp)?)
    }

    /// Row `y` as pixels; empty outside the surface.
    pub(super) fn row<P: Pixel>(self, y: usize) -> &'a [P] {
        self.row_bytes(y).map(bytemuck::cast_slice).unwrap_or_default()
    }

    /// The non-empty block `(x, y, w, h)`, already clipped to the surface.
    pub(super) fn sub(self, x: usize, y: usize, w: usize, h: usize) -> Self {
        let span = sub_span(x, y, w, h, self.pitch, self.format.bytes_per_pixel());
        Self {
            bytes: &self.bytes[span],
            width: w,
            height: h,
            ..self
        }
    }

    /// A contiguous copy of the visible pixels.
    pub(super) fn compact<P: Pixel>(self) -> ImgVec<P> {
        let mut buf = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            buf.extend_from_slice(self.row::<P>(y));
        }
        ImgVec::new(buf, self.width, self.height)
    }
}

impl<'a> PaddedRowsMut<'a> {
    /// Callers have checked that `bytes` holds every row and that row
    /// starts are aligned for `format`.
    pub(super) fn new(
        format: PixelFormat,
        bytes: &'a mut [u8],
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Self {
        Self {
            format,
            bytes,
            width,
            height,
            pitch,
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn as_rows(&self) -> PaddedRows<'_> {
        PaddedRows {
            format: self.format,
            bytes: &*self.bytes,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
        }
    }

    pub fn reborrow(&mut self) -> PaddedRowsMut<'_> {
        PaddedRowsMut {
            format: self.format,
            bytes: &mut *self.bytes,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
        }
    }

    pub fn row_bytes_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        let bpp = self.format.bytes_per_pixel();
        self.bytes
            .get_mut(row_span(y, self.width, self.height, self.pitch, bpp)?)
    }

    /// Row `y` as a one-row image; zero-width outside the surface.
    pub(super) fn row_img<P: Pixel>(&mut self, y: usize) -> ImgRefMut<'_, P> {
        let row: &mut [P] = self
            .row_bytes_mut(y)
            .map(bytemuck::cast_slice_mut)
            .unwrap_or_default();
        let width = row.len();
        ImgRefMut::new_stride(row, width, 1, width.max(1))
    }

    pub(super) fn sub_mut(&mut self, x: usize, y: usize, w: usize, h: usize) -> PaddedRowsMut<'_> {
        let span = sub_span(x, y, w, h, self.pitch, self.format.bytes_per_pixel());
        PaddedRowsMut {
            format: self.format,
            bytes: &mut self.bytes[span],
            width: w,
            height: h,
            pitch: self.pitch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgb8;
    use alloc::vec;

    #[test]
    fn rows_skip_padding() {
        let mut bytes: Vec<u8> = (0..32).collect();
        let mut rows = PaddedRowsMut::new(PixelFormat::Rgb8, &mut bytes, 5, 2, 16);
        assert_eq!(rows.as_rows().row_bytes(1), Some(&(16..31).collect::<Vec<u8>>()[..]));
        assert_eq!(rows.as_rows().row_bytes(2), None);
        assert_eq!(rows.as_rows().row::<Rgb8>(1)[4], Rgb8::new(28, 29, 30));

        let img = rows.as_rows().compact::<Rgb8>();
        assert_eq!(img.buf().len(), 10);
        assert_eq!(img.buf()[5], Rgb8::new(16, 17, 18));

        rows.row_img::<Rgb8>(0).buf_mut()[0] = Rgb8::new(9, 9, 9);
        assert_eq!(rows.row_img::<Rgb8>(7).width(), 0);
        assert_eq!(&bytes[..4], &[9, 9, 9, 3]);
    }

    #[test]
    fn sub_blocks_keep_the_pitch() {
        let mut bytes = vec![0u8; 3 * 10];
        let mut rows = PaddedRowsMut::new(PixelFormat::Rgb8, &mut bytes, 3, 3, 10);
        {
            let mut sub = rows.sub_mut(1, 1, 2, 2);
            assert_eq!((sub.width(), sub.height(), sub.pitch()), (2, 2, 10));
            sub.row_img::<Rgb8>(1).buf_mut()[1] = Rgb8::new(7, 7, 7);
        }
        assert_eq!(rows.as_rows().sub(2, 2, 1, 1).row::<Rgb8>(0), &[Rgb8::new(7, 7, 7)]);
        assert_eq!(&bytes[26..29], &[7, 7, 7]);
    }
}
