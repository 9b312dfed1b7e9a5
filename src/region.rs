//! Clipped region operations over two independently typed pixel buffers.
//!
//! Sources are [`ImgRef`] views and destinations [`ImgRefMut`] views of any
//! pixel types. Every operation clips first (see [`crate::geom::clip_pair`])
//! and never reads or writes outside either buffer, whatever rectangle or
//! placement it is given.
//!
//! ```rust
//! use imgref::ImgVec;
//! use swatch::geom::{Point, Rect};
//! use swatch::pixel::{Rgb8, Rgba16};
//! use swatch::region;
//!
//! let src = ImgVec::new(vec![Rgb8::new(255, 0, 0); 4], 2, 2);
//! let mut dst = ImgVec::new(vec![Rgba16::new(0, 0, 0, 0); 16], 4, 4);
//! region::blit(src.as_ref(), dst.as_mut(), Point::new(3, 3));
//! assert_eq!(dst[(3usize, 3usize)], Rgba16::new(65535, 0, 0, 65535));
//! assert_eq!(dst[(2usize, 2usize)], Rgba16::new(0, 0, 0, 0));
//! ```

use core::any::TypeId;

use alloc::vec;
use imgref::{ImgRef, ImgRefMut, ImgVec};

use crate::composite::{Additive, Composite, Over};
use crate::convert::convert_slice;
use crate::error::Error;
use crate::geom::{Point, Rect, Size, clip_pair, scale_axis};
use crate::pixel::Pixel;
use crate::rows;

#[inline]
fn src_size<S>(img: &ImgRef<'_, S>) -> Size {
    Size::new(img.width() as u32, img.height() as u32)
}

#[inline]
fn dst_size<D>(img: &ImgRefMut<'_, D>) -> Size {
    Size::new(img.width() as u32, img.height() as u32)
}

/// A new `width × height` buffer with every pixel set to `value`.
///
/// Zero-sized buffers are allowed; their stride is kept at least 1.
pub fn filled<P: Pixel>(width: usize, height: usize, value: P) -> ImgVec<P> {
    let stride = width.max(1);
    ImgVec::new_stride(vec![value; stride * height.max(1)], width, height, stride)
}

// ---------------------------------------------------------------------------
// Blit
// ---------------------------------------------------------------------------

/// Copy all of `src` into `dst` with its top-left corner at `pos`,
/// converting pixels on the way.
pub fn blit<S: Pixel, D: Pixel>(src: ImgRef<'_, S>, dst: ImgRefMut<'_, D>, pos: Point) {
    let all = src_size(&src).bounds();
    blit_rect(src, all, dst, pos);
}

/// Copy `src_rect` of `src` into `dst` with its top-left corner at `pos`.
///
/// Same pixel type: a plain row copy. 8-bit RGB/RGBA/grey pairs go through
/// the [`rows`] kernels. Everything else converts pixel by pixel.
pub fn blit_rect<S: Pixel, D: Pixel>(
    src: ImgRef<'_, S>,
    src_rect: Rect,
    mut dst: ImgRefMut<'_, D>,
    pos: Point,
) {
    let Some(c) = clip_pair(src_size(&src), src_rect, dst_size(&dst), pos) else {
        log::trace!("blit of {src_rect:?} at {pos:?} clipped to nothing");
        return;
    };
    let src = src.sub_image(c.src_x, c.src_y, c.width, c.height);
    let mut dst = dst.sub_image_mut(c.dst_x, c.dst_y, c.width, c.height);

    if TypeId::of::<S>() == TypeId::of::<D>() {
        for (s, d) in src.rows().zip(dst.rows_mut()) {
            let d: &mut [u8] = bytemuck::cast_slice_mut(d);
            d.copy_from_slice(bytemuck::cast_slice(s));
        }
        return;
    }

    let (ss, ds) = (src.stride(), dst.stride());
    if rows::convert_strided(src.buf(), dst.buf_mut(), c.width, c.height, ss, ds) {
        return;
    }
    for (s, d) in src.rows().zip(dst.rows_mut()) {
        convert_slice(s, d);
    }
}

/// Nearest-neighbour scaled copy of `src_rect` onto `dst_rect`.
///
/// Destination pixel `(dx, dy)` takes source pixel
/// `(sl + (dx − dl)·sw/dw, st + (dy − dt)·sh/dh)`. Destination pixels
/// outside `dst`, or whose source falls outside `src`, are left alone.
pub fn blit_scaled<S: Pixel, D: Pixel>(
    src: ImgRef<'_, S>,
    src_rect: Rect,
    mut dst: ImgRefMut<'_, D>,
    dst_rect: Rect,
) {
    let xs = scale_axis(
        src_rect.left,
        src_rect.width(),
        src.width(),
        dst_rect.left,
        dst_rect.width(),
        dst.width(),
    );
    let ys = scale_axis(
        src_rect.top,
        src_rect.height(),
        src.height(),
        dst_rect.top,
        dst_rect.height(),
        dst.height(),
    );
    if xs.is_empty() || ys.is_empty() {
        log::trace!("scaled blit {src_rect:?} -> {dst_rect:?} clipped to nothing");
        return;
    }
    let ss = src.stride();
    let ds = dst.stride();
    let sbuf: &[S] = src.buf();
    let dbuf: &mut [D] = dst.buf_mut();
    for &(dy, sy) in &ys {
        let srow = &sbuf[sy * ss..];
        let drow = &mut dbuf[dy * ds..];
        for &(dx, sx) in &xs {
            drow[dx] = crate::convert::convert(srow[sx]);
        }
    }
}

// ---------------------------------------------------------------------------
// Compositing traversal
// ---------------------------------------------------------------------------

/// Apply operator `O` to every overlapping pixel pair, with the same
/// clipping as [`blit_rect`].
pub fn composite<O: Composite, S: Pixel, D: Pixel>(
    src: ImgRef<'_, S>,
    src_rect: Rect,
    mut dst: ImgRefMut<'_, D>,
    pos: Point,
) {
    let Some(c) = clip_pair(src_size(&src), src_rect, dst_size(&dst), pos) else {
        log::trace!("composite of {src_rect:?} at {pos:?} clipped to nothing");
        return;
    };
    let src = src.sub_image(c.src_x, c.src_y, c.width, c.height);
    let mut dst = dst.sub_image_mut(c.dst_x, c.dst_y, c.width, c.height);
    for (s, d) in src.rows().zip(dst.rows_mut()) {
        for (sp, dp) in s.iter().zip(d.iter_mut()) {
            *dp = O::apply(*sp, *dp);
        }
    }
}

/// Alpha-blend `src_rect` of `src` over `dst` at `pos`.
pub fn blend<S: Pixel, D: Pixel>(
    src: ImgRef<'_, S>,
    src_rect: Rect,
    dst: ImgRefMut<'_, D>,
    pos: Point,
) {
    composite::<Over, S, D>(src, src_rect, dst, pos);
}

/// Additively composite `src_rect` of `src` onto `dst` at `pos`.
pub fn blend_add<S: Pixel, D: Pixel>(
    src: ImgRef<'_, S>,
    src_rect: Rect,
    dst: ImgRefMut<'_, D>,
    pos: Point,
) {
    composite::<Additive, S, D>(src, src_rect, dst, pos);
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Set every pixel of `dst` to `value`.
pub fn fill<P: Pixel>(dst: ImgRefMut<'_, P>, value: P) {
    let all = dst_size(&dst).bounds();
    fill_rect(dst, all, value);
}

/// Set every pixel of `rect ∩ bounds` to `value`; nothing else changes.
pub fn fill_rect<P: Pixel>(mut dst: ImgRefMut<'_, P>, rect: Rect, value: P) {
    let r = rect.intersect(&dst_size(&dst).bounds());
    if r.is_empty() {
        log::trace!("fill of {rect:?} clipped to nothing");
        return;
    }
    let (w, h) = (r.width() as usize, r.height() as usize);
    let mut dst = dst.sub_image_mut(r.left as usize, r.top as usize, w, h);

    let bytes = bytemuck::bytes_of(&value);
    if let Some((&first, rest)) = bytes.split_first()
        && rest.iter().all(|&b| b == first)
    {
        for row in dst.rows_mut() {
            bytemuck::cast_slice_mut::<P, u8>(row).fill(first);
        }
        return;
    }

    let stride = dst.stride();
    if rows::fill_strided(dst.buf_mut(), w, h, stride, value) {
        return;
    }
    for row in dst.rows_mut() {
        row.fill(value);
    }
}

/// Tile `rect ∩ bounds` with `a` and `b` in cells of `cell` pixels.
///
/// Coordinates are taken relative to `rect`'s top-left corner; pixel
/// `(x, y)` gets `a` when `(x / cw) mod 2 == (y / ch) mod 2`, otherwise `b`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if either cell dimension is zero.
pub fn fill_checkerboard<P: Pixel>(
    mut dst: ImgRefMut<'_, P>,
    rect: Rect,
    cell: Size,
    a: P,
    b: P,
) -> Result<(), Error> {
    if cell.is_empty() {
        return Err(Error::InvalidArgument("checkerboard cell size must be non-zero"));
    }
    let r = rect.intersect(&dst_size(&dst).bounds());
    if r.is_empty() {
        log::trace!("checkerboard of {rect:?} clipped to nothing");
        return Ok(());
    }
    let (cw, ch) = (cell.width as i64, cell.height as i64);
    let x0 = r.left as i64 - rect.left as i64;
    let y0 = r.top as i64 - rect.top as i64;
    let (w, h) = (r.width() as usize, r.height() as usize);
    let mut dst = dst.sub_image_mut(r.left as usize, r.top as usize, w, h);
    for (j, row) in dst.rows_mut().enumerate() {
        let ty = ((y0 + j as i64) / ch) % 2;
        for (i, px) in row.iter_mut().enumerate() {
            let tx = ((x0 + i as i64) / cw) % 2;
            *px = if tx == ty { a } else { b };
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::*;
    use alloc::vec::Vec;

    fn numbered(w: usize, h: usize) -> ImgVec<Grey8> {
        let buf = (0..w * h).map(|i| Grey8::new(i as u8 + 1)).collect();
        ImgVec::new(buf, w, h)
    }

    fn pixels<P: Copy>(img: &ImgVec<P>) -> Vec<P> {
        img.rows().flatten().copied().collect()
    }

    #[test]
    fn blit_same_type_copies_rows() {
        let src = numbered(3, 2);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 16], 4, 4);
        blit(src.as_ref(), dst.as_mut(), Point::new(1, 1));
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(
            got,
            [0, 0, 0, 0, 0, 1, 2, 3, 0, 4, 5, 6, 0, 0, 0, 0]
        );
    }

    #[test]
    fn blit_negative_offset_takes_lower_right_of_source() {
        let src = numbered(3, 3);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 4], 2, 2);
        blit(src.as_ref(), dst.as_mut(), Point::new(-1, -1));
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(got, [5, 6, 8, 9]);
    }

    #[test]
    fn blit_rect_selects_source_region() {
        let src = numbered(4, 4);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 4], 2, 2);
        blit_rect(src.as_ref(), Rect::new(2, 2, 4, 4), dst.as_mut(), Point::ORIGIN);
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(got, [11, 12, 15, 16]);
    }

    #[test]
    fn blit_converts_through_kernels_and_generic_path() {
        let src = ImgVec::new(vec![Rgb8::new(30, 60, 90); 6], 3, 2);
        let mut via_kernel = ImgVec::new(vec![Grey8::new(0); 9], 3, 3);
        blit(src.as_ref(), via_kernel.as_mut(), Point::new(0, 1));
        assert_eq!(via_kernel[(2usize, 2usize)].value(), 60);
        assert_eq!(via_kernel[(0usize, 0usize)].value(), 0);

        let mut generic = ImgVec::new(vec![Grey16::new(0); 9], 3, 3);
        blit(src.as_ref(), generic.as_mut(), Point::new(0, 1));
        assert_eq!(generic[(2usize, 2usize)].value(), 60 * 257);
    }

    #[test]
    fn blit_respects_destination_stride() {
        let src = ImgVec::new(vec![Rgb8::new(1, 2, 3); 4], 2, 2);
        let mut dst = ImgVec::new_stride(vec![Rgba8::new(9, 9, 9, 9); 12], 2, 3, 4);
        blit(src.as_ref(), dst.as_mut(), Point::new(0, 1));
        let buf = dst.buf();
        assert_eq!(buf[0], Rgba8::new(9, 9, 9, 9));
        assert_eq!(buf[4], Rgba8::new(1, 2, 3, 255));
        assert_eq!(buf[5], Rgba8::new(1, 2, 3, 255));
        // padding columns untouched
        assert_eq!(buf[6], Rgba8::new(9, 9, 9, 9));
        assert_eq!(buf[7], Rgba8::new(9, 9, 9, 9));
    }

    #[test]
    fn blit_scaled_upscales_nearest() {
        let src = numbered(2, 2);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 16], 4, 4);
        blit_scaled(
            src.as_ref(),
            Rect::new(0, 0, 2, 2),
            dst.as_mut(),
            Rect::new(0, 0, 4, 4),
        );
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(got, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }

    #[test]
    fn blit_scaled_downscales_and_clips() {
        let src = numbered(4, 4);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 4], 2, 2);
        blit_scaled(
            src.as_ref(),
            Rect::new(0, 0, 4, 4),
            dst.as_mut(),
            Rect::new(-1, -1, 3, 3),
        );
        // dst column 0 is index 1 of dst_rect, which samples source column 1
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(got, [6, 7, 10, 11]);
    }

    #[test]
    fn blit_scaled_skips_out_of_source_samples() {
        let src = numbered(2, 2);
        let mut dst = ImgVec::new(vec![Grey8::new(0); 4], 4, 1);
        blit_scaled(
            src.as_ref(),
            Rect::new(1, 0, 3, 1),
            dst.as_mut(),
            Rect::new(0, 0, 4, 1),
        );
        let got: Vec<u8> = pixels(&dst).iter().map(|p| p.value()).collect();
        assert_eq!(got, [2, 2, 0, 0]);
    }

    #[test]
    fn blend_region_uses_over() {
        let src = ImgVec::new(vec![Rgba8::new(255, 0, 0, 0); 1], 1, 1);
        let mut dst = ImgVec::new(vec![Rgba8::new(1, 2, 3, 255); 1], 1, 1);
        blend(src.as_ref(), Rect::new(0, 0, 1, 1), dst.as_mut(), Point::ORIGIN);
        assert_eq!(dst.buf()[0], Rgba8::new(1, 2, 3, 255));
    }

    #[test]
    fn fill_rect_partially_outside() {
        let mut img = ImgVec::new(vec![Rgb16::new(0, 0, 0); 9], 3, 3);
        let v = Rgb16::new(1, 2, 3);
        fill_rect(img.as_mut(), Rect::new(-5, 1, 2, 10), v);
        for y in 0..3usize {
            for x in 0..3usize {
                let inside = x < 2 && y >= 1;
                assert_eq!(img[(x, y)] == v, inside, "({x},{y})");
            }
        }
    }

    #[test]
    fn fill_fast_paths_match_assignment() {
        let mut zeros = ImgVec::new(vec![RgbaF32::new(1.0, 1.0, 1.0, 1.0); 6], 3, 2);
        fill(zeros.as_mut(), RgbaF32::new(0.0, 0.0, 0.0, 0.0));
        assert!(zeros.buf().iter().all(|p| *p == RgbaF32::new(0.0, 0.0, 0.0, 0.0)));

        let mut rgba = ImgVec::new_stride(vec![Rgba8::new(0, 0, 0, 0); 8], 3, 2, 4);
        fill(rgba.as_mut(), Rgba8::new(1, 2, 3, 4));
        assert_eq!(rgba.buf()[3], Rgba8::new(0, 0, 0, 0));
        assert_eq!(rgba.buf()[6], Rgba8::new(1, 2, 3, 4));

        let mut grey = ImgVec::new(vec![Grey32::new(0); 4], 2, 2);
        fill(grey.as_mut(), Grey32::new(7));
        assert!(grey.buf().iter().all(|p| p.value() == 7));
    }

    #[test]
    fn checkerboard_cells() {
        let (a, b) = (Grey8::new(1), Grey8::new(2));
        let mut img = ImgVec::new(vec![Grey8::new(0); 16], 4, 4);
        fill_checkerboard(img.as_mut(), Rect::new(0, 0, 4, 4), Size::new(2, 1), a, b).unwrap();
        let got: Vec<u8> = pixels(&img).iter().map(|p| p.value()).collect();
        assert_eq!(got, [1, 1, 2, 2, 2, 2, 1, 1, 1, 1, 2, 2, 2, 2, 1, 1]);
    }

    #[test]
    fn checkerboard_is_relative_to_rect_origin() {
        let (a, b) = (Grey8::new(1), Grey8::new(2));
        let mut img = ImgVec::new(vec![Grey8::new(0); 4], 4, 1);
        fill_checkerboard(img.as_mut(), Rect::new(-1, 0, 4, 1), Size::new(1, 1), a, b).unwrap();
        let got: Vec<u8> = pixels(&img).iter().map(|p| p.value()).collect();
        assert_eq!(got, [2, 1, 2, 1]);
    }

    #[test]
    fn checkerboard_rejects_zero_cells() {
        let mut img = ImgVec::new(vec![Grey8::new(0); 4], 2, 2);
        let err = fill_checkerboard(
            img.as_mut(),
            Rect::new(0, 0, 2, 2),
            Size::new(0, 4),
            Grey8::new(1),
            Grey8::new(2),
        );
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }
}
