// ---------------------------------------------------------------------------
// Byte-level row kernels for the 8-bit layouts, with runtime SIMD dispatch.
//
// Architecture: row functions hold the loops. #[arcane] wrappers dispatch
// via incant!: contiguous (single call) and strided (loop over rows, single
// dispatch). Region operations reach these through `convert_strided` and
// `fill_strided` when both pixel types are 8-bit.
// ---------------------------------------------------------------------------

use core::any::TypeId;

use archmage::incant;

use crate::error::Error;
use crate::pixel::{Grey8, Pixel, Rgb8, Rgba8};

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod x86;
#[cfg(target_arch = "x86_64")]
use x86::*;


// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_copy(src_len: usize, src_bpp: usize, dst_len: usize, dst_bpp: usize) -> Result<(), Error> {
    if src_len == 0 || !src_len.is_multiple_of(src_bpp) {
        return Err(Error::InvalidArgument("row length is not a whole number of pixels"));
    }
    if dst_len < (src_len / src_bpp) * dst_bpp {
        return Err(Error::BufferTooSmall);
    }
    Ok(())
}

#[inline]
fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    bpp: usize,
) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument("empty strided region"));
    }
    let row_bytes = width
        .checked_mul(bpp)
        .ok_or(Error::InvalidArgument("row length overflows"))?;
    if row_bytes > stride {
        return Err(Error::InvalidArgument("stride is shorter than a row"));
    }
    let total = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_bytes))
        .ok_or(Error::BufferTooSmall)?;
    if len < total {
        return Err(Error::BufferTooSmall);
    }
    Ok(())
}

// ===========================================================================
// Public API: contiguous
// ===========================================================================

/// RGB (3 bytes/px) → RGBA (4 bytes/px). Alpha = 255.
pub fn rgb_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 3, dst.len(), 4)?;
    incant!(rgb_to_rgba_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGBA (4 bytes/px) → RGB (3 bytes/px). Alpha is dropped.
pub fn rgba_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 4, dst.len(), 3)?;
    incant!(rgba_to_rgb_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Grey (1 byte/px) → RGBA (4 bytes/px). R=G=B=grey, alpha = 255.
pub fn grey_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 1, dst.len(), 4)?;
    incant!(grey_to_rgba_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Grey (1 byte/px) → RGB (3 bytes/px). R=G=B=grey.
pub fn grey_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 1, dst.len(), 3)?;
    incant!(grey_to_rgb_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGB (3 bytes/px) → grey (1 byte/px) as the truncated mean of R, G, B.
pub fn rgb_to_grey(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 3, dst.len(), 1)?;
    incant!(rgb_to_grey_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// RGBA (4 bytes/px) → grey (1 byte/px) as the truncated mean of R, G, B.
/// Alpha is ignored.
pub fn rgba_to_grey(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    check_copy(src.len(), 4, dst.len(), 1)?;
    incant!(rgba_to_grey_impl(src, dst), [v3, scalar]);
    Ok(())
}

/// Repeat one 4-byte pixel across `buf`.
pub fn fill_rgba(buf: &mut [u8], px: [u8; 4]) -> Result<(), Error> {
    if buf.is_empty() || !buf.len().is_multiple_of(4) {
        return Err(Error::InvalidArgument("row length is not a whole number of pixels"));
    }
    incant!(fill_rgba_impl(buf, px), [v3, scalar]);
    Ok(())
}

// ===========================================================================
// Public API: strided
// ===========================================================================

/// RGB → RGBA between strided buffers.
///
/// `src_stride` / `dst_stride` are byte distances between row starts.
/// Padding bytes between rows are never read or written.
pub fn rgb_to_rgba_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 3)?;
    check_strided(dst.len(), width, height, dst_stride, 4)?;
    incant!(
        rgb_to_rgba_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// RGBA → RGB between strided buffers.
pub fn rgba_to_rgb_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 4)?;
    check_strided(dst.len(), width, height, dst_stride, 3)?;
    incant!(
        rgba_to_rgb_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// Grey → RGBA between strided buffers.
pub fn grey_to_rgba_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 1)?;
    check_strided(dst.len(), width, height, dst_stride, 4)?;
    incant!(
        grey_to_rgba_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// Grey → RGB between strided buffers.
pub fn grey_to_rgb_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 1)?;
    check_strided(dst.len(), width, height, dst_stride, 3)?;
    incant!(
        grey_to_rgb_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// RGB → grey between strided buffers.
pub fn rgb_to_grey_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 3)?;
    check_strided(dst.len(), width, height, dst_stride, 1)?;
    incant!(
        rgb_to_grey_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// RGBA → grey between strided buffers.
pub fn rgba_to_grey_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), Error> {
    check_strided(src.len(), width, height, src_stride, 4)?;
    check_strided(dst.len(), width, height, dst_stride, 1)?;
    incant!(
        rgba_to_grey_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, scalar]
    );
    Ok(())
}

/// Repeat one 4-byte pixel over a strided region.
pub fn fill_rgba_strided(
    buf: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    px: [u8; 4],
) -> Result<(), Error> {
    check_strided(buf.len(), width, height, stride, 4)?;
    incant!(
        fill_rgba_strided(buf, width, height, stride, px),
        [v3, scalar]
    );
    Ok(())
}

// ===========================================================================
// Typed entry points for region operations
// ===========================================================================

#[inline(always)]
fn is<A: 'static, B: 'static>() -> bool {
    TypeId::of::<A>() == TypeId::of::<B>()
}

/// Convert a strided block of `S` pixels into `D` pixels with a byte
/// kernel, if one exists for the pair.
///
/// Strides are in pixels. Returns `false`, touching nothing, when no kernel
/// covers `S → D` or the buffers do not describe the region; the caller then
/// takes the generic path. Every kernel matches [`crate::convert::convert`]
/// bit for bit.
pub(crate) fn convert_strided<S: Pixel + 'static, D: Pixel + 'static>(
    src: &[S],
    dst: &mut [D],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> bool {
    let s: &[u8] = bytemuck::cast_slice(src);
    let d: &mut [u8] = bytemuck::cast_slice_mut(dst);
    let (ss, ds) = (
        src_stride * core::mem::size_of::<S>(),
        dst_stride * core::mem::size_of::<D>(),
    );
    let res = if is::<S, Rgb8>() && is::<D, Rgba8>() {
        rgb_to_rgba_strided(s, d, width, height, ss, ds)
    } else if is::<S, Rgba8>() && is::<D, Rgb8>() {
        rgba_to_rgb_strided(s, d, width, height, ss, ds)
    } else if is::<S, Grey8>() && is::<D, Rgba8>() {
        grey_to_rgba_strided(s, d, width, height, ss, ds)
    } else if is::<S, Grey8>() && is::<D, Rgb8>() {
        grey_to_rgb_strided(s, d, width, height, ss, ds)
    } else if is::<S, Rgb8>() && is::<D, Grey8>() {
        rgb_to_grey_strided(s, d, width, height, ss, ds)
    } else if is::<S, Rgba8>() && is::<D, Grey8>() {
        rgba_to_grey_strided(s, d, width, height, ss, ds)
    } else {
        return false;
    };
    res.is_ok()
}

/// Fill a strided block of `P` pixels with `value` through the 4-byte
/// kernel when `P` is 8-bit RGBA. Strides are in pixels.
pub(crate) fn fill_strided<P: Pixel + 'static>(
    dst: &mut [P],
    width: usize,
    height: usize,
    stride: usize,
    value: P,
) -> bool {
    if !is::<P, Rgba8>() {
        return false;
    }
    let mut px = [0u8; 4];
    px.copy_from_slice(bytemuck::bytes_of(&value));
    fill_rgba_strided(bytemuck::cast_slice_mut(dst), width, height, stride * 4, px).is_ok()
}
