use archmage::prelude::*;

// ===========================================================================
// Scalar row implementations
// ===========================================================================

pub(super) fn rgb_to_rgba_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = s[2];
        d[3] = 0xFF;
    }
}

pub(super) fn rgba_to_rgb_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = s[2];
    }
}

pub(super) fn grey_to_rgba_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (&v, d) in src.iter().zip(dst.chunks_exact_mut(4)) {
        d[0] = v;
        d[1] = v;
        d[2] = v;
        d[3] = 0xFF;
    }
}

pub(super) fn grey_to_rgb_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (&v, d) in src.iter().zip(dst.chunks_exact_mut(3)) {
        d[0] = v;
        d[1] = v;
        d[2] = v;
    }
}

pub(super) fn rgb_to_grey_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *d = ((s[0] as u16 + s[1] as u16 + s[2] as u16) / 3) as u8;
    }
}

pub(super) fn rgba_to_grey_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *d = ((s[0] as u16 + s[1] as u16 + s[2] as u16) / 3) as u8;
    }
}

pub(super) fn fill_rgba_row_scalar(_token: ScalarToken, row: &mut [u8], px: [u8; 4]) {
    for d in row.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

// ===========================================================================
// Scalar contiguous wrappers
// ===========================================================================

pub(super) fn rgb_to_rgba_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb_to_rgba_row_scalar(t, s, d);
}
pub(super) fn rgba_to_rgb_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgba_to_rgb_row_scalar(t, s, d);
}
pub(super) fn grey_to_rgba_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    grey_to_rgba_row_scalar(t, s, d);
}
pub(super) fn grey_to_rgb_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    grey_to_rgb_row_scalar(t, s, d);
}
pub(super) fn rgb_to_grey_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb_to_grey_row_scalar(t, s, d);
}
pub(super) fn rgba_to_grey_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgba_to_grey_row_scalar(t, s, d);
}
pub(super) fn fill_rgba_impl_scalar(t: ScalarToken, b: &mut [u8], px: [u8; 4]) {
    fill_rgba_row_scalar(t, b, px);
}

// ===========================================================================
// Scalar strided wrappers
// ===========================================================================

pub(super) fn rgb_to_rgba_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb_to_rgba_row_scalar(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 4]);
    }
}
pub(super) fn rgba_to_rgb_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgba_to_rgb_row_scalar(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w * 3]);
    }
}
pub(super) fn grey_to_rgba_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        grey_to_rgba_row_scalar(t, &src[y * ss..][..w], &mut dst[y * ds..][..w * 4]);
    }
}
pub(super) fn grey_to_rgb_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        grey_to_rgb_row_scalar(t, &src[y * ss..][..w], &mut dst[y * ds..][..w * 3]);
    }
}
pub(super) fn rgb_to_grey_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb_to_grey_row_scalar(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
pub(super) fn rgba_to_grey_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgba_to_grey_row_scalar(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w]);
    }
}
pub(super) fn fill_rgba_strided_scalar(
    t: ScalarToken,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
    px: [u8; 4],
) {
    for y in 0..h {
        fill_rgba_row_scalar(t, &mut buf[y * stride..][..w * 4], px);
    }
}
