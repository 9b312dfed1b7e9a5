use archmage::prelude::*;

// ===========================================================================
// SIMD constants
// ===========================================================================

const ALPHA_FF_MASK_AVX: [i8; 32] = [
    0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0,
    0, 0, -1,
];

// Dword gather that puts 12 RGB bytes at the start of each 16-byte lane.
const RGB_ALIGN_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0,
];

const RGB_TO_RGBA_SHUF_AVX: [i8; 32] = [
    0, 1, 2, -128, 3, 4, 5, -128, 6, 7, 8, -128, 9, 10, 11, -128, 0, 1, 2, -128, 3, 4, 5, -128, 6,
    7, 8, -128, 9, 10, 11, -128,
];

const RGBA_TO_RGB_SHUF_AVX: [i8; 32] = [
    0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, -128, -128, -128, -128, 0, 1, 2, 4, 5, 6, 8, 9, 10, 12,
    13, 14, -128, -128, -128, -128,
];

// Merge 12 bytes from each 16-byte lane into 24 contiguous bytes.
const PACK_3X4_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

// 8 grey bytes broadcast to both lanes → R=G=B, alpha byte zeroed.
const GREY_EXPAND_MASK_AVX: [i8; 32] = [
    0, 0, 0, -128, 1, 1, 1, -128, 2, 2, 2, -128, 3, 3, 3, -128, 4, 4, 4, -128, 5, 5, 5, -128, 6, 6,
    6, -128, 7, 7, 7, -128,
];

// 8 grey bytes → 24 RGB bytes, 16 in the low lane and 8 in the high lane.
const GREY_TO_RGB_SHUF_AVX: [i8; 32] = [
    0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 7, -128, -128, -128, -128,
    -128, -128, -128, -128,
];

// Low byte of each dword to the first 4 bytes of its lane.
const DWORD_LOW_BYTES_SHUF_AVX: [i8; 32] = [
    0, 4, 8, 12, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, 0, 4, 8,
    12, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128, -128,
];

const PACK_2X4_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

// floor(x / 3) == (x * 0xAAAB) >> 17 for every x <= 3 * 255.
const DIV3_MUL: i32 = 0xAAAB;

// ===========================================================================
// x86-64 AVX2 rite row implementations
// ===========================================================================

#[rite]
pub(super) fn rgb_to_rgba_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let perm = _mm256_loadu_si256(&RGB_ALIGN_PERM_AVX);
    let shuf = _mm256_loadu_si256(&RGB_TO_RGBA_SHUF_AVX);
    let alpha = _mm256_loadu_si256(&ALPHA_FF_MASK_AVX);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 32 <= slen && id + 32 <= dlen {
        let s: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        let rgb = _mm256_loadu_si256(s);
        let aligned = _mm256_permutevar8x32_epi32(rgb, perm);
        let rgba = _mm256_or_si256(_mm256_shuffle_epi8(aligned, shuf), alpha);
        let d: &mut [u8; 32] = (&mut dst[id..id + 32]).try_into().unwrap();
        _mm256_storeu_si256(d, rgba);
        is += 24;
        id += 32;
    }
    for (s, d) in src[is..].chunks_exact(3).zip(dst[id..].chunks_exact_mut(4)) {
        d.copy_from_slice(&[s[0], s[1], s[2], 0xFF]);
    }
}

#[rite]
pub(super) fn rgba_to_rgb_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let shuf = _mm256_loadu_si256(&RGBA_TO_RGB_SHUF_AVX);
    let pack = _mm256_loadu_si256(&PACK_3X4_PERM_AVX);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 32 <= slen && id + 24 <= dlen {
        let s: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        let v = _mm256_loadu_si256(s);
        let stripped = _mm256_shuffle_epi8(v, shuf);
        let packed = _mm256_permutevar8x32_epi32(stripped, pack);
        let mut tmp = [0u8; 32];
        _mm256_storeu_si256(&mut tmp, packed);
        dst[id..id + 24].copy_from_slice(&tmp[..24]);
        is += 32;
        id += 24;
    }
    for (s, d) in src[is..].chunks_exact(4).zip(dst[id..].chunks_exact_mut(3)) {
        d.copy_from_slice(&s[..3]);
    }
}

#[rite]
pub(super) fn grey_to_rgba_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let expand = _mm256_loadu_si256(&GREY_EXPAND_MASK_AVX);
    let alpha = _mm256_loadu_si256(&ALPHA_FF_MASK_AVX);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 8 <= slen && id + 32 <= dlen {
        let grey8 = u64::from_ne_bytes(src[is..is + 8].try_into().unwrap());
        let greys = _mm256_set1_epi64x(grey8 as i64);
        let rgba = _mm256_or_si256(_mm256_shuffle_epi8(greys, expand), alpha);
        let d: &mut [u8; 32] = (&mut dst[id..id + 32]).try_into().unwrap();
        _mm256_storeu_si256(d, rgba);
        is += 8;
        id += 32;
    }
    for (&v, d) in src[is..].iter().zip(dst[id..].chunks_exact_mut(4)) {
        d.copy_from_slice(&[v, v, v, 0xFF]);
    }
}

#[rite]
pub(super) fn grey_to_rgb_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let expand = _mm256_loadu_si256(&GREY_TO_RGB_SHUF_AVX);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 8 <= slen && id + 24 <= dlen {
        let grey8 = u64::from_ne_bytes(src[is..is + 8].try_into().unwrap());
        let greys = _mm256_set1_epi64x(grey8 as i64);
        let rgb = _mm256_shuffle_epi8(greys, expand);
        let mut tmp = [0u8; 32];
        _mm256_storeu_si256(&mut tmp, rgb);
        dst[id..id + 24].copy_from_slice(&tmp[..24]);
        is += 8;
        id += 24;
    }
    for (&v, d) in src[is..].iter().zip(dst[id..].chunks_exact_mut(3)) {
        d.copy_from_slice(&[v, v, v]);
    }
}

/// Unweighted mean of the low three bytes of each dword, packed into 8 bytes.
#[rite]
fn mean_rgbx_v3(_token: X64V3Token, px: __m256i, dst: &mut [u8]) {
    let low = _mm256_set1_epi32(0xFF);
    let r = _mm256_and_si256(px, low);
    let g = _mm256_and_si256(_mm256_srli_epi32::<8>(px), low);
    let b = _mm256_and_si256(_mm256_srli_epi32::<16>(px), low);
    let sum = _mm256_add_epi32(_mm256_add_epi32(r, g), b);
    let mean = _mm256_srli_epi32::<17>(_mm256_mullo_epi32(sum, _mm256_set1_epi32(DIV3_MUL)));
    let bytes = _mm256_shuffle_epi8(mean, _mm256_loadu_si256(&DWORD_LOW_BYTES_SHUF_AVX));
    let packed = _mm256_permutevar8x32_epi32(bytes, _mm256_loadu_si256(&PACK_2X4_PERM_AVX));
    let mut tmp = [0u8; 32];
    _mm256_storeu_si256(&mut tmp, packed);
    dst.copy_from_slice(&tmp[..8]);
}

#[rite]
pub(super) fn rgb_to_grey_row_v3(token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let perm = _mm256_loadu_si256(&RGB_ALIGN_PERM_AVX);
    let shuf = _mm256_loadu_si256(&RGB_TO_RGBA_SHUF_AVX);
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 32 <= slen && id + 8 <= dlen {
        let s: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        let aligned = _mm256_permutevar8x32_epi32(_mm256_loadu_si256(s), perm);
        mean_rgbx_v3(token, _mm256_shuffle_epi8(aligned, shuf), &mut dst[id..id + 8]);
        is += 24;
        id += 8;
    }
    for (s, d) in src[is..].chunks_exact(3).zip(dst[id..].iter_mut()) {
        *d = ((s[0] as u16 + s[1] as u16 + s[2] as u16) / 3) as u8;
    }
}

#[rite]
pub(super) fn rgba_to_grey_row_v3(token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let (slen, dlen) = (src.len(), dst.len());
    let (mut is, mut id) = (0, 0);
    while is + 32 <= slen && id + 8 <= dlen {
        let s: &[u8; 32] = src[is..is + 32].try_into().unwrap();
        mean_rgbx_v3(token, _mm256_loadu_si256(s), &mut dst[id..id + 8]);
        is += 32;
        id += 8;
    }
    for (s, d) in src[is..].chunks_exact(4).zip(dst[id..].iter_mut()) {
        *d = ((s[0] as u16 + s[1] as u16 + s[2] as u16) / 3) as u8;
    }
}

#[rite]
pub(super) fn fill_rgba_row_v3(_token: X64V3Token, row: &mut [u8], px: [u8; 4]) {
    let splat = _mm256_set1_epi32(i32::from_ne_bytes(px));
    let mut blocks = row.chunks_exact_mut(32);
    for d in &mut blocks {
        let d: &mut [u8; 32] = d.try_into().unwrap();
        _mm256_storeu_si256(d, splat);
    }
    for d in blocks.into_remainder().chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

// ===========================================================================
// x86-64 arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn rgb_to_rgba_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb_to_rgba_row_v3(t, s, d);
}
#[arcane]
pub(super) fn rgba_to_rgb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgba_to_rgb_row_v3(t, s, d);
}
#[arcane]
pub(super) fn grey_to_rgba_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    grey_to_rgba_row_v3(t, s, d);
}
#[arcane]
pub(super) fn grey_to_rgb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    grey_to_rgb_row_v3(t, s, d);
}
#[arcane]
pub(super) fn rgb_to_grey_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb_to_grey_row_v3(t, s, d);
}
#[arcane]
pub(super) fn rgba_to_grey_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgba_to_grey_row_v3(t, s, d);
}
#[arcane]
pub(super) fn fill_rgba_impl_v3(t: X64V3Token, b: &mut [u8], px: [u8; 4]) {
    fill_rgba_row_v3(t, b, px);
}

// ===========================================================================
// x86-64 arcane strided wrappers
// ===========================================================================

#[arcane]
pub(super) fn rgb_to_rgba_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb_to_rgba_row_v3(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 4]);
    }
}
#[arcane]
pub(super) fn rgba_to_rgb_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgba_to_rgb_row_v3(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w * 3]);
    }
}
#[arcane]
pub(super) fn grey_to_rgba_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        grey_to_rgba_row_v3(t, &src[y * ss..][..w], &mut dst[y * ds..][..w * 4]);
    }
}
#[arcane]
pub(super) fn grey_to_rgb_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        grey_to_rgb_row_v3(t, &src[y * ss..][..w], &mut dst[y * ds..][..w * 3]);
    }
}
#[arcane]
pub(super) fn rgb_to_grey_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgb_to_grey_row_v3(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w]);
    }
}
#[arcane]
pub(super) fn rgba_to_grey_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        rgba_to_grey_row_v3(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w]);
    }
}
#[arcane]
pub(super) fn fill_rgba_strided_v3(
    t: X64V3Token,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
    px: [u8; 4],
) {
    for y in 0..h {
        fill_rgba_row_v3(t, &mut buf[y * stride..][..w * 4], px);
    }
}
